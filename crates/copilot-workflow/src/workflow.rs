//! Request entry point.

use std::sync::Arc;
use std::time::Instant;

use copilot_common::UserInput;
use copilot_llm::LlmError;
use thiserror::Error;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::context::ServiceContext;
use crate::presentation::{Presentation, IMAGE_NOTICE};
use crate::router::route;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Classification service failed: {0}")]
    Classification(#[source] LlmError),

    #[error("Assistant completion failed: {0}")]
    Fallback(#[source] LlmError),
}

/// One analyze request per call; no shared mutable state between calls.
#[derive(Clone)]
pub struct Workflow {
    ctx: Arc<ServiceContext>,
}

impl Workflow {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn run(&self, input: &UserInput) -> Result<Presentation, WorkflowError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("analyze", %request_id);
        self.run_inner(request_id, input).instrument(span).await
    }

    async fn run_inner(&self, request_id: Uuid, input: &UserInput) -> Result<Presentation, WorkflowError> {
        let started = Instant::now();
        let mut out = Presentation::new(request_id);

        if input.image_attached {
            out.markdown(IMAGE_NOTICE);
        }

        let verdict = self
            .ctx
            .classifier
            .classify(input)
            .await
            .map_err(WorkflowError::Classification)?;
        info!(suitable = verdict.suitable, source = ?verdict.source, "Input classified");

        route(&self.ctx, input, &verdict, &mut out)
            .await
            .map_err(WorkflowError::Fallback)?;
        out.verdict = Some(verdict);

        info!(
            blocks = out.blocks.len(),
            errors = out.has_errors(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Request finished"
        );
        Ok(out)
    }
}
