//! Shared application state for the web server.

use std::sync::Arc;

use copilot_sources::PrevalenceSource;
use copilot_workflow::Workflow;

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub workflow: Workflow,
    pub prevalence: Arc<dyn PrevalenceSource>,
}

impl AppState {
    pub fn new(workflow: Workflow, prevalence: Arc<dyn PrevalenceSource>) -> Self {
        Self { workflow, prevalence }
    }
}

pub type SharedState = Arc<AppState>;
