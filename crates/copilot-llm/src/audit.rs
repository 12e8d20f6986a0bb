//! Audit records for LLM calls, emitted through `tracing`.

use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::backend::{LlmBackend, LlmError, LlmRequest, LlmResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmAuditEntry {
    pub id: Uuid,
    /// What the call was for: "classify", "fallback", "sql_generate", …
    pub purpose: String,
    pub model: String,
    pub backend: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub output_hash: String,
    pub latency_ms: u64,
    pub called_at: chrono::DateTime<Utc>,
}

impl LlmAuditEntry {
    pub fn new(
        purpose: &str,
        backend: &str,
        response: &LlmResponse,
        latency_ms: u64,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(response.content.as_bytes());
        let output_hash = format!("{:x}", hasher.finalize());

        Self {
            id: Uuid::new_v4(),
            purpose: purpose.to_string(),
            model: response.model.clone(),
            backend: backend.to_string(),
            prompt_tokens: response.prompt_tokens,
            completion_tokens: response.completion_tokens,
            output_hash,
            latency_ms,
            called_at: Utc::now(),
        }
    }
}

/// Runs one completion and logs an audit entry for it. Failures are logged
/// and returned unchanged.
pub async fn complete_audited(
    backend: &dyn LlmBackend,
    req: LlmRequest,
    purpose: &str,
) -> Result<LlmResponse, LlmError> {
    let started = Instant::now();
    let result = backend.complete(req).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(resp) => {
            let entry = LlmAuditEntry::new(purpose, backend.backend_name(), resp, latency_ms);
            tracing::info!(
                audit_id = %entry.id,
                purpose = %entry.purpose,
                model = %entry.model,
                backend = %entry.backend,
                prompt_tokens = entry.prompt_tokens,
                completion_tokens = entry.completion_tokens,
                output_hash = %entry.output_hash,
                latency_ms = entry.latency_ms,
                "LLM call completed"
            );
        }
        Err(e) => {
            tracing::warn!(
                purpose,
                model = backend.model_id(),
                backend = backend.backend_name(),
                latency_ms,
                error = %e,
                "LLM call failed"
            );
        }
    }

    result
}
