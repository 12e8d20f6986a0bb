//! Input classification: is the user's text a strict-HG38 coordinate or HGVS
//! string suitable for guide design?

use std::sync::Arc;

use copilot_common::{ClassificationVerdict, UserInput, VerdictSource};
use serde::Deserialize;

use crate::audit::complete_audited;
use crate::backend::{LlmBackend, LlmError};
use crate::prompt::classification_prompt;

#[derive(Debug, Deserialize)]
struct StructuredVerdict {
    suitable: bool,
}

/// Substring heuristic: the lower-cased, trimmed completion contains "yes".
///
/// Lossy by nature: "yes and no", "eyes" or "no, yes means..." are all positive.
pub fn verdict_from_text(text: &str) -> ClassificationVerdict {
    let kind = text.trim().to_lowercase();
    ClassificationVerdict {
        suitable: kind.contains("yes"),
        source: VerdictSource::Heuristic,
        explanation: text.trim().to_string(),
    }
}

/// Extracts `{"suitable": bool}` from the last JSON object in the text that
/// has that shape. Text after the object (a closing fence) is ignored.
pub fn parse_structured(text: &str) -> Option<bool> {
    text.match_indices('{').rev().find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<StructuredVerdict>()
            .next()
            .and_then(|parsed| parsed.ok())
            .map(|v| v.suitable)
    })
}

pub struct Classifier {
    backend: Arc<dyn LlmBackend>,
    structured: bool,
}

impl Classifier {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend, structured: false }
    }

    /// Ask the model for a JSON verdict, falling back to the heuristic when
    /// the reply does not contain one.
    pub fn with_structured_output(mut self, structured: bool) -> Self {
        self.structured = structured;
        self
    }

    /// Errors from the completion service are returned to the caller as-is.
    pub async fn classify(&self, input: &UserInput) -> Result<ClassificationVerdict, LlmError> {
        let req = classification_prompt(input.as_str(), self.structured).into_request();
        let resp = complete_audited(self.backend.as_ref(), req, "classify").await?;

        if self.structured {
            if let Some(suitable) = parse_structured(&resp.content) {
                return Ok(ClassificationVerdict {
                    suitable,
                    source: VerdictSource::Structured,
                    explanation: resp.content.trim().to_string(),
                });
            }
            tracing::debug!("No structured verdict in completion, using substring heuristic");
        }

        Ok(verdict_from_text(&resp.content))
    }
}
