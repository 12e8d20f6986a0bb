//! copilot-llm — LLM backend abstraction, prompt composition, and the
//! input classifier.

pub mod backend;
pub mod prompt;
pub mod classification;
pub mod audit;

pub use backend::{LlmBackend, LlmError, LlmRequest, LlmResponse, Message};
pub use classification::Classifier;
pub use prompt::ChatPrompt;
