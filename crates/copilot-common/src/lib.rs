//! copilot-common — Shared value types, errors, and the allow-listed HTTP
//! client used across all CRISPR Copilot crates.

pub mod error;
pub mod entities;
pub mod sandbox;

pub use entities::{
    ClassificationVerdict, FetchOutcome, HistologyLabels, MetadataAnswer, OntologyId,
    ReferenceSnp, UserInput, VerdictSource,
};
pub use error::{CopilotError, Result};
