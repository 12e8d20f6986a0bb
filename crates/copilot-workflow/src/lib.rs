//! copilot-workflow — The analyze request: classify → route → enrich → present.
//!
//! All collaborators (LLM, SQL agent, resolver, histology API) are injected
//! through a [`ServiceContext`] built once per process.

pub mod context;
pub mod enrich;
pub mod presentation;
pub mod router;
pub mod workflow;

pub use context::{ServiceContext, WorkflowOptions};
pub use enrich::Enrichment;
pub use presentation::{Block, Presentation};
pub use workflow::{Workflow, WorkflowError};
