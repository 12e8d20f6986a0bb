//! External reference-data clients used to enrich database answers.
//!
//! Every client here is fail-silent: lookups return a `FetchOutcome`
//! instead of an error, and failures are logged at `warn`.

pub mod monarch;
pub mod orphadata;
pub mod resolver;

use async_trait::async_trait;
use copilot_common::{FetchOutcome, HistologyLabels, OntologyId};

pub use monarch::MonarchClient;
pub use orphadata::OrphadataClient;
pub use resolver::{OntologyResolver, StubMondoResolver};

/// Histology/phenotype labels for a disease.
#[async_trait]
pub trait HistologySource: Send + Sync {
    async fn histology(&self, id: &OntologyId) -> FetchOutcome<HistologyLabels>;
}

/// Prevalence data for an Orphanet code.
#[async_trait]
pub trait PrevalenceSource: Send + Sync {
    async fn prevalence(&self, orphanet_code: &str) -> FetchOutcome<serde_json::Value>;
}
