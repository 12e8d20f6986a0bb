//! dbSNP rsid → MONDO disease identifier resolution.

use async_trait::async_trait;
use copilot_common::{OntologyId, ReferenceSnp};

pub const DEFAULT_MONDO_ID: &str = "MONDO:0013342";

#[async_trait]
pub trait OntologyResolver: Send + Sync {
    /// `None` means the rsid could not be mapped.
    async fn resolve(&self, rsid: &ReferenceSnp) -> Option<OntologyId>;
}

/// Placeholder mapping: every non-empty rsid resolves to one fixed MONDO id.
///
/// There is no public rsid → MONDO endpoint wired in yet; swap this for a
/// real resolver (e.g. dbSNP → ClinVar → MONDO) behind the same trait.
pub struct StubMondoResolver {
    fixed: OntologyId,
}

impl StubMondoResolver {
    pub fn new(fixed: impl Into<String>) -> Self {
        Self { fixed: OntologyId::new(fixed) }
    }
}

impl Default for StubMondoResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MONDO_ID)
    }
}

#[async_trait]
impl OntologyResolver for StubMondoResolver {
    async fn resolve(&self, rsid: &ReferenceSnp) -> Option<OntologyId> {
        if rsid.is_empty() {
            return None;
        }
        tracing::debug!(rsid = %rsid, mondo_id = %self.fixed, "Resolved rsid with stub mapping");
        Some(self.fixed.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_resolves_non_empty() {
        let r = StubMondoResolver::default();
        assert_eq!(
            r.resolve(&ReferenceSnp::new("rs121913529")).await,
            Some(OntologyId::new("MONDO:0013342"))
        );
    }

    #[tokio::test]
    async fn test_stub_rejects_empty() {
        let r = StubMondoResolver::new("MONDO:0007254");
        assert_eq!(r.resolve(&ReferenceSnp::new("")).await, None);
    }
}
