//! Histology enrichment for database answers with missing fields.
//!
//! answer has `None`/`null` → first `rs…` token → MONDO id → histology labels.
//! Every step may stop the chain; none of them raise.

use copilot_common::{FetchOutcome, HistologyLabels, MetadataAnswer, OntologyId, ReferenceSnp};
use copilot_sources::{HistologySource, OntologyResolver};
use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Enrichment {
    /// The answer has no missing-value markers.
    NotNeeded,
    /// No token starting with `rs` in the answer.
    NoRsid,
    Unresolved { rsid: ReferenceSnp },
    Fetched {
        rsid: ReferenceSnp,
        ontology_id: OntologyId,
        histology: FetchOutcome<HistologyLabels>,
    },
}

impl Enrichment {
    /// Labels to show; empty unless the lookup found some.
    pub fn labels(&self) -> HistologyLabels {
        match self {
            Enrichment::Fetched { histology: FetchOutcome::Found(labels), .. } => labels.clone(),
            _ => Vec::new(),
        }
    }

    /// Markdown line appended under the answer, only when there are labels.
    pub fn summary_line(&self) -> Option<String> {
        let labels = self.labels();
        if labels.is_empty() {
            return None;
        }
        Some(format!(
            "**Additional Histology Info (from MONDO API):** {}",
            labels.join(", ")
        ))
    }
}

#[instrument(skip_all)]
pub async fn enrich(
    answer: &MetadataAnswer,
    resolver: &dyn OntologyResolver,
    histology: &dyn HistologySource,
) -> Enrichment {
    if !answer.has_missing_fields() {
        return Enrichment::NotNeeded;
    }

    let Some(rsid) = answer.first_rsid() else {
        debug!("Answer has missing fields but no rsid");
        return Enrichment::NoRsid;
    };

    let Some(ontology_id) = resolver.resolve(&rsid).await else {
        debug!(rsid = %rsid, "rsid did not resolve to a MONDO id");
        return Enrichment::Unresolved { rsid };
    };

    let histology = histology.histology(&ontology_id).await;
    debug!(rsid = %rsid, ontology_id = %ontology_id, failed = histology.is_failed(), "Histology enrichment done");
    Enrichment::Fetched { rsid, ontology_id, histology }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use copilot_sources::StubMondoResolver;
    use std::sync::Mutex;

    struct FixedHistology {
        outcome: FetchOutcome<HistologyLabels>,
        asked: Mutex<Vec<OntologyId>>,
    }

    impl FixedHistology {
        fn new(outcome: FetchOutcome<HistologyLabels>) -> Self {
            Self { outcome, asked: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl HistologySource for FixedHistology {
        async fn histology(&self, id: &OntologyId) -> FetchOutcome<HistologyLabels> {
            self.asked.lock().unwrap().push(id.clone());
            self.outcome.clone()
        }
    }

    struct NeverResolves;

    #[async_trait]
    impl OntologyResolver for NeverResolves {
        async fn resolve(&self, _rsid: &ReferenceSnp) -> Option<OntologyId> {
            None
        }
    }

    fn labels(items: &[&str]) -> FetchOutcome<HistologyLabels> {
        FetchOutcome::Found(items.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn test_no_markers_means_no_lookup() {
        let histo = FixedHistology::new(labels(&["A"]));
        let answer = MetadataAnswer::new("rs80357906 is Pathogenic in ClinVar.");

        let e = enrich(&answer, &StubMondoResolver::default(), &histo).await;
        assert_eq!(e, Enrichment::NotNeeded);
        assert!(e.labels().is_empty());
        assert!(histo.asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_rsid_means_no_lookup() {
        let histo = FixedHistology::new(labels(&["A"]));
        let answer = MetadataAnswer::new("Clinical significance: None recorded.");

        let e = enrich(&answer, &StubMondoResolver::default(), &histo).await;
        assert_eq!(e, Enrichment::NoRsid);
        assert!(e.summary_line().is_none());
    }

    #[tokio::test]
    async fn test_full_chain_produces_summary_line() {
        let histo = FixedHistology::new(labels(&["A", "B"]));
        let answer = MetadataAnswer::new("Variant rs121913529 has clinvar null");

        let e = enrich(&answer, &StubMondoResolver::default(), &histo).await;
        assert_eq!(e.labels(), vec!["A".to_string(), "B".to_string()]);
        assert_eq!(
            e.summary_line().as_deref(),
            Some("**Additional Histology Info (from MONDO API):** A, B")
        );
        assert_eq!(histo.asked.lock().unwrap().as_slice(), &[OntologyId::new("MONDO:0013342")]);
    }

    #[tokio::test]
    async fn test_failed_fetch_yields_no_labels_but_is_visible() {
        let histo = FixedHistology::new(FetchOutcome::Failed("HTTP status 500".into()));
        let answer = MetadataAnswer::new("rs121913529: None");

        let e = enrich(&answer, &StubMondoResolver::default(), &histo).await;
        assert!(e.labels().is_empty());
        assert!(matches!(e, Enrichment::Fetched { histology: FetchOutcome::Failed(_), .. }));
    }

    #[tokio::test]
    async fn test_unresolved_rsid_stops_chain() {
        let histo = FixedHistology::new(labels(&["A"]));
        let answer = MetadataAnswer::new("rs1 None");

        let e = enrich(&answer, &NeverResolves, &histo).await;
        assert_eq!(e, Enrichment::Unresolved { rsid: ReferenceSnp::new("rs1") });
        assert!(histo.asked.lock().unwrap().is_empty());
    }
}
