//! Request-scoped value types flowing through one analyze request.
//! None of these are persisted; they live for the duration of a single click.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// User input
// ---------------------------------------------------------------------------

/// Free text typed by the user: a genomic coordinate, an HGVS string, or any
/// question at all. No local validation happens; the classifier decides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub text: String,
    /// A screenshot was uploaded alongside the text. Its content is never read.
    #[serde(default)]
    pub image_attached: bool,
}

impl UserInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), image_attached: false }
    }

    pub fn with_image(mut self, attached: bool) -> Self {
        self.image_attached = attached;
        self
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

// ---------------------------------------------------------------------------
// Classification verdict
// ---------------------------------------------------------------------------

/// How a verdict was derived from the completion text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// Case-insensitive substring test for "yes". Over-matches on phrasing
    /// such as "yes and no" or "no, yes means...".
    Heuristic,
    /// Parsed from a `{"suitable": bool}` object in the completion.
    Structured,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationVerdict {
    pub suitable: bool,
    pub source: VerdictSource,
    /// Raw completion text, kept for logging and display.
    pub explanation: String,
}

impl ClassificationVerdict {
    pub fn is_suitable(&self) -> bool {
        self.suitable
    }
}

// ---------------------------------------------------------------------------
// Metadata answer / identifiers
// ---------------------------------------------------------------------------

/// Natural-language answer produced by the SQL agent. May embed the literal
/// markers `None` or `null` where the database has no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataAnswer(String);

impl MetadataAnswer {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the answer contains `None` or `null` (case-sensitive).
    pub fn has_missing_fields(&self) -> bool {
        self.0.contains("None") || self.0.contains("null")
    }

    /// First whitespace-delimited token starting with `rs`, taken verbatim.
    pub fn first_rsid(&self) -> Option<ReferenceSnp> {
        self.0
            .split_whitespace()
            .find(|word| word.starts_with("rs"))
            .map(ReferenceSnp::new)
    }
}

impl fmt::Display for MetadataAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// dbSNP reference SNP cluster identifier, e.g. `rs121913529`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceSnp(String);

impl ReferenceSnp {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ReferenceSnp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monarch Disease Ontology identifier, e.g. `MONDO:0013342`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OntologyId(String);

impl OntologyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OntologyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable histology labels, in the order the API returned them.
pub type HistologyLabels = Vec<String>;

// ---------------------------------------------------------------------------
// Fetch outcome
// ---------------------------------------------------------------------------

/// Result of a fail-silent remote lookup. Never an error for the caller, but
/// "the service had nothing" and "the call failed" stay distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum FetchOutcome<T> {
    Found(T),
    Empty,
    Failed(String),
}

impl<T> FetchOutcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            FetchOutcome::Found(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: Default> FetchOutcome<T> {
    /// Collapse to the legacy "empty on any failure" view.
    pub fn unwrap_or_empty(self) -> T {
        self.found().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_markers() {
        assert!(MetadataAnswer::new("Gene: BRCA1, ClinVar: None").has_missing_fields());
        assert!(MetadataAnswer::new("{\"hgvs\": null}").has_missing_fields());
        assert!(!MetadataAnswer::new("Gene: BRCA1, ClinVar: Pathogenic").has_missing_fields());
        // Markers are case-sensitive
        assert!(!MetadataAnswer::new("none of the fields are NULL").has_missing_fields());
    }

    #[test]
    fn test_first_rsid_takes_first_match() {
        let answer = MetadataAnswer::new("Variant rs121913529 (also rs80357906) has clinvar None");
        assert_eq!(answer.first_rsid(), Some(ReferenceSnp::new("rs121913529")));
    }

    #[test]
    fn test_first_rsid_absent() {
        let answer = MetadataAnswer::new("The variant has no dbSNP entry: None");
        assert_eq!(answer.first_rsid(), None);
    }

    #[test]
    fn test_fetch_outcome_distinguishes_failure_from_empty() {
        let failed: FetchOutcome<Vec<String>> = FetchOutcome::Failed("timeout".into());
        let empty: FetchOutcome<Vec<String>> = FetchOutcome::Empty;
        assert!(failed.is_failed());
        assert!(!empty.is_failed());
        assert!(failed.unwrap_or_empty().is_empty());
        assert!(empty.unwrap_or_empty().is_empty());
    }

    #[test]
    fn test_user_input_deserialises_without_image_flag() {
        let input: UserInput = serde_json::from_str(r#"{"text":"chr1:123456A>T"}"#).unwrap();
        assert_eq!(input.as_str(), "chr1:123456A>T");
        assert!(!input.image_attached);
    }
}
