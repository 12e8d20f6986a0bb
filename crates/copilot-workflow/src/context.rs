//! Process-wide service handles, passed explicitly into every request.

use std::sync::Arc;

use copilot_db::SqlAgent;
use copilot_llm::{Classifier, LlmBackend};
use copilot_sources::{HistologySource, OntologyResolver};

#[derive(Debug, Clone, Copy)]
pub struct WorkflowOptions {
    /// Ask the classifier for a JSON verdict before falling back to the
    /// "yes" substring test.
    pub structured_classification: bool,
    /// On a negative verdict, also run the SQL agent after the generic chat
    /// answer.
    pub query_db_on_fallback: bool,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            structured_classification: false,
            query_db_on_fallback: true,
        }
    }
}

/// Constructed once at startup and read-only afterwards. Cloning is cheap.
#[derive(Clone)]
pub struct ServiceContext {
    pub llm: Arc<dyn LlmBackend>,
    pub classifier: Arc<Classifier>,
    pub sql_agent: Arc<dyn SqlAgent>,
    pub resolver: Arc<dyn OntologyResolver>,
    pub histology: Arc<dyn HistologySource>,
    pub options: WorkflowOptions,
}

impl ServiceContext {
    pub fn new(
        llm: Arc<dyn LlmBackend>,
        sql_agent: Arc<dyn SqlAgent>,
        resolver: Arc<dyn OntologyResolver>,
        histology: Arc<dyn HistologySource>,
    ) -> Self {
        Self::with_options(llm, sql_agent, resolver, histology, WorkflowOptions::default())
    }

    pub fn with_options(
        llm: Arc<dyn LlmBackend>,
        sql_agent: Arc<dyn SqlAgent>,
        resolver: Arc<dyn OntologyResolver>,
        histology: Arc<dyn HistologySource>,
        options: WorkflowOptions,
    ) -> Self {
        let classifier = Classifier::new(llm.clone())
            .with_structured_output(options.structured_classification);
        Self {
            llm,
            classifier: Arc::new(classifier),
            sql_agent,
            resolver,
            histology,
            options,
        }
    }
}
