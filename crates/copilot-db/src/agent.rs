//! LLM-driven SQL agent: question → SQL → rows → answer.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use copilot_common::MetadataAnswer;
use copilot_llm::audit::complete_audited;
use copilot_llm::prompt::{sql_query_prompt, sql_summary_prompt};
use copilot_llm::LlmBackend;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use crate::database::SqlExecutor;
use crate::error::AgentError;
use crate::guard::ensure_read_only;
use crate::schema::render_schema;

pub const DEFAULT_ROW_LIMIT: usize = 50;

/// Answers natural-language questions from the variant-metadata store.
#[async_trait]
pub trait SqlAgent: Send + Sync {
    async fn run(&self, question: &str) -> Result<MetadataAnswer, AgentError>;
}

pub struct LlmSqlAgent<E> {
    llm: Arc<dyn LlmBackend>,
    executor: E,
    include_tables: Vec<String>,
    row_limit: usize,
    schema: OnceCell<String>,
}

impl<E: SqlExecutor> LlmSqlAgent<E> {
    pub fn new(llm: Arc<dyn LlmBackend>, executor: E) -> Self {
        Self {
            llm,
            executor,
            include_tables: Vec::new(),
            row_limit: DEFAULT_ROW_LIMIT,
            schema: OnceCell::new(),
        }
    }

    pub fn with_include_tables(mut self, tables: Vec<String>) -> Self {
        self.include_tables = tables;
        self
    }

    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = limit.max(1);
        self
    }

    /// Schema text, introspected on first use and cached for the process.
    async fn schema(&self) -> Result<&str, AgentError> {
        let schema = self
            .schema
            .get_or_try_init(|| async {
                let columns = self.executor.columns().await?;
                let rendered = render_schema(&columns, &self.include_tables);
                if rendered.is_empty() {
                    return Err(AgentError::EmptySchema);
                }
                Ok::<_, AgentError>(rendered)
            })
            .await?;
        Ok(schema.as_str())
    }
}

fn render_rows(rows: &[serde_json::Value]) -> String {
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    rows.iter().map(|r| r.to_string()).collect::<Vec<_>>().join("\n")
}

#[async_trait]
impl<E: SqlExecutor> SqlAgent for LlmSqlAgent<E> {
    #[instrument(skip(self))]
    async fn run(&self, question: &str) -> Result<MetadataAnswer, AgentError> {
        let started = Instant::now();
        let schema = self.schema().await?;

        let req = sql_query_prompt(schema, question, self.row_limit).into_request();
        let generated = complete_audited(self.llm.as_ref(), req, "sql_generate").await?;
        let sql = ensure_read_only(&generated.content)?;
        debug!(sql = %sql, "Generated SQL accepted");

        let rows = self.executor.query_json(&sql, self.row_limit).await?;
        debug!(rows = rows.len(), "Query executed");

        let req = sql_summary_prompt(question, &sql, &render_rows(&rows)).into_request();
        let summary = complete_audited(self.llm.as_ref(), req, "sql_summarise").await?;

        tracing::info!(
            rows = rows.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "SQL agent answered"
        );
        Ok(MetadataAnswer::new(summary.content.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::schema::ColumnInfo;
    use copilot_llm::{LlmError, LlmRequest, LlmResponse};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedLlm {
        replies: Mutex<VecDeque<String>>,
        seen: Mutex<Vec<LlmRequest>>,
    }

    impl ScriptedLlm {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.iter().map(|s| s.to_string()).collect()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmBackend for ScriptedLlm {
        async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
            self.seen.lock().unwrap().push(req);
            let content = self.replies.lock().unwrap().pop_front()
                .ok_or_else(|| LlmError::Unavailable("script exhausted".into()))?;
            Ok(LlmResponse { content, model: "scripted".into(), prompt_tokens: 0, completion_tokens: 0 })
        }
        fn model_id(&self) -> &str { "scripted" }
        fn backend_name(&self) -> &'static str { "scripted" }
    }

    #[derive(Default)]
    struct FakeDb {
        rows: Vec<serde_json::Value>,
        queries: Mutex<Vec<String>>,
        introspections: AtomicUsize,
    }

    #[async_trait]
    impl SqlExecutor for FakeDb {
        async fn columns(&self) -> crate::error::Result<Vec<ColumnInfo>> {
            self.introspections.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                ColumnInfo { table: "VariantMetadata".into(), column: "hgvs".into(), data_type: "text".into() },
                ColumnInfo { table: "VariantMetadata".into(), column: "rsid".into(), data_type: "text".into() },
                ColumnInfo { table: "VariantMetadata".into(), column: "clinvar".into(), data_type: "text".into() },
            ])
        }

        async fn query_json(&self, sql: &str, _row_limit: usize) -> crate::error::Result<Vec<serde_json::Value>> {
            self.queries.lock().unwrap().push(sql.to_string());
            Ok(self.rows.clone())
        }
    }

    struct EmptyDb;

    #[async_trait]
    impl SqlExecutor for EmptyDb {
        async fn columns(&self) -> Result<Vec<ColumnInfo>, DbError> { Ok(Vec::new()) }
        async fn query_json(&self, _sql: &str, _row_limit: usize) -> Result<Vec<serde_json::Value>, DbError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_question_to_answer() {
        let llm = ScriptedLlm::new(&[
            "```sql\nSELECT * FROM \"VariantMetadata\" WHERE hgvs = 'chr1:123456A>T';\n```",
            "Variant chr1:123456A>T is rs397507444 with clinvar null.",
        ]);
        let db = FakeDb {
            rows: vec![serde_json::json!({"hgvs": "chr1:123456A>T", "rsid": "rs397507444", "clinvar": null})],
            ..Default::default()
        };
        let agent = LlmSqlAgent::new(llm.clone(), db);

        let answer = agent.run("chr1:123456A>T").await.unwrap();
        assert_eq!(answer.as_str(), "Variant chr1:123456A>T is rs397507444 with clinvar null.");

        let queries = agent.executor.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0], "SELECT * FROM \"VariantMetadata\" WHERE hgvs = 'chr1:123456A>T'");

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].messages[0].content.contains("VariantMetadata(hgvs text, rsid text, clinvar text)"));
        assert_eq!(seen[0].messages[1].content, "chr1:123456A>T");
        assert!(seen[1].messages[1].content.contains("\"clinvar\":null"));
    }

    #[tokio::test]
    async fn test_commented_sql_runs_without_the_comment() {
        let llm = ScriptedLlm::new(&[
            "SELECT * FROM \"VariantMetadata\" -- match hgvs",
            "No rows.",
        ]);
        let agent = LlmSqlAgent::new(llm, FakeDb::default());

        agent.run("chr1:123456A>T").await.unwrap();
        let queries = agent.executor.queries.lock().unwrap();
        assert_eq!(queries[0], "SELECT * FROM \"VariantMetadata\"");
    }

    #[tokio::test]
    async fn test_schema_is_introspected_once() {
        let llm = ScriptedLlm::new(&["SELECT 1", "one", "SELECT 2", "two"]);
        let agent = LlmSqlAgent::new(llm, FakeDb::default());

        agent.run("first").await.unwrap();
        agent.run("second").await.unwrap();
        assert_eq!(agent.executor.introspections.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_write_statement_is_rejected_before_execution() {
        let llm = ScriptedLlm::new(&["DROP TABLE \"VariantMetadata\""]);
        let agent = LlmSqlAgent::new(llm, FakeDb::default());

        let err = agent.run("delete everything").await.unwrap_err();
        assert!(matches!(err, AgentError::Rejected(_)));
        assert!(agent.executor.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_schema_fails() {
        let llm = ScriptedLlm::new(&[]);
        let agent = LlmSqlAgent::new(llm, EmptyDb);
        assert!(matches!(agent.run("anything").await, Err(AgentError::EmptySchema)));
    }

    #[test]
    fn test_render_rows_placeholder() {
        assert_eq!(render_rows(&[]), "(no rows)");
    }
}
