//! Database and agent error types.

use copilot_llm::LlmError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Pool configuration error: {0}")]
    PoolConfig(#[from] deadpool_postgres::CreatePoolError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Generated SQL rejected: {0}")]
    Rejected(String),

    #[error("No tables visible to the agent")]
    EmptySchema,
}
