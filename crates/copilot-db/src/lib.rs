//! copilot-db — Variant-metadata database access and the LLM-driven SQL agent.
//!
//! The agent turns a natural-language question into one read-only query,
//! runs it against Postgres, and summarises the rows back into prose.

pub mod error;
pub mod database;
pub mod schema;
pub mod guard;
pub mod agent;

pub use agent::{LlmSqlAgent, SqlAgent};
pub use database::{Database, DbSettings, SqlExecutor};
pub use error::{AgentError, DbError};
