//! Postgres connection pool and query execution.

use async_trait::async_trait;
use deadpool_postgres::{Config as PgPoolConfig, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use secrecy::{ExposeSecret, SecretString};
use tokio_postgres::NoTls;

use crate::error::Result;
use crate::schema::ColumnInfo;

const COLUMNS_SQL: &str = "SELECT table_name::text, column_name::text, data_type::text
     FROM information_schema.columns
     WHERE table_schema = 'public'
     ORDER BY table_name, ordinal_position";

/// Connection settings. The password comes from the environment only.
#[derive(Debug)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub dbname: String,
    pub max_connections: usize,
}

/// What the SQL agent needs from a database.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// All columns of the public schema, in table/ordinal order.
    async fn columns(&self) -> Result<Vec<ColumnInfo>>;

    /// Runs a read-only query and returns each row as a JSON object.
    /// SQL NULLs come back as JSON `null`.
    async fn query_json(&self, sql: &str, row_limit: usize) -> Result<Vec<serde_json::Value>>;
}

/// Wraps a query so each row comes back as one JSON object. The inner query
/// sits on its own lines so a trailing `--` comment cannot swallow the wrapper.
fn wrap_row_json(sql: &str) -> String {
    format!("SELECT row_to_json(q) FROM (\n{sql}\n) AS q LIMIT $1")
}

/// Main database handle. Built once per process and shared read-only.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    pub fn connect(settings: &DbSettings) -> Result<Self> {
        let mut cfg = PgPoolConfig::new();
        cfg.host = Some(settings.host.clone());
        cfg.port = Some(settings.port);
        cfg.user = Some(settings.user.clone());
        cfg.password = Some(settings.password.expose_secret().to_string());
        cfg.dbname = Some(settings.dbname.clone());
        cfg.manager = Some(ManagerConfig { recycling_method: RecyclingMethod::Fast });
        cfg.pool = Some(PoolConfig::new(settings.max_connections));

        let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;
        tracing::info!(
            host = %settings.host,
            port = settings.port,
            dbname = %settings.dbname,
            "Postgres pool created"
        );
        Ok(Self { pool })
    }

    /// Checks out a connection and runs a trivial query.
    pub async fn ping(&self) -> Result<()> {
        let client = self.pool.get().await?;
        client.simple_query("SELECT 1").await?;
        Ok(())
    }
}

#[async_trait]
impl SqlExecutor for Database {
    async fn columns(&self) -> Result<Vec<ColumnInfo>> {
        let client = self.pool.get().await?;
        let rows = client.query(COLUMNS_SQL, &[]).await?;
        Ok(rows
            .iter()
            .map(|r| ColumnInfo {
                table: r.get(0),
                column: r.get(1),
                data_type: r.get(2),
            })
            .collect())
    }

    async fn query_json(&self, sql: &str, row_limit: usize) -> Result<Vec<serde_json::Value>> {
        let wrapped = wrap_row_json(sql);

        let mut client = self.pool.get().await?;
        let tx = client.build_transaction().read_only(true).start().await?;
        let rows = tx.query(wrapped.as_str(), &[&(row_limit as i64)]).await?;
        tx.rollback().await?;

        Ok(rows.iter().map(|r| r.get::<_, serde_json::Value>(0)).collect())
    }
}
