//! Configuration loading for CRISPR Copilot.
//! Reads copilot.toml from the current directory or path in COPILOT_CONFIG env var.
//! Secrets never live in the file; see [`Secrets`].

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    Gemini,
    OpenaiCompatible,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: LlmProvider,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Overrides the provider's public endpoint. Required for `openai_compatible`.
    pub base_url: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_provider()    -> LlmProvider { LlmProvider::Gemini }
fn default_llm_model()   -> String { "gemini-2.0-flash-lite-001".to_string() }
fn default_temperature() -> f32 { 0.3 }
fn default_max_tokens()  -> u32 { 1500 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_llm_model(),
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default = "default_db_name")]
    pub dbname: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Tables the SQL agent may see. Empty means every public table.
    #[serde(default)]
    pub include_tables: Vec<String>,
}

fn default_db_host()         -> String { "localhost".to_string() }
fn default_db_port()         -> u16    { 5432 }
fn default_db_user()         -> String { "postgres".to_string() }
fn default_db_name()         -> String { "mEdit".to_string() }
fn default_max_connections() -> usize  { 4 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            dbname: default_db_name(),
            max_connections: default_max_connections(),
            include_tables: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_monarch_url")]
    pub monarch_base_url: String,
    #[serde(default = "default_orphadata_url")]
    pub orphadata_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_mondo_id")]
    pub fallback_mondo_id: String,
}

fn default_monarch_url()   -> String { copilot_sources::monarch::MONARCH_API_URL.to_string() }
fn default_orphadata_url() -> String { copilot_sources::orphadata::ORPHADATA_API_URL.to_string() }
fn default_timeout_secs()  -> u64    { 10 }
fn default_mondo_id()      -> String { copilot_sources::resolver::DEFAULT_MONDO_ID.to_string() }

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            monarch_base_url: default_monarch_url(),
            orphadata_base_url: default_orphadata_url(),
            timeout_secs: default_timeout_secs(),
            fallback_mondo_id: default_mondo_id(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub structured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "bool_true")]
    pub query_db_on_fallback: bool,
}

fn bool_true() -> bool { true }

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self { query_db_on_fallback: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "0.0.0.0:3000".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl ServerConfig {
    /// COPILOT_BIND wins over the file.
    pub fn bind_addr(&self) -> String {
        resolve_bind(std::env::var("COPILOT_BIND").ok(), &self.bind)
    }
}

fn resolve_bind(from_env: Option<String>, configured: &str) -> String {
    match from_env {
        Some(addr) if !addr.trim().is_empty() => addr,
        _ => configured.to_string(),
    }
}

mod tests;

impl Config {
    /// Load configuration from copilot.toml.
    /// Checks COPILOT_CONFIG env var first, then current directory.
    /// Returns the defaults, and `false`, when the file does not exist.
    pub fn load() -> anyhow::Result<(Self, bool)> {
        let path = std::env::var("COPILOT_CONFIG")
            .unwrap_or_else(|_| "copilot.toml".to_string());

        if !Path::new(&path).exists() {
            return Ok((Config::default(), false));
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {path}: {e}"))?;
        Ok((config, true))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Credentials read from the environment only.
#[derive(Debug, Default)]
pub struct Secrets {
    pub db_password: Option<SecretString>,
    pub gemini_api_key: Option<SecretString>,
    pub llm_api_key: Option<SecretString>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self {
            db_password: secret_var("COPILOT_DB_PASSWORD"),
            gemini_api_key: secret_var("COPILOT_GEMINI_API_KEY"),
            llm_api_key: secret_var("COPILOT_LLM_API_KEY"),
        }
    }
}

fn secret_var(name: &str) -> Option<SecretString> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
}
