//! CRISPR Copilot — companion web app for the mEdit variant database.
//! Entry point for the server binary.

mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use copilot_db::{Database, DbSettings, LlmSqlAgent};
use copilot_llm::backend::{GeminiBackend, GenerationDefaults, OpenAiCompatibleBackend};
use copilot_llm::LlmBackend;
use copilot_sources::{MonarchClient, OrphadataClient, StubMondoResolver};
use copilot_workflow::{ServiceContext, Workflow, WorkflowOptions};
use secrecy::SecretString;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Config, LlmProvider, Secrets};

fn build_llm_backend(config: &Config, secrets: &Secrets) -> anyhow::Result<Arc<dyn LlmBackend>> {
    let defaults = GenerationDefaults {
        temperature: config.llm.temperature,
        max_tokens: config.llm.max_tokens,
    };

    let backend: Arc<dyn LlmBackend> = match config.llm.provider {
        LlmProvider::Gemini => {
            let key = secrets
                .gemini_api_key
                .clone()
                .context("Gemini selected but COPILOT_GEMINI_API_KEY is not set")?;
            let backend = match &config.llm.base_url {
                Some(url) => GeminiBackend::with_base_url(key, &config.llm.model, url)?,
                None => GeminiBackend::new(key, &config.llm.model)?,
            };
            Arc::new(backend.with_defaults(defaults))
        }
        LlmProvider::OpenaiCompatible => {
            let url = config
                .llm
                .base_url
                .as_deref()
                .context("llm.base_url is required for the openai_compatible provider")?;
            let backend =
                OpenAiCompatibleBackend::new(url, &config.llm.model, secrets.llm_api_key.clone())?;
            Arc::new(backend.with_defaults(defaults))
        }
    };
    Ok(backend)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("copilot=debug,info")),
        )
        .init();

    info!("CRISPR Copilot starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let (config, from_file) = Config::load()?;
    if from_file {
        info!(provider = ?config.llm.provider, model = %config.llm.model, "Configuration loaded");
    } else {
        tracing::warn!("No copilot.toml found, running with defaults");
    }
    let secrets = Secrets::from_env();

    let llm = build_llm_backend(&config, &secrets)?;
    info!(backend = llm.backend_name(), model = llm.model_id(), "LLM backend ready");

    // Postgres pool for the SQL agent
    let db_settings = DbSettings {
        host: config.database.host.clone(),
        port: config.database.port,
        user: config.database.user.clone(),
        password: secrets
            .db_password
            .clone()
            .unwrap_or_else(|| SecretString::from(String::new())),
        dbname: config.database.dbname.clone(),
        max_connections: config.database.max_connections,
    };
    let db = Database::connect(&db_settings)?;
    if let Err(e) = db.ping().await {
        tracing::warn!(error = %e, "Database not reachable yet; queries will retry per request");
    }
    let sql_agent = LlmSqlAgent::new(llm.clone(), db)
        .with_include_tables(config.database.include_tables.clone());

    // Reference-data clients
    let timeout = Duration::from_secs(config.sources.timeout_secs);
    let monarch = MonarchClient::new(&config.sources.monarch_base_url, timeout)?;
    let orphadata = OrphadataClient::new(&config.sources.orphadata_base_url, timeout)?;
    let resolver = StubMondoResolver::new(config.sources.fallback_mondo_id.clone());

    let options = WorkflowOptions {
        structured_classification: config.classifier.structured,
        query_db_on_fallback: config.workflow.query_db_on_fallback,
    };
    let ctx = ServiceContext::with_options(
        llm,
        Arc::new(sql_agent),
        Arc::new(resolver),
        Arc::new(monarch),
        options,
    );
    let workflow = Workflow::new(Arc::new(ctx));

    // Build app state and router
    let state = copilot_web::state::AppState::new(workflow, Arc::new(orphadata));
    let router = copilot_web::router::build_router(state);

    // Start web server
    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Cannot bind {bind_addr}"))?;
    info!("Web UI listening on http://{}", bind_addr);

    axum::serve(listener, router).await?;

    Ok(())
}
