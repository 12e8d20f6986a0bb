//! Orphadata prevalence client.
//! Endpoint: https://www.orphadata.com/api/prevalence/{code}

use std::time::Duration;

use async_trait::async_trait;
use copilot_common::sandbox::SandboxClient as Client;
use copilot_common::{CopilotError, FetchOutcome};
use tracing::{instrument, warn};

use crate::PrevalenceSource;

pub const ORPHADATA_API_URL: &str = "https://www.orphadata.com";

pub struct OrphadataClient {
    client: Client,
    base_url: String,
}

impl OrphadataClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CopilotError> {
        let mut client = Client::new(Some(timeout))?;
        client.allow_url_host(base_url);
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    async fn fetch(&self, code: &str) -> Result<serde_json::Value, CopilotError> {
        let url = format!("{}/api/prevalence/{}", self.base_url, code);
        let resp = self.client.get(&url)?.send().await?.error_for_status()?;
        Ok(resp.json::<serde_json::Value>().await?)
    }
}

#[async_trait]
impl PrevalenceSource for OrphadataClient {
    #[instrument(skip(self))]
    async fn prevalence(&self, orphanet_code: &str) -> FetchOutcome<serde_json::Value> {
        match self.fetch(orphanet_code).await {
            Ok(json) => match json.get("prevalence") {
                Some(v) if !v.is_null() => FetchOutcome::Found(v.clone()),
                _ => FetchOutcome::Empty,
            },
            Err(e) => {
                warn!(error = %e, "Prevalence lookup failed");
                FetchOutcome::Failed(e.to_string())
            }
        }
    }
}
