//! Monarch Initiative API client.
//!
//! Endpoint: https://api.monarchinitiative.org/v3/api/histopheno/{id}?format=json
//! Returns `{"items": [{"label": "..."}, ...]}`; items without a label are skipped.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use copilot_common::sandbox::SandboxClient as Client;
use copilot_common::{CopilotError, FetchOutcome, HistologyLabels, OntologyId};
use tracing::{debug, instrument, warn};

use crate::HistologySource;

pub const MONARCH_API_URL: &str = "https://api.monarchinitiative.org";

pub struct MonarchClient {
    client: Client,
    base_url: String,
}

impl MonarchClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CopilotError> {
        let mut client = Client::new(Some(timeout))?;
        client.allow_url_host(base_url);
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    async fn fetch(&self, id: &OntologyId) -> Result<serde_json::Value, CopilotError> {
        let url = format!("{}/v3/api/histopheno/{}", self.base_url, id);
        let resp = self.client
            .get(&url)?
            .query(&[("format", "json")])
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json::<serde_json::Value>().await?)
    }
}

/// Pulls `label` strings out of `items`, in order. Missing keys mean no labels.
pub fn labels_from_json(json: &serde_json::Value) -> HistologyLabels {
    json["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("label").and_then(|l| l.as_str()))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl HistologySource for MonarchClient {
    #[instrument(skip(self), fields(ontology_id = %id))]
    async fn histology(&self, id: &OntologyId) -> FetchOutcome<HistologyLabels> {
        let started = Instant::now();
        match self.fetch(id).await {
            Ok(json) => {
                let labels = labels_from_json(&json);
                debug!(
                    count = labels.len(),
                    latency_ms = started.elapsed().as_millis() as u64,
                    "Histology labels fetched"
                );
                if labels.is_empty() {
                    FetchOutcome::Empty
                } else {
                    FetchOutcome::Found(labels)
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    latency_ms = started.elapsed().as_millis() as u64,
                    "Histology lookup failed"
                );
                FetchOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MONDO: &str = "MONDO:0013342";

    async fn client_for(server: &MockServer) -> MonarchClient {
        MonarchClient::new(&server.uri(), Duration::from_secs(10)).unwrap()
    }

    #[tokio::test]
    async fn test_items_without_label_are_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v3/api/histopheno/{MONDO}")))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"label": "A"}, {"label": "B"}, {}]
            })))
            .mount(&server)
            .await;

        let outcome = client_for(&server).await.histology(&OntologyId::new(MONDO)).await;
        assert_eq!(outcome, FetchOutcome::Found(vec!["A".to_string(), "B".to_string()]));
    }

    #[tokio::test]
    async fn test_server_error_is_failed_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let outcome = client_for(&server).await.histology(&OntologyId::new(MONDO)).await;
        assert!(outcome.is_failed());
        assert!(outcome.unwrap_or_empty().is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_body_is_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let outcome = client_for(&server).await.histology(&OntologyId::new(MONDO)).await;
        assert!(outcome.is_failed());
    }

    #[tokio::test]
    async fn test_missing_items_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"total": 0})))
            .mount(&server)
            .await;

        let outcome = client_for(&server).await.histology(&OntologyId::new(MONDO)).await;
        assert_eq!(outcome, FetchOutcome::Empty);
    }

    #[test]
    fn test_non_string_label_is_skipped() {
        let json = serde_json::json!({"items": [{"label": null}, {"label": 3}, {"label": "Adenocarcinoma"}]});
        assert_eq!(labels_from_json(&json), vec!["Adenocarcinoma".to_string()]);
    }
}
