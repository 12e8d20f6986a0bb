use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::CopilotError;

/// Hosts every deployment needs: the histology and prevalence APIs, the hosted
/// LLM, and loopback for local models and tests.
const DEFAULT_ALLOWLIST: &[&str] = &[
    "api.monarchinitiative.org",         // Monarch histopheno
    "www.orphadata.com",                 // Orphadata prevalence
    "generativelanguage.googleapis.com", // Gemini
    "localhost",
    "127.0.0.1",
];

/// An HTTP client that only talks to approved hosts.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default allowlist. `None` leaves requests
    /// without a timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self, CopilotError> {
        let allowlist = DEFAULT_ALLOWLIST.iter().map(|d| d.to_string()).collect();

        let mut builder = ClientBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CopilotError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Allows the host of `base_url`, if it parses.
    pub fn allow_url_host(&mut self, base_url: &str) {
        if let Some(host) = Url::parse(base_url).ok().and_then(|u| u.host_str().map(String::from)) {
            self.allowlist.insert(host);
        }
    }

    /// Validates if a URL is permitted under the current policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                // Exact host or a subdomain of an allowed host
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{}", allowed)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, CopilotError> {
        self.request(reqwest::Method::GET, url)
    }

    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, CopilotError> {
        self.request(reqwest::Method::POST, url)
    }

    pub fn request(&self, method: reqwest::Method, url: &str) -> Result<reqwest::RequestBuilder, CopilotError> {
        if !self.is_allowed(url) {
            return Err(CopilotError::SecurityError(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.request(method, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SandboxClient {
        SandboxClient::new(Some(Duration::from_secs(10))).unwrap()
    }

    #[test]
    fn test_default_hosts_allowed() {
        let c = client();
        assert!(c.is_allowed("https://api.monarchinitiative.org/v3/api/histopheno/MONDO:0013342?format=json"));
        assert!(c.is_allowed("https://www.orphadata.com/api/prevalence/ORPHA:558"));
        assert!(c.is_allowed("http://127.0.0.1:8080/v1/chat/completions"));
    }

    #[test]
    fn test_unknown_host_blocked() {
        let c = client();
        assert!(!c.is_allowed("https://evil.example.com/exfil"));
        assert!(c.get("https://evil.example.com/exfil").is_err());
        assert!(!c.is_allowed("not a url"));
    }

    #[test]
    fn test_allow_url_host() {
        let mut c = client();
        c.allow_url_host("https://monarch.internal.lab:8443/api");
        assert!(c.is_allowed("https://monarch.internal.lab:8443/api/histopheno/X"));
    }

    #[test]
    fn test_suffix_must_be_subdomain() {
        let c = client();
        assert!(!c.is_allowed("https://notlocalhost/"));
    }
}
