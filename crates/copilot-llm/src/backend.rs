//! LLM backend trait and concrete implementations.
//!
//! Backends:
//!   GeminiBackend           — Google Gemini API (gemini-2.0-flash-lite, …)
//!   OpenAiCompatibleBackend — any OpenAI-compatible endpoint (Ollama,
//!                             LMStudio, vLLM, OpenRouter, …)

use std::time::Duration;

use async_trait::async_trait;
use copilot_common::sandbox::SandboxClient;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("Request blocked: {0}")]
    Blocked(String),
    #[error("API error [{status}]: {message}")]
    ApiError { status: u16, message: String },
}

// ── Request / Response ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,   // "system" | "user" | "assistant"
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl LlmRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages, model: None, max_tokens: None, temperature: None }
    }

    pub fn system_text(&self) -> Option<&str> {
        self.messages.iter().find(|m| m.role == "system").map(|m| m.content.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Sampling defaults applied when a request leaves them unset.
#[derive(Debug, Clone, Copy)]
pub struct GenerationDefaults {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self { temperature: 0.3, max_tokens: 1500 }
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError>;
    fn model_id(&self) -> &str;
    fn backend_name(&self) -> &'static str;
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_openai_response(json: &serde_json::Value, fallback_model: &str) -> LlmResponse {
    LlmResponse {
        content: json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string(),
        model: json["model"]
            .as_str()
            .unwrap_or(fallback_model)
            .to_string(),
        prompt_tokens:     json["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
        completion_tokens: json["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
    }
}

async fn check_response_status(resp: reqwest::Response) -> Result<serde_json::Value, LlmError> {
    let status = resp.status().as_u16();
    let text = resp.text().await?;
    if status >= 400 {
        let body: serde_json::Value = serde_json::from_str(&text).unwrap_or_default();
        let msg = body["error"]["message"]
            .as_str()
            .or_else(|| body["message"].as_str())
            .unwrap_or("unknown API error")
            .to_string();
        return Err(LlmError::ApiError { status, message: msg });
    }
    Ok(serde_json::from_str(&text)?)
}

fn sandboxed(timeout: Option<Duration>, base_url: &str) -> Result<SandboxClient, LlmError> {
    let mut client = SandboxClient::new(timeout)
        .map_err(|e| LlmError::Unavailable(e.to_string()))?;
    client.allow_url_host(base_url);
    Ok(client)
}

// ── 1. Google Gemini ──────────────────────────────────────────────────────────

pub struct GeminiBackend {
    pub model: String,
    base_url: String,
    api_key: SecretString,
    defaults: GenerationDefaults,
    client: SandboxClient,
}

impl GeminiBackend {
    /// No request timeout: completions may block as long as the service takes.
    pub fn new(api_key: SecretString, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, model, GEMINI_API_URL)
    }

    pub fn with_base_url(
        api_key: SecretString,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = sandboxed(None, &base_url)?;
        Ok(Self {
            model: model.into(),
            base_url,
            api_key,
            defaults: GenerationDefaults::default(),
            client,
        })
    }

    pub fn with_defaults(mut self, defaults: GenerationDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let model = req.model.as_deref().unwrap_or(&self.model);
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        // System message → systemInstruction, every other turn → contents
        let contents: Vec<serde_json::Value> = req.messages.iter()
            .filter(|m| m.role != "system")
            .map(|m| {
                let role = if m.role == "assistant" { "model" } else { "user" };
                serde_json::json!({
                    "role": role,
                    "parts": [{ "text": m.content }]
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": req.max_tokens.unwrap_or(self.defaults.max_tokens),
                "temperature":     req.temperature.unwrap_or(self.defaults.temperature),
            }
        });
        if let Some(sys) = req.system_text() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": sys }]
            });
        }

        let resp = self.client
            .post(&url)
            .map_err(|e| LlmError::Blocked(e.to_string()))?
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await?;
        let json = check_response_status(resp).await?;

        let content = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("")
            .to_string();

        Ok(LlmResponse {
            content,
            model: model.to_string(),
            prompt_tokens: json["usageMetadata"]["promptTokenCount"]
                .as_u64().unwrap_or(0) as u32,
            completion_tokens: json["usageMetadata"]["candidatesTokenCount"]
                .as_u64().unwrap_or(0) as u32,
        })
    }

    fn model_id(&self) -> &str { &self.model }
    fn backend_name(&self) -> &'static str { "gemini" }
}

// ── 2. OpenAI-Compatible (Ollama, LMStudio, vLLM, OpenRouter, …) ─────────────

pub struct OpenAiCompatibleBackend {
    pub base_url: String,
    pub model: String,
    api_key: Option<SecretString>,
    defaults: GenerationDefaults,
    client: SandboxClient,
}

impl OpenAiCompatibleBackend {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<SecretString>,
    ) -> Result<Self, LlmError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = sandboxed(None, &base_url)?;
        Ok(Self {
            base_url,
            model: model.into(),
            api_key,
            defaults: GenerationDefaults::default(),
            client,
        })
    }

    pub fn with_defaults(mut self, defaults: GenerationDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    fn endpoint(&self) -> String {
        if self.base_url.ends_with("/chat/completions") {
            self.base_url.clone()
        } else if self.base_url.ends_with("/v1") {
            format!("{}/chat/completions", self.base_url)
        } else {
            format!("{}/v1/chat/completions", self.base_url)
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAiCompatibleBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let body = serde_json::json!({
            "model":       req.model.as_deref().unwrap_or(&self.model),
            "messages":    req.messages,
            "max_tokens":  req.max_tokens.unwrap_or(self.defaults.max_tokens),
            "temperature": req.temperature.unwrap_or(self.defaults.temperature),
        });
        let mut builder = self.client
            .post(&self.endpoint())
            .map_err(|e| LlmError::Blocked(e.to_string()))?;
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }
        let resp = builder.json(&body).send().await?;
        let json = check_response_status(resp).await?;
        Ok(parse_openai_response(&json, &self.model))
    }

    fn model_id(&self) -> &str { &self.model }
    fn backend_name(&self) -> &'static str { "openai_compatible" }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
