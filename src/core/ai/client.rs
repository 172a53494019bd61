//! HTTP client for the generative-AI provider
//!
//! Speaks the Gemini-style `generateContent` wire format: a prompt goes in
//! as a single user turn, the first candidate's text parts come back out.

use super::error::{ProviderError, ProviderErrorMapper};
use crate::config::AiConfig;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

const PROVIDER: &str = "gemini";

/// Minimal prompt used by the liveness probe
const PROBE_PROMPT: &str = "ping";

/// Credentialed client for one API key
#[derive(Debug, Clone)]
pub struct ProviderClient {
    api_key: String,
    model: String,
    base_url: String,
    max_output_tokens: Option<u32>,
    request_timeout: Duration,
    http_client: Client,
}

impl ProviderClient {
    /// Build a client for the given API key
    pub fn new(api_key: impl Into<String>, config: &AiConfig) -> Result<Self, ProviderError> {
        let http_client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| {
                ProviderError::network(PROVIDER, format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key: api_key.into(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_output_tokens: config.max_output_tokens,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            http_client,
        })
    }

    /// Generate a text completion for the prompt
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = self.build_request(prompt);
        let response = self.send_request(body).await?;
        Self::extract_text(&response)
    }

    /// Liveness probe: a minimal completion call
    pub async fn probe(&self) -> Result<(), ProviderError> {
        self.generate(PROBE_PROMPT).await.map(|_| ())
    }

    fn build_request(&self, prompt: &str) -> Value {
        let mut request = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }]
        });

        if let Some(max_tokens) = self.max_output_tokens {
            request["generationConfig"] = json!({"maxOutputTokens": max_tokens});
        }

        request
    }

    async fn send_request(&self, body: Value) -> Result<Value, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        debug!(model = %self.model, "sending generation request");

        let response = timeout(
            self.request_timeout,
            self.http_client.post(&url).headers(headers).json(&body).send(),
        )
        .await
        .map_err(|_| ProviderError::timeout(PROVIDER, "Request timeout"))?
        .map_err(|e| ProviderError::network(PROVIDER, format!("Network error: {}", e)))?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            ProviderError::network(PROVIDER, format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            return Err(ProviderErrorMapper::from_http_status(
                PROVIDER,
                status.as_u16(),
                &response_text,
            ));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            ProviderError::parse(PROVIDER, format!("Failed to parse response JSON: {}", e))
        })
    }

    /// Join the text parts of the first candidate
    fn extract_text(response: &Value) -> Result<String, ProviderError> {
        let parts = response
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| ProviderError::parse(PROVIDER, "No candidates in response"))?;

        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect();

        if text.is_empty() {
            return Err(ProviderError::parse(
                PROVIDER,
                "Candidate contained no text parts",
            ));
        }
        Ok(text)
    }
}
