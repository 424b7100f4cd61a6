//! Ollama Backend Implementation
//!
//! LLM backend for Ollama (local LLM server), using the `/api/generate`
//! endpoint in batch mode. Ollama accepts a JSON Schema in the `format`
//! field and constrains the answer to it.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::traits::{GatewayError, LlmBackend, LlmRequest, LlmResponse, DEFAULT_TEMPERATURE};

/// Default Ollama host
pub const DEFAULT_OLLAMA_HOST: &str = "localhost";

/// Default Ollama port
pub const DEFAULT_OLLAMA_PORT: u16 = 11434;

/// Ollama backend client
#[derive(Clone)]
pub struct OllamaBackend {
    /// Host address
    host: String,
    /// Port number
    port: u16,
    /// HTTP client
    http_client: reqwest::Client,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            http_client: super::http_client(timeout),
        }
    }

    /// Get the base URL
    fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Get generate endpoint URL
    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url())
    }

    /// Get tags endpoint URL
    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url())
    }

    /// Request body for `/api/generate`
    fn request_body(request: &LlmRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": request.model,
            "prompt": request.prompt,
            "stream": false,
            "format": request.response_schema,
        });

        if (request.temperature - DEFAULT_TEMPERATURE).abs() > f32::EPSILON {
            body["options"] = serde_json::json!({
                "temperature": request.temperature
            });
        }

        body
    }
}

impl Default for OllamaBackend {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_HOST, DEFAULT_OLLAMA_PORT, Duration::from_secs(120))
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(self.tags_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok()
    }

    async fn send(&self, request: &LlmRequest) -> Result<LlmResponse, GatewayError> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(self.generate_url())
            .json(&Self::request_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        let data: serde_json::Value = response.json().await?;

        let content = data
            .get("response")
            .and_then(|r| r.as_str())
            .unwrap_or("")
            .to_string();

        if content.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            duration_ms: Some(start.elapsed().as_millis() as u64),
        })
    }
}
