//! LLM Backend Traits
//!
//! Trait definitions for the generative model behind the comedy assistant.
//! Every request the lab makes expects structured JSON back, so a request
//! always carries the schema the answer must follow.

use async_trait::async_trait;
use thiserror::Error;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Failure talking to the model provider
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No API key was configured for a provider that needs one
    #[error("no API key configured for {provider}")]
    MissingCredential {
        /// Provider name
        provider: &'static str,
    },

    /// Connection, timeout or body read failure
    #[error("request failed: {0}")]
    Transport(String),

    /// Provider answered with a non-success HTTP status
    #[error("provider returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Provider answered without any text
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// Text did not match the requested structure
    #[error("could not parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// A single structured generation request
#[derive(Clone, Debug, PartialEq)]
pub struct LlmRequest {
    /// Instruction prompt
    pub prompt: String,
    /// Model to use (backend-specific identifier)
    pub model: String,
    /// Temperature (0.0-1.0, higher = more creative)
    pub temperature: f32,
    /// JSON Schema the answer must follow
    pub response_schema: serde_json::Value,
}

impl LlmRequest {
    /// Create a request with prompt, model and response schema
    pub fn new(
        prompt: impl Into<String>,
        model: impl Into<String>,
        response_schema: serde_json::Value,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            response_schema,
        }
    }

    /// Set temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 1.0);
        self
    }
}

/// Response from a generation request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LlmResponse {
    /// The raw response text (expected to be JSON)
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Response generation time in milliseconds
    pub duration_ms: Option<u64>,
}

/// LLM Backend trait
///
/// Implement this trait to add support for a different model provider.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Get the backend name (e.g., "Gemini", "Ollama")
    fn name(&self) -> &str;

    /// Check if the backend is configured and reachable
    async fn health_check(&self) -> bool;

    /// Send a request and wait for the complete response
    async fn send(&self, request: &LlmRequest) -> Result<LlmResponse, GatewayError>;
}
