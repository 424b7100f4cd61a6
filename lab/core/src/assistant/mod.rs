//! AI Gateway
//!
//! Structured requests to a generative model through a common trait
//! interface.
//!
//! # Available Backends
//!
//! - **Gemini**: Google Generative Language API (default)
//! - **Ollama**: Local LLM server
//!
//! # Usage
//!
//! ```ignore
//! use lab_core::assistant::{ComedyAssistant, GeminiBackend};
//!
//! let backend = GeminiBackend::new(std::env::var("GEMINI_API_KEY").ok(), timeout);
//! let assistant = ComedyAssistant::new(Arc::new(backend), "gemini-2.5-pro");
//! let themes = assistant.generate_themes(Some("airports")).await;
//! ```

mod gateway;
mod gemini;
mod ollama;
mod prompts;
mod traits;

use std::sync::Arc;
use std::time::Duration;

pub use gateway::{ComedyAssistant, DEFAULT_LANGUAGE};
pub use gemini::{to_gemini_schema, GeminiBackend, GEMINI_BASE_URL};
pub use ollama::{OllamaBackend, DEFAULT_OLLAMA_HOST, DEFAULT_OLLAMA_PORT};
pub use prompts::{
    parse_response, strip_code_fence, RefinedJoke, ThemeExpansion, ThemeIdeas, SUGGESTION_COUNT,
    THEME_COUNT,
};
pub use traits::{GatewayError, LlmBackend, LlmRequest, LlmResponse, DEFAULT_TEMPERATURE};

use crate::config::{AssistantConfig, Provider};

/// Shared HTTP client construction for the backends
fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

/// Build the backend selected by configuration
#[must_use]
pub fn backend_from_config(config: &AssistantConfig) -> Arc<dyn LlmBackend> {
    let timeout = Duration::from_secs(config.timeout_secs);
    match config.provider {
        Provider::Gemini => Arc::new(GeminiBackend::new(config.api_key.clone(), timeout)),
        Provider::Ollama => Arc::new(OllamaBackend::new(
            config.ollama_host.clone(),
            config.ollama_port,
            timeout,
        )),
    }
}

/// Build a ready assistant from configuration
#[must_use]
pub fn assistant_from_config(config: &AssistantConfig) -> ComedyAssistant {
    ComedyAssistant::new(backend_from_config(config), config.model_name())
        .with_language(config.language.clone())
}
