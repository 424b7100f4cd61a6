//! Comedy Assistant
//!
//! The three stateless operations the lab asks of a model. Theme generation
//! and expansion degrade to empty lists; refinement reports failure so the
//! draft can be left untouched.

use std::sync::Arc;

use super::prompts::{
    expand_prompt, expand_schema, parse_response, refine_prompt, refine_schema, themes_prompt,
    themes_schema, RefinedJoke, ThemeExpansion, ThemeIdeas,
};
use super::traits::{GatewayError, LlmBackend, LlmRequest, DEFAULT_TEMPERATURE};
use crate::types::{JokeParts, Technique};

/// Default answer language
pub const DEFAULT_LANGUAGE: &str = "Brazilian Portuguese";

/// Request/response gateway over an [`LlmBackend`]
#[derive(Clone)]
pub struct ComedyAssistant {
    backend: Arc<dyn LlmBackend>,
    model: String,
    language: String,
    temperature: f32,
}

impl std::fmt::Debug for ComedyAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComedyAssistant")
            .field("backend", &self.backend.name())
            .field("model", &self.model)
            .field("language", &self.language)
            .finish()
    }
}

impl ComedyAssistant {
    /// Create an assistant for a backend and model
    pub fn new(backend: Arc<dyn LlmBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Set the language answers are written in
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Backend name
    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Model identifier
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check the backend is usable
    pub async fn health_check(&self) -> bool {
        self.backend.health_check().await
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        prompt: String,
        schema: serde_json::Value,
    ) -> Result<T, GatewayError> {
        let request =
            LlmRequest::new(prompt, self.model.clone(), schema).with_temperature(self.temperature);
        let response = self.backend.send(&request).await?;
        tracing::debug!(
            backend = self.backend.name(),
            model = %response.model,
            duration_ms = ?response.duration_ms,
            "Assistant response received"
        );
        parse_response(&response.content)
    }

    /// Five theme ideas, optionally around a context; empty on failure
    pub async fn generate_themes(&self, context: Option<&str>) -> Vec<String> {
        let prompt = themes_prompt(context, &self.language);
        match self.request::<ThemeIdeas>(prompt, themes_schema()).await {
            Ok(answer) => answer
                .ideas
                .into_iter()
                .map(|idea| idea.trim().to_string())
                .filter(|idea| !idea.is_empty())
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Theme generation failed");
                Vec::new()
            }
        }
    }

    /// Premise / setup / punchline approaches to a theme; empty on failure
    pub async fn expand_theme(&self, theme: &str) -> Vec<JokeParts> {
        let prompt = expand_prompt(theme, &self.language);
        match self.request::<ThemeExpansion>(prompt, expand_schema()).await {
            Ok(answer) => answer.suggestions,
            Err(e) => {
                tracing::warn!(error = %e, theme, "Theme expansion failed");
                Vec::new()
            }
        }
    }

    /// Rewrite a joke with a technique
    pub async fn refine_joke(
        &self,
        parts: &JokeParts,
        technique: Technique,
    ) -> Result<RefinedJoke, GatewayError> {
        let prompt = refine_prompt(parts, technique, &self.language);
        self.request(prompt, refine_schema()).await.map_err(|e| {
            tracing::warn!(error = %e, technique = %technique, "Refinement failed");
            e
        })
    }
}
