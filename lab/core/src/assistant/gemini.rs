//! Gemini Backend Implementation
//!
//! LLM backend for Google's Generative Language REST API.
//!
//! # Gemini API
//!
//! - `POST /v1beta/models/{model}:generateContent` with the prompt as a
//!   single user part and a `generationConfig` asking for
//!   `application/json` output that follows `responseSchema`.
//! - The answer text is spread over `candidates[0].content.parts[*].text`.
//!
//! Gemini's schema dialect spells types in upper case (`OBJECT`, `STRING`),
//! so the JSON Schema carried by the request is converted before sending.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::traits::{GatewayError, LlmBackend, LlmRequest, LlmResponse};

/// Public endpoint of the Generative Language API
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini backend client
#[derive(Clone)]
pub struct GeminiBackend {
    /// API key; requests fail without one
    api_key: Option<String>,
    /// API root
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: GEMINI_BASE_URL.to_string(),
            http_client: super::http_client(timeout),
        }
    }

    /// Point the client at another API root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether a key is configured
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    fn request_body(request: &LlmRequest) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": {
                "temperature": request.temperature,
                "responseMimeType": "application/json",
                "responseSchema": to_gemini_schema(&request.response_schema),
            }
        })
    }
}

/// Convert a JSON Schema into Gemini's dialect (upper-case type names)
#[must_use]
pub fn to_gemini_schema(schema: &serde_json::Value) -> serde_json::Value {
    match schema {
        serde_json::Value::Object(map) => {
            let converted = map
                .iter()
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        ("type", serde_json::Value::String(t)) => {
                            serde_json::Value::String(t.to_uppercase())
                        }
                        _ => to_gemini_schema(value),
                    };
                    (key.clone(), value)
                })
                .collect();
            serde_json::Value::Object(converted)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(to_gemini_schema).collect())
        }
        other => other.clone(),
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(data: &serde_json::Value) -> String {
    data.pointer("/candidates/0/content/parts")
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn health_check(&self) -> bool {
        self.has_credential()
    }

    async fn send(&self, request: &LlmRequest) -> Result<LlmResponse, GatewayError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(GatewayError::MissingCredential { provider: "Gemini" });
        };
        let start = Instant::now();

        let response = self
            .http_client
            .post(self.generate_url(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        let data: serde_json::Value = response.json().await?;
        let content = extract_text(&data);

        if content.trim().is_empty() {
            tracing::debug!(response = %data, "Gemini returned no text");
            return Err(GatewayError::EmptyResponse);
        }

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            duration_ms: Some(start.elapsed().as_millis() as u64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_types_are_upper_cased() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "ideas": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["ideas"]
        });
        let converted = to_gemini_schema(&schema);
        assert_eq!(
            converted,
            serde_json::json!({
                "type": "OBJECT",
                "properties": {
                    "ideas": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["ideas"]
            })
        );
    }

    #[test]
    fn test_property_named_type_is_not_a_type_tag() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": { "type": { "type": "string" } }
        });
        let converted = to_gemini_schema(&schema);
        assert_eq!(converted["properties"]["type"]["type"], "STRING");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let data = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"ideas\":" }, { "text": "[]}" }] }
            }]
        });
        assert_eq!(extract_text(&data), "{\"ideas\":[]}");
        assert_eq!(extract_text(&serde_json::json!({})), "");
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let backend = GeminiBackend::new(Some("  ".into()), Duration::from_secs(5));
        assert!(!backend.has_credential());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let backend = GeminiBackend::new(None, Duration::from_secs(5));
        let request = LlmRequest::new("x", "gemini-2.5-pro", serde_json::json!({}));
        assert_eq!(
            backend.send(&request).await.unwrap_err(),
            GatewayError::MissingCredential { provider: "Gemini" }
        );
    }

    #[test]
    fn test_generate_url() {
        let backend = GeminiBackend::new(Some("k".into()), Duration::from_secs(5))
            .with_base_url("http://127.0.0.1:9/v1beta/");
        assert_eq!(
            backend.generate_url("gemini-2.5-pro"),
            "http://127.0.0.1:9/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }
}
