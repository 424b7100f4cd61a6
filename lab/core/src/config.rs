//! TOML Configuration File Support
//!
//! Centralized configuration loading for the lab, from a TOML file at
//! `~/.config/comedia-lab/config.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the binary through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # XDG Base Directory Compliance
//!
//! - Config: `$XDG_CONFIG_HOME/comedia-lab/config.toml`
//! - Data: `$XDG_DATA_HOME/comedia-lab/`
//!
//! # Example Configuration
//!
//! ```toml
//! [assistant]
//! provider = "gemini"
//! model = "gemini-2.5-pro"
//! language = "Brazilian Portuguese"
//! timeout_secs = 60
//!
//! [storage]
//! data_dir = "/home/me/.local/share/comedia-lab"
//!
//! [speech]
//! enabled = true
//! program = "espeak-ng"
//! voice = "pt-br"
//! words_per_minute = 160
//!
//! [share]
//! base_url = "comedia-lab://"
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assistant::{DEFAULT_LANGUAGE, DEFAULT_OLLAMA_HOST, DEFAULT_OLLAMA_PORT};

/// Application directory name under the XDG config and data roots
pub const APP_DIR: &str = "comedia-lab";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// Provider
// =============================================================================

/// Which model provider backs the assistant
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google Gemini
    #[default]
    Gemini,
    /// Local Ollama server
    Ollama,
}

impl Provider {
    /// Model used when none is configured
    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.5-pro",
            Self::Ollama => "llama3.2",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(ConfigError::ValidationError(format!(
                "unknown provider '{other}' (expected gemini or ollama)"
            ))),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Assistant section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantToml {
    /// "gemini" or "ollama"
    pub provider: Option<String>,
    /// Model identifier
    pub model: Option<String>,
    /// API key (Gemini)
    pub api_key: Option<String>,
    /// Language answers are written in
    pub language: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Ollama host
    pub ollama_host: Option<String>,
    /// Ollama port
    pub ollama_port: Option<u16>,
}

/// Storage section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageToml {
    /// Directory holding persisted collections and the log file
    pub data_dir: Option<PathBuf>,
}

/// Speech section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechToml {
    /// Whether read-aloud is offered at all
    pub enabled: Option<bool>,
    /// Synthesizer program
    pub program: Option<String>,
    /// Voice name passed to the synthesizer
    pub voice: Option<String>,
    /// Speaking rate
    pub words_per_minute: Option<u32>,
}

/// Share section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareToml {
    /// Prefix of shared guide links
    pub base_url: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabToml {
    /// Assistant configuration section
    pub assistant: AssistantToml,
    /// Storage configuration section
    pub storage: StorageToml,
    /// Speech configuration section
    pub speech: SpeechToml,
    /// Share configuration section
    pub share: ShareToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Assistant settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Model provider
    pub provider: Provider,
    /// Explicit model; `None` means the provider's default
    pub model: Option<String>,
    /// API key (Gemini)
    pub api_key: Option<String>,
    /// Language answers are written in
    pub language: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Ollama host
    pub ollama_host: String,
    /// Ollama port
    pub ollama_port: u16,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            api_key: None,
            language: DEFAULT_LANGUAGE.to_string(),
            timeout_secs: 60,
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            ollama_port: DEFAULT_OLLAMA_PORT,
        }
    }
}

impl AssistantConfig {
    /// Model to request
    #[must_use]
    pub fn model_name(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

/// Speech settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechConfig {
    /// Whether read-aloud is offered at all
    pub enabled: bool,
    /// Synthesizer program
    pub program: String,
    /// Voice name passed to the synthesizer
    pub voice: String,
    /// Speaking rate
    pub words_per_minute: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "espeak-ng".to_string(),
            voice: "pt-br".to_string(),
            words_per_minute: 160,
        }
    }
}

/// Default share link prefix
pub const DEFAULT_SHARE_BASE_URL: &str = "comedia-lab://";

/// Centralized configuration for the lab
#[derive(Clone, Debug)]
pub struct LabConfig {
    /// Assistant configuration
    pub assistant: AssistantConfig,

    /// Directory holding persisted collections and the log file
    pub data_dir: PathBuf,

    /// Speech configuration
    pub speech: SpeechConfig,

    /// Prefix of shared guide links
    pub share_base_url: String,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            assistant: AssistantConfig::default(),
            data_dir: default_data_dir(),
            speech: SpeechConfig::default(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl LabConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Reject values nothing downstream can work with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.speech.words_per_minute == 0 {
            return Err(ConfigError::ValidationError(
                "speech.words_per_minute must be greater than zero".to_string(),
            ));
        }
        if self.assistant.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "assistant.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.assistant.model_name().trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "assistant.model must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/comedia-lab/config.toml` or
/// `~/.config/comedia-lab/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join("config.toml"))
}

/// Get the default data directory
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(format!(".{APP_DIR}")))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if a
/// value fails validation. A missing config file is not an error.
pub fn load_config() -> Result<LabConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, reading the process environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<LabConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed, or a value
/// from any layer is invalid.
pub fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<LabConfig, ConfigError> {
    let mut config = LabConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: LabToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env)?;
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut LabConfig, toml: &LabToml) -> Result<(), ConfigError> {
    // Assistant settings
    if let Some(ref provider) = toml.assistant.provider {
        config.assistant.provider = provider.parse()?;
    }
    if toml.assistant.model.is_some() {
        config.assistant.model = toml.assistant.model.clone();
    }
    if toml.assistant.api_key.is_some() {
        config.assistant.api_key = toml.assistant.api_key.clone();
    }
    if let Some(ref language) = toml.assistant.language {
        config.assistant.language = language.clone();
    }
    if let Some(timeout) = toml.assistant.timeout_secs {
        config.assistant.timeout_secs = timeout;
    }
    if let Some(ref host) = toml.assistant.ollama_host {
        config.assistant.ollama_host = host.clone();
    }
    if let Some(port) = toml.assistant.ollama_port {
        config.assistant.ollama_port = port;
    }

    // Storage settings
    if let Some(ref dir) = toml.storage.data_dir {
        config.data_dir = dir.clone();
    }

    // Speech settings
    if let Some(enabled) = toml.speech.enabled {
        config.speech.enabled = enabled;
    }
    if let Some(ref program) = toml.speech.program {
        config.speech.program = program.clone();
    }
    if let Some(ref voice) = toml.speech.voice {
        config.speech.voice = voice.clone();
    }
    if let Some(wpm) = toml.speech.words_per_minute {
        config.speech.words_per_minute = wpm;
    }

    // Share settings
    if let Some(ref base_url) = toml.share.base_url {
        config.share_base_url = base_url.clone();
    }

    Ok(())
}

/// Apply environment variable overrides to the config
fn apply_env_config(
    config: &mut LabConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    // Assistant settings from environment
    if let Some(provider) = env("COMEDIA_LAB_PROVIDER") {
        config.assistant.provider = provider.parse()?;
        config.source = ConfigSource::Env;
    }
    if let Some(model) = env("COMEDIA_LAB_MODEL") {
        config.assistant.model = Some(model);
        config.source = ConfigSource::Env;
    }
    if let Some(key) = env("GEMINI_API_KEY").or_else(|| env("API_KEY")) {
        config.assistant.api_key = Some(key);
        config.source = ConfigSource::Env;
    }
    if let Some(host) = env("OLLAMA_HOST") {
        config.assistant.ollama_host = host;
        config.source = ConfigSource::Env;
    }
    if let Some(port) = env("OLLAMA_PORT") {
        if let Ok(p) = port.parse::<u16>() {
            config.assistant.ollama_port = p;
            config.source = ConfigSource::Env;
        }
    }

    // Storage settings from environment
    if let Some(dir) = env("COMEDIA_LAB_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
        config.source = ConfigSource::Env;
    }

    // Speech settings from environment
    if let Some(enabled) = env("COMEDIA_LAB_SPEECH") {
        config.speech.enabled = enabled != "0" && enabled.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
    if let Some(program) = env("COMEDIA_LAB_SPEECH_PROGRAM") {
        config.speech.program = program;
        config.source = ConfigSource::Env;
    }

    Ok(())
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Data directory override
    pub data_dir: Option<PathBuf>,

    /// Provider override
    pub provider: Option<Provider>,

    /// Model override
    pub model: Option<String>,

    /// Speech enabled override
    pub speech_enabled: Option<bool>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set data directory override
    #[must_use]
    pub fn with_data_dir(mut self, path: PathBuf) -> Self {
        self.data_dir = Some(path);
        self
    }

    /// Set provider override
    #[must_use]
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set model override
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = Some(model);
        self
    }

    /// Set speech enabled override
    #[must_use]
    pub fn with_speech_enabled(mut self, enabled: bool) -> Self {
        self.speech_enabled = Some(enabled);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut LabConfig) {
        if self.data_dir.is_some()
            || self.provider.is_some()
            || self.model.is_some()
            || self.speech_enabled.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref dir) = self.data_dir {
            config.data_dir = dir.clone();
        }

        if let Some(provider) = self.provider {
            config.assistant.provider = provider;
        }

        if let Some(ref model) = self.model {
            config.assistant.model = Some(model.clone());
        }

        if let Some(enabled) = self.speech_enabled {
            config.speech.enabled = enabled;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Default Configuration Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = LabConfig::default();

        assert_eq!(config.assistant.provider, Provider::Gemini);
        assert_eq!(config.assistant.model_name(), "gemini-2.5-pro");
        assert_eq!(config.assistant.language, "Brazilian Portuguese");
        assert_eq!(config.assistant.timeout_secs, 60);
        assert_eq!(config.speech, SpeechConfig::default());
        assert_eq!(config.share_base_url, "comedia-lab://");
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_paths() {
        if let Some(p) = default_config_path() {
            assert!(p.ends_with("comedia-lab/config.toml"));
        }
        assert!(default_data_dir().to_string_lossy().contains("comedia-lab"));
    }

    // =========================================================================
    // TOML Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_valid_toml() {
        let file = toml_file(
            r#"
[assistant]
provider = "ollama"
model = "mistral"
language = "English"
timeout_secs = 30
ollama_host = "gpu-box"
ollama_port = 8080

[storage]
data_dir = "/tmp/comedia"

[speech]
enabled = false
program = "say"
voice = "Luciana"
words_per_minute = 200

[share]
base_url = "https://lab.example/"
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.assistant.provider, Provider::Ollama);
        assert_eq!(config.assistant.model_name(), "mistral");
        assert_eq!(config.assistant.language, "English");
        assert_eq!(config.assistant.timeout_secs, 30);
        assert_eq!(config.assistant.ollama_host, "gpu-box");
        assert_eq!(config.assistant.ollama_port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/comedia"));
        assert!(!config.speech.enabled);
        assert_eq!(config.speech.program, "say");
        assert_eq!(config.speech.voice, "Luciana");
        assert_eq!(config.speech.words_per_minute, 200);
        assert_eq!(config.share_base_url, "https://lab.example/");
        assert_eq!(config.source(), ConfigSource::File);
    }

    #[test]
    fn test_parse_partial_toml_keeps_defaults() {
        let file = toml_file("[assistant]\nprovider = \"ollama\"\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.assistant.model_name(), "llama3.2");
        assert_eq!(config.speech.words_per_minute, 160);
        assert_eq!(config.share_base_url, DEFAULT_SHARE_BASE_URL);
    }

    #[test]
    fn test_missing_file_graceful() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = toml_file("[assistant\nprovider = 3\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    // =========================================================================
    // Validation Tests
    // =========================================================================

    #[test]
    fn test_unknown_provider_rejected() {
        let file = toml_file("[assistant]\nprovider = \"clippy\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));

        let result = load_config_with_env(None, env_from(&[("COMEDIA_LAB_PROVIDER", "x")]));
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_zero_rate_and_timeout_rejected() {
        let file = toml_file("[speech]\nwords_per_minute = 0\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));

        let file = toml_file("[assistant]\ntimeout_secs = 0\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    // =========================================================================
    // Priority Ordering Tests
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let file = toml_file("[assistant]\nmodel = \"file-model\"\napi_key = \"file-key\"\n");
        let env = env_from(&[
            ("COMEDIA_LAB_MODEL", "env-model"),
            ("API_KEY", "fallback-key"),
            ("COMEDIA_LAB_SPEECH", "false"),
            ("COMEDIA_LAB_DATA_DIR", "/data/env"),
        ]);

        let config = load_config_with_env(Some(file.path().to_path_buf()), env).unwrap();

        assert_eq!(config.assistant.model_name(), "env-model");
        assert_eq!(config.assistant.api_key.as_deref(), Some("fallback-key"));
        assert!(!config.speech.enabled);
        assert_eq!(config.data_dir, PathBuf::from("/data/env"));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_gemini_key_preferred_over_api_key() {
        let env = env_from(&[("GEMINI_API_KEY", "gemini"), ("API_KEY", "generic")]);
        let config = load_config_with_env(None, env).unwrap();
        assert_eq!(config.assistant.api_key.as_deref(), Some("gemini"));
    }

    #[test]
    fn test_invalid_env_port_ignored() {
        let config = load_config_with_env(None, env_from(&[("OLLAMA_PORT", "abc")])).unwrap();
        assert_eq!(config.assistant.ollama_port, DEFAULT_OLLAMA_PORT);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config = load_config_with_env(None, env_from(&[("COMEDIA_LAB_MODEL", "env-model")]))
            .unwrap();

        ConfigOverrides::new()
            .with_model("cli-model".to_string())
            .with_provider(Provider::Ollama)
            .with_speech_enabled(false)
            .apply(&mut config);

        assert_eq!(config.assistant.model_name(), "cli-model");
        assert_eq!(config.assistant.provider, Provider::Ollama);
        assert!(!config.speech.enabled);
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_config_overrides_empty_no_change() {
        let mut config = LabConfig::default();
        let original_source = config.source();
        ConfigOverrides::new().apply(&mut config);
        assert_eq!(config.source(), original_source);
    }

    // =========================================================================
    // Display / Serialization Tests
    // =========================================================================

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::Cli), "CLI");
        assert_eq!(format!("{}", ConfigSource::Env), "environment");
        assert_eq!(format!("{}", ConfigSource::File), "config file");
        assert_eq!(format!("{}", ConfigSource::Default), "default");
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("Gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!(" ollama ".parse::<Provider>().unwrap(), Provider::Ollama);
        assert_eq!(Provider::Ollama.to_string(), "ollama");
    }

    #[test]
    fn test_toml_round_trip() {
        let original = LabToml {
            assistant: AssistantToml {
                provider: Some("ollama".to_string()),
                timeout_secs: Some(15),
                ..Default::default()
            },
            speech: SpeechToml {
                voice: Some("en".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let toml_string = toml::to_string(&original).unwrap();
        let parsed: LabToml = toml::from_str(&toml_string).unwrap();

        assert_eq!(parsed.assistant.provider.as_deref(), Some("ollama"));
        assert_eq!(parsed.assistant.timeout_secs, Some(15));
        assert_eq!(parsed.speech.voice.as_deref(), Some("en"));
    }

    #[test]
    fn test_config_error_display() {
        let read_err = ConfigError::ReadError {
            path: PathBuf::from("/test/path"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = format!("{read_err}");
        assert!(msg.contains("/test/path"));
        assert!(msg.contains("Failed to read"));
    }
}
