//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable that supplies the inference API token when the
/// config file leaves it empty.
pub const API_TOKEN_ENV: &str = "LEGALLIFY_HF_TOKEN";

/// Configuration errors surfaced before the pipeline runs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Inference API token is missing. Set inference.api_token in config or {API_TOKEN_ENV}."
    )]
    MissingApiToken,
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Remote inference endpoint settings
    #[serde(default)]
    pub inference: InferenceSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceSettings {
    /// Bearer token for the inference service
    #[serde(default)]
    pub api_token: String,

    /// Speech-to-text endpoint URL
    #[serde(default = "default_transcription_url")]
    pub transcription_url: String,

    /// Summarization endpoint URL
    #[serde(default = "default_summarization_url")]
    pub summarization_url: String,

    /// Seconds to wait between cold-start polls of the transcription endpoint
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Maximum cold-start polls before giving up (0 = unbounded)
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

// Default value functions

fn default_log_level() -> String {
    "info".to_string()
}

fn default_transcription_url() -> String {
    "https://api-inference.huggingface.co/models/facebook/wav2vec2-base-960h".to_string()
}

fn default_summarization_url() -> String {
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn".to_string()
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_max_poll_attempts() -> u32 {
    20
}

fn default_request_timeout_secs() -> u64 {
    90
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            transcription_url: default_transcription_url(),
            summarization_url: default_summarization_url(),
            poll_interval_secs: default_poll_interval_secs(),
            max_poll_attempts: default_max_poll_attempts(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            inference: InferenceSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if self.inference.api_token.trim().is_empty() {
            if let Ok(token) = std::env::var(API_TOKEN_ENV) {
                if !token.trim().is_empty() {
                    self.inference.api_token = token;
                }
            }
        }
    }

    /// Get the bearer token, failing fast when it is absent.
    pub fn require_api_token(&self) -> Result<&str, ConfigError> {
        let token = self.inference.api_token.trim();
        if token.is_empty() {
            return Err(ConfigError::MissingApiToken);
        }
        Ok(token)
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "legallify", "legallify")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_legacy_endpoints() {
        let settings = Settings::default();
        assert!(settings.inference.transcription_url.contains("wav2vec2"));
        assert!(settings.inference.summarization_url.contains("bart-large-cnn"));
        assert_eq!(settings.inference.poll_interval_secs, 30);
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let settings = Settings::default();
        assert!(matches!(
            settings.require_api_token(),
            Err(ConfigError::MissingApiToken)
        ));
    }

    #[test]
    fn whitespace_token_is_still_missing() {
        let mut settings = Settings::default();
        settings.inference.api_token = "   ".to_string();
        assert!(settings.require_api_token().is_err());

        settings.inference.api_token = "hf_example".to_string();
        assert_eq!(settings.require_api_token().unwrap(), "hf_example");
    }
}
