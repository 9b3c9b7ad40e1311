//! Runtime configuration.
//!
//! Loaded from YAML. Every field has a default, so an empty document is a
//! valid configuration selecting the deterministic engine. Durations use
//! humantime syntax (`500ms`, `15s`, `1h`).
//!
//! ```yaml
//! engine: live
//! delay: 0s
//! live:
//!   model: gemini-3-pro-preview
//!   timeout: 20s
//!   fallback: deterministic
//!   cache:
//!     enabled: true
//!     ttl: 30m
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::fallback::FallbackStrategy;
use crate::providers::{CompletionConfig, DEFAULT_API_KEY_ENVS, DEFAULT_MODEL};
use crate::prompts::analysis_response_schema;

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

mod duration_human {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}

/// Which analysis engine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Offline keyword scorer
    #[default]
    Deterministic,

    /// Generative model with fallback
    Live,
}

/// Cache settings for the live engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: u64,
    #[serde(with = "duration_human")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

/// Settings for the live engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Provider name ("gemini")
    pub provider: String,

    pub model: String,

    pub max_tokens: u32,

    pub temperature: f32,

    #[serde(with = "duration_human")]
    pub timeout: Duration,

    /// Override for the provider endpoint
    pub base_url: Option<String>,

    /// Environment variables searched, in order, for the API key
    pub api_key_env: Vec<String>,

    pub fallback: FallbackStrategy,

    pub cache: CacheConfig,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2048,
            temperature: 0.2,
            timeout: Duration::from_secs(30),
            base_url: None,
            api_key_env: DEFAULT_API_KEY_ENVS.iter().map(|v| v.to_string()).collect(),
            fallback: FallbackStrategy::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl LiveConfig {
    /// Completion settings asking for an `AnalysisResult`-shaped JSON object.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
            response_schema: Some(analysis_response_schema()),
        }
    }
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub engine: EngineKind,

    /// Artificial pause before the deterministic engine answers
    #[serde(with = "duration_human")]
    pub delay: Duration,

    pub live: LiveConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            delay: Duration::from_millis(500),
            live: LiveConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parse from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // Empty, comment-only and `~` documents are null, not a map
        let value: serde_yaml::Value = if yaml.trim().is_empty() {
            serde_yaml::Value::Null
        } else {
            serde_yaml::from_str(yaml)?
        };
        let config: RuntimeConfig = if value.is_null() {
            RuntimeConfig::default()
        } else {
            serde_yaml::from_value(value)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let live = &self.live;

        if live.model.trim().is_empty() {
            return Err(ConfigError::Invalid("live.model must not be empty".to_string()));
        }

        if live.max_tokens == 0 {
            return Err(ConfigError::Invalid("live.max_tokens must be positive".to_string()));
        }

        if !(0.0..=2.0).contains(&live.temperature) {
            return Err(ConfigError::Invalid(format!(
                "live.temperature must be within 0.0..=2.0, got {}",
                live.temperature
            )));
        }

        if live.timeout.is_zero() {
            return Err(ConfigError::Invalid("live.timeout must be positive".to_string()));
        }

        if let Some(url) = &live.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(
                    "live.base_url must start with http:// or https://".to_string(),
                ));
            }
        }

        if self.engine == EngineKind::Live && live.api_key_env.is_empty() {
            return Err(ConfigError::Invalid(
                "live.api_key_env must name at least one variable".to_string(),
            ));
        }

        Ok(())
    }
}
