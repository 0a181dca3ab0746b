//! Configuration management for basic-llm-call.
//!
//! Values come from `~/.basic-llm-call/config.toml` when it exists, and are
//! then overridden by the usual `AZURE_OPENAI_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::GenerationParams;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub azure: AzureConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Falls back to `model` when unset.
    #[serde(default)]
    pub deployment: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    "2023-05-15".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            api_version: default_api_version(),
            model: default_model(),
            deployment: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Resolved credentials, guaranteed non-empty.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub endpoint: String,
}

impl AzureConfig {
    pub fn deployment_name(&self) -> &str {
        self.deployment.as_deref().unwrap_or(&self.model)
    }

    /// Resolve the API key and endpoint, failing fast when either is missing.
    pub fn credentials(&self) -> Result<Credentials> {
        let api_key = self.api_key.as_deref().filter(|k| !k.is_empty());
        let endpoint = self.endpoint.as_deref().filter(|e| !e.is_empty());
        match (api_key, endpoint) {
            (Some(api_key), Some(endpoint)) => Ok(Credentials {
                api_key: api_key.to_string(),
                endpoint: endpoint.to_string(),
            }),
            _ => Err(Error::Config(
                "Azure OpenAI API key and endpoint must be provided \
                 (set AZURE_OPENAI_API_KEY and AZURE_OPENAI_ENDPOINT or the [azure] config section)"
                    .to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_max_function_calls")]
    pub max_function_calls: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "bool_true")]
    pub parallel_tool_calls: bool,
}

fn default_max_function_calls() -> usize {
    5
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn bool_true() -> bool {
    true
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_function_calls: default_max_function_calls(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            parallel_tool_calls: true,
        }
    }
}

impl GenerationConfig {
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            parallel_tool_calls: self.parallel_tool_calls,
            ..GenerationParams::default()
        }
    }
}

/// Exponential backoff settings for the retry decorator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_delay_ms() -> u64 {
    2_000
}

fn default_max_delay_ms() -> u64 {
    60_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;
        Ok(home.join(".basic-llm-call").join("config.toml"))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load the config file (if any), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).map_err(|e| {
                Error::Config(format!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                ))
            })?;
            Self::from_toml_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `AZURE_OPENAI_*` overrides using `lookup` to read variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("AZURE_OPENAI_API_KEY") {
            self.azure.api_key = Some(key);
        }
        if let Some(endpoint) = lookup("AZURE_OPENAI_ENDPOINT") {
            self.azure.endpoint = Some(endpoint);
        }
        if let Some(version) = lookup("AZURE_OPENAI_API_VERSION") {
            self.azure.api_version = version;
        }
        if let Some(model) = lookup("AZURE_OPENAI_MODEL") {
            self.azure.model = model;
        }
        if let Some(deployment) = lookup("AZURE_OPENAI_DEPLOYMENT") {
            self.azure.deployment = Some(deployment);
        }
    }

    pub fn save_default() -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file {}: {}",
                config_path.display(),
                e
            ))
        })?;
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.generation.max_function_calls, 5);
        assert_eq!(config.generation.temperature, 0.7);
        assert_eq!(config.generation.max_tokens, 1000);
        assert!(config.generation.parallel_tool_calls);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.initial_delay(), Duration::from_secs(2));
        assert_eq!(config.retry.max_delay(), Duration::from_secs(60));
        assert_eq!(config.azure.api_version, "2023-05-15");
        assert_eq!(config.azure.deployment_name(), "gpt-4o");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmp,
            "[azure]\nendpoint = \"https://example.openai.azure.com\"\ndeployment = \"chat\"\n\n[generation]\nmax_function_calls = 3\n"
        )
        .unwrap();
        let content = std::fs::read_to_string(tmp.path()).unwrap();
        let config = AppConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.generation.max_function_calls, 3);
        assert_eq!(config.generation.max_tokens, 1000);
        assert_eq!(config.azure.deployment_name(), "chat");
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("AZURE_OPENAI_API_KEY", "secret"),
            ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
            ("AZURE_OPENAI_MODEL", "gpt-4o-mini"),
        ]
        .into_iter()
        .collect();
        let mut config = AppConfig::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        let creds = config.azure.credentials().unwrap();
        assert_eq!(creds.api_key, "secret");
        assert_eq!(config.azure.deployment_name(), "gpt-4o-mini");
    }

    #[test]
    fn test_missing_credentials_fail_fast() {
        let mut config = AppConfig::default();
        config.azure.api_key = Some("secret".to_string());
        let err = config.azure.credentials().unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        config.azure.endpoint = Some(String::new());
        assert!(config.azure.credentials().is_err());
    }

    #[test]
    fn test_generation_params() {
        let params = GenerationConfig::default().params();
        assert_eq!(params, GenerationParams::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[generation\nmax_tokens = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
