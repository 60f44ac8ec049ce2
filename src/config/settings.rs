//! Configuration settings for the realty service.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable consulted when no summarizer key is configured.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub summarizer: SummarizerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("realty.toml"),
            dirs::config_dir()
                .map(|p| p.join("realty/config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".realty/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.dataset.path.trim().is_empty() {
            return Err(ConfigError::MissingField("dataset.path".to_string()).into());
        }
        if self.dataset.location_column.trim().is_empty() {
            return Err(ConfigError::MissingField("dataset.location_column".to_string()).into());
        }
        if self.dataset.year_column.trim().is_empty() {
            return Err(ConfigError::MissingField("dataset.year_column".to_string()).into());
        }

        if self.summarizer.enabled {
            if self.summarizer.base_url.is_empty() {
                return Err(ConfigError::MissingField("summarizer.base_url".to_string()).into());
            }
            if self.summarizer.model.is_empty() {
                return Err(ConfigError::MissingField("summarizer.model".to_string()).into());
            }
        }
        if self.summarizer.max_tokens == 0 {
            return Err(ConfigError::Invalid("max_tokens must be > 0".to_string()).into());
        }

        if !self.server.prefix.is_empty() && !self.server.prefix.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "server.prefix must start with '/': {}",
                self.server.prefix
            ))
            .into());
        }

        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// Enable permissive CORS for browser clients
    pub enable_cors: bool,
    /// Route prefix for the API (e.g. "/api")
    pub prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            http_port: 8000,
            enable_cors: true,
            prefix: "/api".to_string(),
        }
    }
}

/// Dataset source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Spreadsheet or CSV file with the market data
    pub path: String,
    /// Worksheet to read (first sheet when unset)
    pub sheet: Option<String>,
    /// Column holding the locality name, after normalization
    pub location_column: String,
    /// Column holding the year, after normalization
    pub year_column: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: "sample_data.xlsx".to_string(),
            sheet: None,
            location_column: "final_location".to_string(),
            year_column: "year".to_string(),
        }
    }
}

impl DatasetConfig {
    /// Expand `~` in the dataset path.
    pub fn resolved_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.path);
        PathBuf::from(expanded.as_ref())
    }
}

/// Optional text-generation backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Whether generated summaries are attempted at all
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Chat model name
    pub model: String,
    /// API key (loaded from environment if not set)
    pub api_key: Option<String>,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            max_tokens: 200,
            timeout_secs: 30,
        }
    }
}

impl SummarizerConfig {
    /// The configured key, or the one from the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}
