//! Error types for the realty service.

use thiserror::Error;

/// Main error type for realty operations.
#[derive(Error, Debug)]
pub enum RealtyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Summarizer error: {0}")]
    Summarizer(#[from] SummarizerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Dataset loading and export errors.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset file not found: {0}")]
    NotFound(String),

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to open workbook: {0}")]
    Workbook(String),

    #[error("Dataset has no rows or header: {0}")]
    Empty(String),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text-generation backend errors.
///
/// These never reach a caller of the engine; the summarizer logs them and
/// reports the summary as unavailable.
#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("API key not provided and OPENAI_API_KEY env var not set")]
    MissingCredentials,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Empty completion")]
    EmptyCompletion,
}

/// Result type alias for realty operations.
pub type Result<T> = std::result::Result<T, RealtyError>;
