//! Error types for LLM extraction.

use thiserror::Error;

/// Result type alias for extraction operations
pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Extraction errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Unknown provider, missing credential, unusable settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failed or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from the completion endpoint
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ExtractionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
