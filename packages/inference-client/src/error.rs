//! Error types for the inference client.

use thiserror::Error;

/// Result type for inference client operations.
pub type Result<T> = std::result::Result<T, InferenceError>;

/// Inference client errors.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Configuration error (bad endpoint URL, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint answered but is not serving yet (HTTP 503, model still loading)
    #[error("Endpoint unavailable: {0}")]
    Unavailable(String),

    /// Non-2xx response other than 503
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Parse error (invalid JSON, unexpected response shape)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl InferenceError {
    /// True when the endpoint is reachable but not ready to serve.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, InferenceError::Unavailable(_))
    }
}
