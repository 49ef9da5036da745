//! Typed errors for the masking and classification pipeline.

use thiserror::Error;

use crate::common::pii::Category;

/// Errors that can occur while masking or classifying an email.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An external model failed to load or is not ready to serve
    #[error("model unavailable: {model}: {reason}")]
    ModelUnavailable { model: &'static str, reason: String },

    /// A model call failed during a request
    #[error("inference failed: {model}: {source}")]
    InferenceFailure {
        model: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A detector produced a span that cannot be applied to the text
    #[error("malformed entity span [{start}, {end}) for text of length {len}: {reason}")]
    MalformedEntitySpan {
        start: usize,
        end: usize,
        len: usize,
        reason: &'static str,
    },

    /// A category pattern failed to compile
    #[error("invalid pattern for {category}: {source}")]
    RegexCompilation {
        category: Category,
        #[source]
        source: regex::Error,
    },
}

impl PipelineError {
    pub fn inference(
        model: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        PipelineError::InferenceFailure {
            model,
            source: source.into(),
        }
    }

    pub fn unavailable(model: &'static str, reason: impl Into<String>) -> Self {
        PipelineError::ModelUnavailable {
            model,
            reason: reason.into(),
        }
    }
}

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
