//! Error types for agent hooks
//!
//! Hooks themselves never return errors: a failing hook would abort the
//! whole turn, so every hook swallows failures after logging them. The
//! errors below surface from the fallible collaborators instead (the resume
//! store, model backends and pipelines).

use thiserror::Error;

/// Main error type for the agent hooks crate
#[derive(Error, Debug)]
pub enum HookError {
    /// Filesystem errors from the resume store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Persistence key that cannot be mapped to a record
    #[error("Invalid persistence key: {0:?}")]
    InvalidKey(String),

    /// The model backend answered with an error
    #[error("Model error: {message}")]
    Model {
        /// Error message from the backend
        message: String,
        /// HTTP status if the backend is remote
        status: Option<u16>,
    },

    /// HTTP transport errors
    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A pipeline was asked to run without any agents
    #[error("Pipeline {0} has no agents")]
    EmptyPipeline(String),
}

/// Result type alias for agent hook operations
pub type Result<T> = std::result::Result<T, HookError>;

impl HookError {
    /// Create a new Model error
    pub fn model(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Model {
            message: message.into(),
            status,
        }
    }

    /// Create a new InvalidKey error
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey(key.into())
    }

    /// Check if retrying the same call could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Model {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            #[cfg(feature = "gemini")]
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Check if the error is a configuration issue
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidKey(_))
    }
}
