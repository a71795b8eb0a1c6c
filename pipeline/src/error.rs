//! Pipeline error types

use thiserror::Error;
use shared::SharedError;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Deals API rejected the request with status {status}")]
    ApiRejected { status: u16, server_message: Option<String> },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Unknown deal: {deal_id}")]
    UnknownDeal { deal_id: String },

    #[error("Unknown stage: {stage}")]
    UnknownStage { stage: String },

    #[error("Move failed: {message}")]
    MoveFailed { message: String },

    #[error("Deals could not be loaded: {message}")]
    LoadFailed { message: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn config(message: impl Into<String>) -> Self {
        PipelineError::ConfigError { message: message.into() }
    }

    /// Message the server attached to a rejected request, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            PipelineError::ApiRejected { server_message, .. } => server_message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(error: reqwest::Error) -> Self {
        PipelineError::NetworkError { message: error.to_string() }
    }
}
