//! WebServer-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use pipeline::PipelineError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("Invalid request format: {details}")]
    InvalidRequest { details: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WebServerResult<T> = Result<T, WebServerError>;

impl WebServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebServerError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            WebServerError::Pipeline(PipelineError::UnknownDeal { .. } | PipelineError::UnknownStage { .. }) => {
                StatusCode::NOT_FOUND
            }
            WebServerError::Pipeline(PipelineError::ApiRejected { .. } | PipelineError::NetworkError { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        let message = match &self {
            WebServerError::Pipeline(e) => e.server_message().map(str::to_string).unwrap_or_else(|| e.to_string()),
            other => other.to_string(),
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
