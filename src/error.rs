use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed record: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Transport(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("access denied by completion provider")]
    AccessDenied,

    #[error("completion provider returned no text")]
    EmptyReply,

    #[error("completion failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("failed to read speed model {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("speed model has no entry for {0}")]
    UnknownLabel(String),
}

#[derive(Debug, Error)]
pub enum ForecastLogError {
    #[error("failed to serialize forecast log: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to upload forecast log: {0}")]
    Upload(String),
}
