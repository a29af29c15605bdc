//! API error type shared by all HTTP handlers
//!
//! Each variant maps to one category of the service's failure modes:
//! client mistakes (bad request, not found, conflicting state) become 4xx
//! responses, dependency failures (object store, transcoder, database)
//! become 5xx responses. Nothing is retried here; callers re-invoke.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400) - empty payload, malformed identifier
    #[error("invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("not found: {0}")]
    NotFound(String),

    /// Conflict (409) - e.g., clip already processed
    #[error("conflict: {0}")]
    Conflict(String),

    /// Object store unreachable or key missing mid-operation (500)
    #[error("object storage error: {0}")]
    Storage(String),

    /// Transcoder invocation failed or produced unreadable output (500)
    #[error("transcode failed: {0}")]
    Transcode(String),

    /// Anything else, including database errors (500)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", msg),
            ApiError::Transcode(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "TRANSCODE_ERROR", msg)
            }
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                format!("{err:#}"),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
