//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all HTTP endpoints. It
//! implements `axum::response::IntoResponse` to produce structured JSON error
//! bodies of the form `{"success": false, "error": {code, message, details}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use opsgraph_core::CoreError;
use serde::Serialize;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "INVALID_CONNECTION").
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The proposed edge was refused by the connection rules (422).
    #[error("invalid connection: {message}")]
    InvalidConnection {
        message: String,
        reason: String,
    },

    /// Resource conflict, e.g. a duplicate id (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, Option<serde_json::Value>) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", None),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", None),
            ApiError::InvalidConnection { reason, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_CONNECTION",
                Some(serde_json::json!({ "reason": reason })),
            ),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT", None),
            ApiError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, details) = self.parts();
        let message = match &self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::InternalError(msg) => msg.clone(),
            ApiError::InvalidConnection { message, .. } => message.clone(),
        };
        let detail = ApiErrorDetail {
            code: code.to_string(),
            message,
            details,
        };

        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            CoreError::DuplicateId { .. } => ApiError::Conflict(err.to_string()),
            CoreError::InvalidConnection { reason, .. } => ApiError::InvalidConnection {
                message: err.to_string(),
                reason: reason.code().to_string(),
            },
        }
    }
}
