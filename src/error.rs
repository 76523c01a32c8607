use serde::{Deserialize, Serialize};
use thiserror::Error;

// Axum types for HTTP response conversion
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// A single field-level validation failure.
///
/// Collected into a list and surfaced to the client as a 422 body; the
/// store is never touched while the list is non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// The custom error type for the application.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from the sqlx library.
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Caller-supplied data rejected before persistence.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// A malformed request (missing or mismatched id, bad payload shape).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

/// Convert custom Error to HTTP response.
///
/// Validation failures carry the field-error list as the body; everything
/// else is a JSON object with a stable `code` string.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
            }
            Error::BadRequest(msg) => {
                let body = serde_json::json!({
                    "error": msg,
                    "code": "BAD_REQUEST"
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Error::Sqlx(e) => {
                tracing::error!(error = %e, "database failure");
                let body = serde_json::json!({
                    "error": "Database error",
                    "code": "INTERNAL_ERROR"
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            Error::Internal(msg) => {
                let body = serde_json::json!({
                    "error": msg,
                    "code": "INTERNAL_ERROR"
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            Error::Config(_) => {
                let body = serde_json::json!({
                    "error": "Configuration error",
                    "code": "CONFIG_ERROR"
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
