use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. The page matches on these,
// never on the human-readable message string.

/// Stable error code constants for service-level failures.
///
/// Module errors (e.g. the lead workflow) define their own codes but share
/// the same `{"code": ..., "message": ...}` body via [`error_response`].
pub mod error_code {
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Build the JSON error body used by every endpoint.
pub fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    let body = serde_json::json!({
        "code": code,
        "message": message,
    });
    (status, axum::Json(body)).into_response()
}

// ── ServiceError ────────────────────────────────────────────────────

/// Service error for failures outside the lead workflow
/// (login, session guard, malformed requests).
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Input data is invalid. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid or expired credentials. HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::Unauthorized(_) => error_code::UNAUTHENTICATED,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.error_code(), self.to_string())
    }
}
