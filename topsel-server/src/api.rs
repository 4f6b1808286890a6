//! HTTP error mapping.
//!
//! [`ApiError`] bridges library errors and HTTP responses. Every failure
//! leaves the server as `{"error": {"code", "message"}}` with a status
//! code derived from the error class; conflict, duplicate and invalid
//! state all map to 409 but keep distinct codes so clients can branch
//! without parsing messages.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use topsel::Error as LibError;

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Create an error with an explicit status and code.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthenticated", message)
    }

    /// Create a 500 Internal Server Error with a generic message.
    ///
    /// The detail string is logged, never sent to the client.
    #[must_use]
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "internal server error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "an internal error occurred",
        )
    }

    /// Returns the HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl From<LibError> for ApiError {
    fn from(err: LibError) -> Self {
        let (status, code) = match &err {
            LibError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            LibError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            LibError::Duplicate { .. } => (StatusCode::CONFLICT, "duplicate"),
            LibError::InvalidState { .. } => (StatusCode::CONFLICT, "invalid_state"),
            LibError::PermissionDenied { .. } => (StatusCode::FORBIDDEN, "permission_denied"),
            LibError::Unauthenticated { .. } => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            LibError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
            LibError::Unavailable { .. } => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
            _ => return Self::internal(err),
        };
        Self::new(status, code, err.to_string())
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}
