//! API error types and their HTTP mapping.
//!
//! ## Error Mapping
//! ```text
//! CoreError / DbError (lower layers)
//!        │
//!        ▼
//! ApiError (this module)
//!        │
//!        ▼
//! HTTP status + JSON envelope:
//!   { "success": false, "data": null,
//!     "error": { "code": "NOT_FOUND", "message": "..." } }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::response::ApiResponse;
use minierp_core::CoreError;
use minierp_db::DbError;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Shorthand for the common "no such resource" case.
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{what} not found"))
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // 5xx details stay in the logs, not in the response body.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Internal error");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ApiResponse::<()>::fail(self.code(), message);
        (status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            DbError::ForeignKeyViolation { .. } | DbError::CheckViolation { .. } => {
                ApiError::Conflict(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock { .. } | CoreError::DuplicateLine { .. } => {
                ApiError::Conflict(err.to_string())
            }
            CoreError::LineNotFound(_) => ApiError::NotFound(err.to_string()),
            CoreError::CodeBeforeId => ApiError::Internal(err.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

/// Result type for API handlers and services.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::not_found("item").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("dup".into()).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_db_error_conversion() {
        let err: ApiError = DbError::UniqueViolation {
            field: "items.code".into(),
        }
        .into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_core_error_conversion() {
        let err: ApiError = CoreError::InsufficientStock {
            available: 1,
            requested: 2,
        }
        .into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = CoreError::EmptyOrder.into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
