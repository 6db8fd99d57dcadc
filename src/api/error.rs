//! API error type and HTTP status mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::crypto::PasswordError;
use crate::storage::StorageError;

/// Errors returned to API clients as JSON `{"message": ...}` bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid email or password")]
    WrongCredentials,

    #[error("Not authenticated")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Storage(StorageError),

    #[error("Internal server error")]
    Internal(String),

    #[error("Internal server error")]
    Password(#[from] PasswordError),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        // Constraint violations are the caller's problem, not ours
        match err {
            StorageError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            other => ApiError::Storage(other),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::WrongCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Storage(_) | ApiError::Password(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            match &self {
                ApiError::Storage(e) => tracing::error!("Storage error: {}", e),
                ApiError::Password(e) => tracing::error!("Password error: {}", e),
                ApiError::Internal(msg) => tracing::error!("Internal error: {}", msg),
                _ => {}
            }
        }

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err: ApiError = StorageError::UniqueViolation {
            field: "email",
            value: "a@example.com".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound("Playlist").status(), StatusCode::NOT_FOUND);
    }
}
