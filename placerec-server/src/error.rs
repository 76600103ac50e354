//! Error types for placerec-server
//!
//! Every handler error becomes a JSON body of the form
//! `{"error": {"code": "...", "message": "..."}}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing/empty required field or malformed body (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backing store unreachable or write failure (500)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Unsupported HTTP verb (405)
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),
}

impl From<placerec_common::Error> for ApiError {
    fn from(err: placerec_common::Error) -> Self {
        match err {
            placerec_common::Error::InvalidInput(msg) => ApiError::Validation(msg),
            other => ApiError::Storage(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            ApiError::Storage(msg) => {
                error!("Storage failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Failed to access recommendation store".to_string(),
                )
            }
            ApiError::MethodNotAllowed(method) => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                format!("Method {} is not supported", method),
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

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_validation() {
        let err: ApiError = placerec_common::Error::InvalidInput("reason is required".into()).into();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "reason is required"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_common_errors_map_to_storage() {
        let err: ApiError = placerec_common::Error::Internal("bad row".into()).into();
        assert!(matches!(err, ApiError::Storage(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_method_not_allowed_status() {
        let response = ApiError::MethodNotAllowed("DELETE".into()).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
