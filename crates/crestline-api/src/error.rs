//! API error types and JSON error response formatting.
//!
//! ApiError provides a consistent JSON error response format across all
//! endpoints, mapping pipeline errors to appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crestline_chat::ChatError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
    /// Raw underlying error for diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid parameters.
    BadRequest(String),
    /// 422 Unprocessable Entity - policy rejection.
    UnprocessableEntity(String),
    /// 500 Internal Server Error - processing failure.
    Internal { message: String, details: Option<String> },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unprocessable_entity",
                msg,
                None,
            ),
            ApiError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        if err.is_validation() {
            ApiError::BadRequest(err.to_string())
        } else if err.is_policy() {
            ApiError::UnprocessableEntity(err.to_string())
        } else {
            tracing::error!(error = %err, "Chat pipeline failure");
            ApiError::Internal {
                message: "Failed to process message".to_string(),
                details: Some(err.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let api: ApiError = ChatError::EmptyMessage.into();
        assert!(matches!(api, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_policy_maps_to_unprocessable() {
        let api: ApiError = ChatError::ForbiddenKeyword.into();
        assert!(matches!(api, ApiError::UnprocessableEntity(_)));
    }

    #[test]
    fn test_upstream_maps_to_internal_with_details() {
        let api: ApiError = ChatError::Store("store offline".into()).into();
        match api {
            ApiError::Internal { message, details } => {
                assert_eq!(message, "Failed to process message");
                assert!(details.unwrap().contains("store offline"));
            }
            other => panic!("expected Internal, got {:?}", other),
        }
    }

    #[test]
    fn test_generation_maps_to_internal() {
        let api: ApiError = ChatError::EmptyCompletion.into();
        assert!(matches!(api, ApiError::Internal { .. }));
    }
}
