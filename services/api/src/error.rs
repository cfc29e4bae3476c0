//! Custom error types for the API service

use auth::AuthError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// No valid session on a protected route
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request with message
    #[error("{0}")]
    BadRequest(String),

    /// Login failed; identical for unknown user and wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Media id does not exist or belongs to someone else
    #[error("Media not found or unauthorized")]
    MediaNotFound,

    /// External metadata service could not be reached
    #[error("External metadata service unavailable: {0}")]
    BadGateway(String),

    /// Internal server error; the detail is logged, not returned
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

/// Internal detail attached to opaque 500 responses, surfaced only when
/// verbose errors are enabled
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => ApiError::BadRequest(msg),
            AuthError::DuplicateUsername | AuthError::DuplicateEmail => {
                ApiError::BadRequest(err.to_string())
            }
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Unauthenticated => ApiError::Unauthorized,
            AuthError::Store(e) => ApiError::Database(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({"error": "Unauthorized"})),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({"message": msg})),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({"message": "Invalid credentials"}),
            ),
            ApiError::MediaNotFound => (
                StatusCode::NOT_FOUND,
                json!({"message": "Media not found or unauthorized"}),
            ),
            ApiError::BadGateway(detail) => {
                error!("External metadata request failed: {}", detail);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({"message": "External metadata service unavailable"}),
                )
            }
            ApiError::Internal(_) | ApiError::Database(_) => {
                error!("Request failed: {}", self);
                let mut response = (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"message": INTERNAL_MESSAGE})),
                )
                    .into_response();
                response
                    .extensions_mut()
                    .insert(ErrorDetail(self.to_string()));
                return response;
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Swap the opaque 500 message for the internal detail; only installed when
/// `VERBOSE_ERRORS` is on
pub async fn reveal_error_detail(mut response: Response) -> Response {
    match response.extensions_mut().remove::<ErrorDetail>() {
        Some(ErrorDetail(detail)) => {
            (response.status(), Json(json!({"message": detail}))).into_response()
        }
        None => response,
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use common::error::DatabaseError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unauthorized_uses_error_key() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({"error": "Unauthorized"}));
    }

    #[tokio::test]
    async fn test_store_errors_are_opaque() {
        let err = ApiError::Database(DatabaseError::Integrity("users_pkey".to_string()));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<ErrorDetail>().is_some());
        assert_eq!(
            body_json(response).await,
            json!({"message": "Internal server error"})
        );
    }

    #[tokio::test]
    async fn test_verbose_mode_reveals_detail() {
        let err = ApiError::Internal("pool timed out".to_string());
        let response = reveal_error_detail(err.into_response()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("pool timed out"));
    }

    #[test]
    fn test_auth_errors_map_to_http_semantics() {
        assert!(matches!(
            ApiError::from(AuthError::DuplicateEmail),
            ApiError::BadRequest(msg) if msg == "Email already registered"
        ));
        assert!(matches!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::InvalidCredentials
        ));
        assert!(matches!(
            ApiError::from(AuthError::Unauthenticated),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from(AuthError::Hashing("boom".to_string())),
            ApiError::Internal(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::Configuration("empty secret".to_string())),
            ApiError::Internal(_)
        ));
    }
}
