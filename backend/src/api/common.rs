//! Error handling utilities for API responses.
//!
//! Provides the conversion between service-layer errors and HTTP responses,
//! plus the JSON extractor used by handlers. Includes:
//! - ServiceError to HTTP status code mapping
//! - The `{"message": ...}` error body every endpoint shares
//! - A Json extractor whose rejections use the same error shape
//!
//! # Error Handling Flow
//! 1. Service layer returns domain-specific `ServiceError`
//! 2. `IntoResponse` converts it to the appropriate HTTP response
//! 3. Storage failures are logged and reported as an opaque server error

use crate::errors::ServiceError;
use axum::{
    extract::FromRequest,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServiceError::Validation { message } => (StatusCode::BAD_REQUEST, message),
            ServiceError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message),
            ServiceError::PermissionDenied { message } => (StatusCode::FORBIDDEN, message),
            ServiceError::NotFound { entity, .. } => {
                (StatusCode::NOT_FOUND, format!("{} not found", entity))
            }
            ServiceError::AlreadyExists { entity, .. } => {
                (StatusCode::BAD_REQUEST, format!("{} already exists", entity))
            }
            ServiceError::Database { source } => {
                tracing::error!("Database error: {:#}", source);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        };

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

/// Json extractor that reports body rejections with the shared error shape
/// instead of axum's plain-text default.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ServiceError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn parts(error: ServiceError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let (status, body) = parts(ServiceError::validation("Title is required")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Title is required");

        let (status, body) = parts(ServiceError::unauthorized("Unauthorized")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized");

        let (status, body) = parts(ServiceError::permission_denied("Admin access required")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Admin access required");

        let (status, body) = parts(ServiceError::not_found("Course", "intro-to-go")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Course not found");
    }

    #[tokio::test]
    async fn test_duplicates_map_to_bad_request() {
        let (status, body) = parts(ServiceError::already_exists("User", "a@b.com")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "User already exists");
    }

    #[tokio::test]
    async fn test_database_errors_are_opaque() {
        let error = ServiceError::from(anyhow::anyhow!("connection reset"));
        let (status, body) = parts(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Server error");
    }
}
