//! # HTTP Errors
//!
//! Error types for the HTTP and WebSocket surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::sync::{ErrorKind, SyncError};

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Error from the sync service
    #[error("{0}")]
    Sync(#[from] SyncError),

    /// Body was not valid JSON
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The service call outlived the request timeout. It still runs to completion.
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Sync(SyncError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Sync(SyncError::StorageUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Sync(err) => err.kind().code(),
            ApiError::InvalidBody(_) => ErrorKind::InvalidRequest.code(),
            ApiError::Timeout(_) => "TIMEOUT",
            ApiError::Internal(_) => "INTERNAL",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind(),
            code: err.status_code().as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelError;

    #[test]
    fn test_status_codes() {
        let invalid = ApiError::from(SyncError::from(ModelError::missing("entryKey", "object")));
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.kind(), "INVALID_REQUEST");

        let storage = ApiError::from(SyncError::StorageUnavailable("down".into()));
        assert_eq!(storage.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(storage.kind(), "STORAGE_UNAVAILABLE");

        assert_eq!(ApiError::Timeout(10).status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(ApiError::Timeout(10).kind(), "TIMEOUT");
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response_body() {
        let err = ApiError::InvalidBody("expected value".into());
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body["kind"], "INVALID_REQUEST");
        assert_eq!(body["code"], 400);
        assert!(body["error"].as_str().unwrap().contains("expected value"));
    }
}
