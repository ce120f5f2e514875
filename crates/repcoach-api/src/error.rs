//! API error types and JSON error response formatting.
//!
//! Every failure is reported as `{"message": ...}` with a matching status
//! code, which is the shape the chat client expects.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found - unknown exercise or image.
    NotFound(String),
    /// 500 Internal Server Error - filesystem failure.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<repcoach_core::error::RepcoachError> for ApiError {
    fn from(err: repcoach_core::error::RepcoachError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
