//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm::UpstreamError;

/// Application-level error types
///
/// Every failure a handler can produce is represented here and rendered as
/// `{"error": ..., "status": ...}` with the matching HTTP status code.
#[derive(Error, Debug)]
pub enum AppError {
    /// Upload request contained no file parts
    #[error("No files provided")]
    NoFiles,

    /// Request body was malformed or failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upload exceeded the configured body limit
    #[error("Upload exceeds the maximum allowed size")]
    PayloadTooLarge,

    /// Upstream credential is not configured
    #[error("API key is not configured")]
    MissingApiKey,

    /// Upstream LLM call failed terminally
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status code this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoFiles => StatusCode::BAD_REQUEST,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
