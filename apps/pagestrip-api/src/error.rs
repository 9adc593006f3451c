//! Error types for the pagestrip API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use pagestrip_core::PageStripError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid page number")]
    InvalidPageNumber,

    #[error("No PDFs uploaded")]
    NoFilesUploaded,

    #[error("Only PDF files are allowed (declared type: {0})")]
    UnsupportedMediaType(String),

    #[error("Too many files (limit is {0})")]
    TooManyFiles(usize),

    #[error("File too large: {0}")]
    FileTooLarge(String),

    #[error("Upload exceeds the per-request size budget")]
    PayloadTooLarge,

    #[error("Malformed upload: {0}")]
    BadMultipart(String),

    #[error("PDF processing failed: {0}")]
    Processing(#[from] PageStripError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidPageNumber => {
                (StatusCode::BAD_REQUEST, "Invalid page number".to_string())
            }
            ApiError::NoFilesUploaded => (StatusCode::BAD_REQUEST, "No PDFs uploaded".to_string()),
            ApiError::UnsupportedMediaType(_) => (
                StatusCode::BAD_REQUEST,
                "Only PDF files are allowed".to_string(),
            ),
            ApiError::TooManyFiles(limit) => (
                StatusCode::BAD_REQUEST,
                format!("Too many files (limit is {})", limit),
            ),
            ApiError::FileTooLarge(name) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("File too large: {}", name),
            ),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Upload exceeds the per-request size budget".to_string(),
            ),
            ApiError::BadMultipart(msg) => {
                (StatusCode::BAD_REQUEST, format!("Malformed upload: {}", msg))
            }
            ApiError::Processing(e) => {
                tracing::error!("PDF processing failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PDF processing failed".to_string(),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({ "message": message }));

        (status, body).into_response()
    }
}
