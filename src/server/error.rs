//! Response envelope and the mapping from pipeline outcomes to HTTP.
//!
//! Every response body is `{"success": bool, ...}`: `data` on success,
//! `error` (a human-readable message) on failure.

use crate::error::PipelineError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

/// Message shown for faults that are not the client's doing.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error while parsing the document";

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Failure envelope.
#[derive(Debug, Serialize)]
pub struct ApiFailure {
    pub success: bool,
    pub error: String,
}

/// Everything a handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The transport refused the body before the pipeline saw it.
    #[error("File too large, please upload a file smaller than {limit_mb}MB")]
    PayloadTooLarge { limit_mb: usize },

    /// The multipart stream broke mid-read.
    #[error("Failed to read upload: {0}")]
    MalformedUpload(String),

    #[error("Not found")]
    NotFound,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Pipeline(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::MalformedUpload(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Client-facing message. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            ApiError::Pipeline(PipelineError::Unexpected(_)) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ApiError::Pipeline(e @ PipelineError::Unexpected(_)) = &self {
            error!("Parsing failed: {}", e);
        }
        let body = Json(ApiFailure {
            success: false,
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}
