//! Route handlers.

use super::error::{ApiError, ApiSuccess};
use super::AppState;
use crate::output::{ExtractionResult, UploadRequest};
use crate::parse;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tracing::{debug, warn};

/// Name of the multipart part carrying the document.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub time: String,
}

/// `GET /`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running",
        service: "PDF Parser API",
        version: env!("CARGO_PKG_VERSION"),
        time: chrono::Local::now().to_rfc3339(),
    })
}

/// `POST /parse-pdf`
pub async fn parse_pdf(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiSuccess<ExtractionResult>, ApiError> {
    let limit_mb = state.config.max_file_size_mb();
    let request = match multipart {
        Ok(_) if is_empty_body(&headers) => {
            debug!("Multipart request has an empty body");
            UploadRequest::missing()
        }
        Ok(multipart) => read_upload(multipart, limit_mb).await?,
        Err(rejection) => {
            debug!("Request is not a multipart upload: {}", rejection);
            UploadRequest::missing()
        }
    };

    let result = parse::parse(request, state.backend.clone(), state.config.clone()).await?;
    Ok(ApiSuccess::new(result))
}

/// `OPTIONS /parse-pdf` without a CORS preflight.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found() -> impl IntoResponse {
    ApiError::NotFound
}

fn is_empty_body(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0")
}

/// Pull the `file` part out of the multipart stream. Other parts are
/// skipped; a stream that ends before a `file` part appears yields an
/// upload with no file. A broken stream is a malformed upload.
async fn read_upload(mut multipart: Multipart, limit_mb: usize) -> Result<UploadRequest, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(too_large(e, limit_mb));
            }
            Err(e) => {
                warn!("Failed to read multipart stream: {}", e);
                return Err(ApiError::MalformedUpload(e.body_text()));
            }
        };

        if field.name() != Some(UPLOAD_FIELD) {
            debug!("Skipping multipart part {:?}", field.name());
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                too_large(e, limit_mb)
            } else {
                warn!("Failed to read upload '{}': {}", filename, e);
                ApiError::MalformedUpload(e.body_text())
            }
        })?;
        return Ok(UploadRequest::new(bytes, filename));
    }

    Ok(UploadRequest::missing())
}

fn too_large(e: MultipartError, limit_mb: usize) -> ApiError {
    warn!("Upload exceeded the transport body limit: {}", e);
    ApiError::PayloadTooLarge { limit_mb }
}
