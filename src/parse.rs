//! Pipeline orchestration: one upload in, one result or error out.
//!
//! [`run`] is the synchronous core: it sequences
//! validate → extract → normalize → aggregate, stops at the first fatal
//! failure, and guarantees that nothing escapes it unclassified (engine
//! panics included). [`parse`] is the async entry point used by the HTTP
//! layer; it moves [`run`] onto the blocking pool because page extraction
//! is CPU-bound and pdfium calls must not stall the async workers.

use crate::backend::PdfBackend;
use crate::config::ExtractionConfig;
use crate::error::PipelineError;
use crate::output::{ExtractionResult, UploadRequest, ValidatedUpload};
use crate::pipeline::{aggregate, extract, normalize, validate, Stage};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Run the full pipeline on one upload, blocking the current thread.
///
/// # Errors
/// - [`PipelineError::Validation`]: the upload was rejected; the document
///   engine was never invoked
/// - [`PipelineError::CorruptOrEncrypted`]: the document could not be opened
/// - [`PipelineError::Unexpected`]: any other fault, including a panic
///   inside the engine
pub fn run(
    request: UploadRequest,
    backend: &dyn PdfBackend,
    config: &ExtractionConfig,
) -> Result<ExtractionResult, PipelineError> {
    let start = Instant::now();
    let mut stage = Stage::Received;

    // ── Step 1: Validate ─────────────────────────────────────────────────
    let upload = validate::validate(request.file, &request.filename, config).map_err(|e| {
        info!("Rejected upload '{}': {}", request.filename, e);
        PipelineError::from(e)
    })?;
    advance(&mut stage, Stage::Validated);

    info!(
        "Parsing PDF: {}, size: {:.2}KB",
        upload.filename,
        upload.bytes.len() as f64 / 1024.0
    );

    // ── Steps 2-4: Extract, normalize, aggregate ─────────────────────────
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        process(&upload, backend, config, &mut stage)
    }));

    let result = match outcome {
        Ok(result) => result?,
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            error!(
                "Parsing '{}' panicked after stage '{}': {}",
                upload.filename, stage, msg
            );
            return Err(PipelineError::Unexpected(format!(
                "panic after stage '{stage}': {msg}"
            )));
        }
    };
    advance(&mut stage, Stage::Done);

    info!(
        "PDF parsed: {}, {} pages, {} characters, {}ms",
        upload.filename,
        result.page_count,
        result.metadata.character_count,
        start.elapsed().as_millis()
    );

    Ok(result)
}

/// Parse an upload on the blocking thread pool.
pub async fn parse(
    request: UploadRequest,
    backend: Arc<dyn PdfBackend>,
    config: Arc<ExtractionConfig>,
) -> Result<ExtractionResult, PipelineError> {
    tokio::task::spawn_blocking(move || run(request, backend.as_ref(), &config))
        .await
        .map_err(|e| {
            error!("Extraction task failed: {}", e);
            PipelineError::Unexpected(format!("Extraction task failed: {}", e))
        })?
}

/// Read a local file into an [`UploadRequest`] named after its final path
/// component.
pub async fn upload_from_path(path: impl AsRef<Path>) -> std::io::Result<UploadRequest> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(UploadRequest::new(bytes, filename))
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn process(
    upload: &ValidatedUpload,
    backend: &dyn PdfBackend,
    config: &ExtractionConfig,
    stage: &mut Stage,
) -> Result<ExtractionResult, PipelineError> {
    let document = extract::extract(&upload.bytes, backend, config)?;
    advance(stage, Stage::Extracted);

    let normalized_text = normalize::normalize(&document.pages);
    let sectioned_text = normalize::sectioned(&document.pages);
    advance(stage, Stage::Normalized);

    if normalized_text.is_empty() && !document.pages.is_empty() {
        warn!(
            "No text extracted from '{}' ({} pages); the document may be scanned images",
            upload.filename,
            document.pages.len()
        );
    }

    let result = aggregate::assemble(
        &document,
        normalized_text,
        sectioned_text,
        &upload.filename,
        upload.bytes.len(),
        config,
    );
    advance(stage, Stage::Aggregated);

    Ok(result)
}

fn advance(stage: &mut Stage, next: Stage) {
    debug_assert!(next > *stage, "pipeline stage moved backwards");
    debug!("Pipeline stage: {} → {}", stage, next);
    *stage = next;
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockBackend, MockPage};
    use crate::error::ValidationError;
    use crate::output::RawMetadata;
    use bytes::Bytes;

    const PDF: &[u8] = b"%PDF-1.4\n";

    #[test]
    fn validation_failure_short_circuits() {
        // A panicking page proves the engine is never reached.
        let backend = MockBackend::with_script(vec![MockPage::Panic]);
        let err = run(
            UploadRequest::new(Bytes::from_static(PDF), "notes.txt"),
            &backend,
            &ExtractionConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation(ValidationError::DisallowedExtension { .. })
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = run(
            UploadRequest::missing(),
            &MockBackend::default(),
            &ExtractionConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation(ValidationError::MissingFile)
        ));
    }

    #[test]
    fn corrupt_document_short_circuits() {
        let err = run(
            UploadRequest::new(Bytes::from_static(b"not a pdf"), "broken.pdf"),
            &MockBackend::with_pages(["x"]),
            &ExtractionConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::CorruptOrEncrypted));
    }

    #[test]
    fn engine_panic_becomes_unexpected() {
        let backend = MockBackend::with_script(vec![MockPage::text("ok"), MockPage::Panic]);
        let err = run(
            UploadRequest::new(Bytes::from_static(PDF), "a.pdf"),
            &backend,
            &ExtractionConfig::default(),
        )
        .unwrap_err();
        match err {
            PipelineError::Unexpected(msg) => {
                assert!(msg.contains("validated"), "got: {msg}");
                assert!(msg.contains("mock engine fault on page 2"), "got: {msg}");
            }
            other => panic!("expected Unexpected, got {other:?}"),
        }
    }

    #[test]
    fn full_run_builds_result() {
        let backend = MockBackend::with_pages(["Hello\n  world", "second   page"]).metadata(
            RawMetadata {
                author: Some("Ada".into()),
                ..RawMetadata::default()
            },
        );
        let result = run(
            UploadRequest::new(Bytes::from_static(PDF), "hello.pdf"),
            &backend,
            &ExtractionConfig::default(),
        )
        .unwrap();

        assert_eq!(result.normalized_text, "Hello world second page");
        assert_eq!(result.page_count, 2);
        assert_eq!(result.metadata.title, "hello.pdf");
        assert_eq!(result.metadata.author, "Ada");
        assert_eq!(result.metadata.size_bytes, PDF.len());
        assert_eq!(result.metadata.character_count, 23);
        assert!(result.sectioned_text.starts_with("--- Page 1 ---\nHello\n  world"));
    }

    #[test]
    fn stages_are_ordered() {
        assert!(Stage::Received < Stage::Validated);
        assert!(Stage::Aggregated < Stage::Done);
        assert_eq!(Stage::Normalized.to_string(), "normalized");
    }

    #[tokio::test]
    async fn parse_runs_on_blocking_pool() {
        let backend: Arc<dyn PdfBackend> = Arc::new(MockBackend::with_pages(["async text"]));
        let config = Arc::new(ExtractionConfig::default());
        let result = parse(
            UploadRequest::new(Bytes::from_static(PDF), "a.pdf"),
            backend,
            config,
        )
        .await
        .unwrap();
        assert_eq!(result.normalized_text, "async text");
    }
}
