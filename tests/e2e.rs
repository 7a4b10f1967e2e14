//! End-to-end tests against the real pdfium engine.
//!
//! The engine tests need a pdfium shared library and are gated behind the
//! `E2E_ENABLED` environment variable so they do not run in CI unless
//! explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=/path/to/libpdfium.so cargo test --test e2e -- --nocapture
//!
//! Extra PDFs dropped into `./test_cases/` are also parsed.

use pdf_text_api::backend::{MockBackend, PdfiumBackend};
use pdf_text_api::{
    parse, run, upload_from_path, ExtractionConfig, PdfBackend, PipelineError, UploadRequest,
    ValidationError,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

/// Skip this test unless E2E_ENABLED is set; otherwise bind pdfium.
macro_rules! e2e_engine_or_skip {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        PdfiumBackend::bind().expect("pdfium library must be available when E2E_ENABLED is set")
    }};
}

/// A two-page document with an Info dictionary carrying only a title.
///
/// There is no xref table; pdfium rebuilds it on load.
fn two_page_pdf() -> Vec<u8> {
    let page = |text: &str| {
        format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET")
    };
    let first = page("Hello   PDF");
    let second = page("second page");
    format!(
        "%PDF-1.4\n\
1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n\
2 0 obj << /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 >> endobj\n\
3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 5 0 R /Resources << /Font << /F1 7 0 R >> >> >> endobj\n\
4 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 6 0 R /Resources << /Font << /F1 7 0 R >> >> >> endobj\n\
5 0 obj << /Length {} >> stream\n{}\nendstream endobj\n\
6 0 obj << /Length {} >> stream\n{}\nendstream endobj\n\
7 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n\
8 0 obj << /Title (Engine Fixture) >> endobj\n\
trailer << /Root 1 0 R /Info 8 0 R /Size 9 >>\n\
%%EOF\n",
        first.len(),
        first,
        second.len(),
        second
    )
    .into_bytes()
}

// ── Local file input ─────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_from_path_uses_final_component() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quarterly.pdf");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(b"%PDF-1.7\n")
        .unwrap();

    let request = upload_from_path(&path).await.unwrap();
    assert_eq!(request.filename, "quarterly.pdf");
    assert_eq!(request.file.as_deref(), Some(&b"%PDF-1.7\n"[..]));

    let backend: Arc<dyn PdfBackend> = Arc::new(MockBackend::with_pages(["from disk"]));
    let result = parse(request, backend, Arc::new(ExtractionConfig::default()))
        .await
        .unwrap();
    assert_eq!(result.normalized_text, "from disk");
    assert_eq!(result.metadata.title, "quarterly.pdf");
}

#[tokio::test]
async fn upload_from_path_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = upload_from_path(dir.path().join("absent.pdf"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

// ── Real engine ──────────────────────────────────────────────────────────────

#[test]
fn engine_extracts_text_and_title() {
    let backend = e2e_engine_or_skip!();
    let result = run(
        UploadRequest::new(two_page_pdf(), "fixture.pdf"),
        &backend,
        &ExtractionConfig::default(),
    )
    .unwrap();

    assert_eq!(result.page_count, 2);
    assert_eq!(result.normalized_text, "Hello PDF second page");
    assert_eq!(result.metadata.title, "Engine Fixture");
    assert_eq!(result.metadata.author, "未知作者");
    assert_eq!(
        result.metadata.character_count,
        result.normalized_text.chars().count()
    );
}

#[test]
fn engine_rejects_garbage() {
    let backend = e2e_engine_or_skip!();
    let mut bytes = b"%PDF-1.4\n".to_vec();
    bytes.extend_from_slice(&[0xAB; 4096]);

    let err = run(
        UploadRequest::new(bytes, "garbage.pdf"),
        &backend,
        &ExtractionConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::CorruptOrEncrypted), "{err:?}");
}

#[test]
fn engine_never_sees_rejected_uploads() {
    let backend = e2e_engine_or_skip!();
    let err = run(
        UploadRequest::new(two_page_pdf(), "fixture.docx"),
        &backend,
        &ExtractionConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Validation(ValidationError::DisallowedExtension { .. })
    ));
}

#[tokio::test]
async fn engine_parses_sample_directory() {
    let backend = Arc::new(e2e_engine_or_skip!());
    let Ok(entries) = std::fs::read_dir(test_cases_dir()) else {
        println!("SKIP: no test_cases/ directory");
        return;
    };

    let config = Arc::new(ExtractionConfig::default());
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("pdf") {
            continue;
        }
        let request = upload_from_path(&path).await.unwrap();
        match parse(request, backend.clone(), config.clone()).await {
            Ok(result) => {
                println!(
                    "{}: {} pages, {} chars",
                    path.display(),
                    result.page_count,
                    result.metadata.character_count
                );
                assert!(!result.metadata.title.is_empty());
                assert!(!result.normalized_text.contains("  "));
            }
            Err(PipelineError::Unexpected(msg)) => {
                panic!("{}: unexpected failure: {msg}", path.display())
            }
            Err(e) => println!("{}: rejected: {e}", path.display()),
        }
    }
}
