//! # pdf-text-api
//!
//! Extract the text and descriptive metadata of an uploaded PDF and return
//! them as one structured payload.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload (bytes + filename)
//!  │
//!  ├─ 1. Validate   file present, filename, extension, size ceiling
//!  ├─ 2. Extract    open via pdfium, read every page (failures isolated per page)
//!  ├─ 3. Normalize  one whitespace-collapsed string (+ a per-page sectioned variant)
//!  ├─ 4. Aggregate  page count + metadata with per-field defaults
//!  └─ 5. Result     ExtractionResult, or a classified PipelineError
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use pdf_text_api::backend::MockBackend;
//! use pdf_text_api::{run, ExtractionConfig, UploadRequest};
//!
//! let backend = MockBackend::with_pages(["Hello,\n  world"]);
//! let request = UploadRequest::new(&b"%PDF-1.7"[..], "hello.pdf");
//! let result = run(request, &backend, &ExtractionConfig::default()).unwrap();
//! assert_eq!(result.normalized_text, "Hello, world");
//! assert_eq!(result.metadata.title, "hello.pdf");
//! ```
//!
//! In production the backend is [`backend::PdfiumBackend`], bound once at
//! startup and shared by all requests.
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | axum HTTP boundary and the `pdf-text-api` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `server` when using only the library:
//! ```toml
//! pdf-text-api = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod backend;
pub mod config;
pub mod error;
pub mod output;
pub mod parse;
pub mod pipeline;
pub mod progress;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use backend::{LoadedDocument, PdfBackend};
pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::{ConfigError, OpenError, PageError, PipelineError, ValidationError};
pub use output::{
    DocumentMetadata, ExtractedDocument, ExtractedPage, ExtractionResult, RawMetadata,
    UploadRequest, ValidatedUpload,
};
pub use parse::{parse, run, upload_from_path};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
