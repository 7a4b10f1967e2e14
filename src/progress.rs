//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to observe
//! the extractor as it walks the document. Events are informational only:
//! nothing a callback does changes the extraction result.
//!
//! # Example
//!
//! ```rust
//! use pdf_text_api::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {}/{} done ({} chars)", page_num, total_pages, text_len);
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { completed: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extractor as it processes each page.
///
/// Implementations must be `Send + Sync`: one config (and therefore one
/// callback) is shared by every request the server handles concurrently.
/// All methods have default no-op implementations.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after the document opened, before the first page.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called when a page yielded text.
    ///
    /// # Arguments
    /// * `page_num`: 1-indexed page number
    /// * `total_pages`: total pages in the document
    /// * `text_len`: characters extracted from the page (before normalisation)
    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        let _ = (page_num, total_pages, text_len);
    }

    /// Called when a page failed and was recorded as empty.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after every page has been attempted.
    fn on_extraction_complete(&self, total_pages: usize, success_count: usize) {
        let _ = (total_pages, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
