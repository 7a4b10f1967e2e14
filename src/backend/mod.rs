//! Document engines: the format library the extractor drives page by page.
//!
//! The pipeline never parses PDF syntax itself. It opens a byte buffer
//! through a [`PdfBackend`], asks the resulting [`LoadedDocument`] for its
//! page count, per-page text and info-dictionary values, and decides what
//! to do with each answer.
//!
//! * [`pdfium`]: production engine backed by `pdfium-render`.
//! * [`mock`]: scripted in-memory engine for tests and local tooling.

pub mod mock;
pub mod pdfium;

pub use mock::{MockBackend, MockPage};
pub use pdfium::PdfiumBackend;

use crate::error::{OpenError, PageError};
use crate::output::RawMetadata;

/// Opens byte buffers as documents. Shared by all concurrent requests.
pub trait PdfBackend: Send + Sync {
    /// Parse `bytes` into a document whose lifetime is tied to the buffer.
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn LoadedDocument + 'a>, OpenError>;
}

/// A successfully opened document.
pub trait LoadedDocument {
    /// Number of pages the document structure reports.
    fn page_count(&self) -> usize;

    /// Extract the text of the page at 0-based `index`.
    fn page_text(&self, index: usize) -> Result<String, PageError>;

    /// Info-dictionary values; missing fields are `None`.
    fn metadata(&self) -> RawMetadata;
}
