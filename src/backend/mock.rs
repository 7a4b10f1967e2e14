//! Scripted in-memory engine.
//!
//! [`MockBackend`] answers from a fixed page list instead of parsing bytes,
//! which makes every pipeline branch reachable without a pdfium install:
//! failing pages, panicking pages, corrupt and encrypted documents.
//!
//! To keep "corrupted bytes" meaningful, `open` still rejects any buffer
//! that does not start with the `%PDF` magic.

use super::{LoadedDocument, PdfBackend};
use crate::error::{OpenError, PageError};
use crate::output::RawMetadata;

/// What a scripted page does when asked for its text.
#[derive(Debug, Clone)]
pub enum MockPage {
    /// Yields this text.
    Text(String),
    /// Fails with a [`PageError::TextFailed`] carrying this detail.
    Fail(String),
    /// Panics, standing in for a fault inside the engine.
    Panic,
}

impl MockPage {
    pub fn text(s: impl Into<String>) -> Self {
        MockPage::Text(s.into())
    }
}

/// In-memory [`PdfBackend`] driven by a page script.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    pages: Vec<MockPage>,
    metadata: RawMetadata,
    open_error: Option<OpenError>,
}

impl MockBackend {
    /// A document whose pages yield the given texts.
    pub fn with_pages<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: texts.into_iter().map(|t| MockPage::Text(t.into())).collect(),
            ..Self::default()
        }
    }

    /// A document with an explicit page script.
    pub fn with_script(pages: Vec<MockPage>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    /// Every `open` fails with `error`.
    pub fn failing(error: OpenError) -> Self {
        Self {
            open_error: Some(error),
            ..Self::default()
        }
    }

    pub fn metadata(mut self, metadata: RawMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl PdfBackend for MockBackend {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn LoadedDocument + 'a>, OpenError> {
        if let Some(ref e) = self.open_error {
            return Err(e.clone());
        }
        if !bytes.starts_with(b"%PDF") {
            return Err(OpenError::Corrupt("missing %PDF header".into()));
        }
        Ok(Box::new(MockDocument { backend: self }))
    }
}

struct MockDocument<'a> {
    backend: &'a MockBackend,
}

impl LoadedDocument for MockDocument<'_> {
    fn page_count(&self) -> usize {
        self.backend.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, PageError> {
        match self.backend.pages.get(index) {
            Some(MockPage::Text(t)) => Ok(t.clone()),
            Some(MockPage::Fail(detail)) => Err(PageError::TextFailed {
                page: index + 1,
                detail: detail.clone(),
            }),
            Some(MockPage::Panic) => panic!("mock engine fault on page {}", index + 1),
            None => Err(PageError::LoadFailed {
                page: index + 1,
                detail: "page index out of range".into(),
            }),
        }
    }

    fn metadata(&self) -> RawMetadata {
        self.backend.metadata.clone()
    }
}
