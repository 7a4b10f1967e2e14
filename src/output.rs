//! Data types flowing through the pipeline, from upload to result.
//!
//! ```text
//! UploadRequest ─validate─▶ ValidatedUpload ─extract─▶ ExtractedDocument
//!                                                       │
//!                                  normalize + aggregate ▼
//!                                               ExtractionResult
//! ```
//!
//! Every value here is owned by exactly one pipeline run; nothing is shared
//! between requests.

use bytes::Bytes;
use crate::pipeline::normalize;
use serde::Serialize;

/// What the boundary layer received: the file part (if any) and its name.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// Raw bytes of the file part; `None` when no file part was supplied.
    pub file: Option<Bytes>,
    /// Client-supplied filename. Empty when the part carried none.
    pub filename: String,
}

impl UploadRequest {
    pub fn new(file: impl Into<Bytes>, filename: impl Into<String>) -> Self {
        Self {
            file: Some(file.into()),
            filename: filename.into(),
        }
    }

    /// A request that carried no file part at all.
    pub fn missing() -> Self {
        Self::default()
    }
}

/// An upload that passed every input check.
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
    pub bytes: Bytes,
    pub filename: String,
}

/// Outcome of extracting one page.
///
/// A failed page is kept (with empty text) so that page numbering and the
/// document's page count stay intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// 0-based position in document order.
    pub index: usize,
    pub text: String,
    pub ok: bool,
}

impl ExtractedPage {
    pub fn extracted(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            ok: true,
        }
    }

    pub fn failed(index: usize) -> Self {
        Self {
            index,
            text: String::new(),
            ok: false,
        }
    }

    /// 1-based page number, as shown to humans.
    pub fn page_num(&self) -> usize {
        self.index + 1
    }

    /// `true` when the page contributes to the document text.
    pub fn has_text(&self) -> bool {
        self.ok
            && !self
                .text
                .trim_matches(normalize::is_text_whitespace)
                .is_empty()
    }
}

/// Info-dictionary values exactly as the document reports them.
///
/// `None` means the document did not supply the field; defaulting happens in
/// [`crate::pipeline::aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
}

/// Everything the extractor pulled out of a document.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    /// One entry per page the document reports, in order.
    pub pages: Vec<ExtractedPage>,
    pub metadata: RawMetadata,
}

impl ExtractedDocument {
    pub fn success_count(&self) -> usize {
        self.pages.iter().filter(|p| p.ok).count()
    }
}

/// Descriptive metadata returned to the client, every field populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
    pub producer: String,
    pub creation_date: String,
    pub mod_date: String,
    pub filename: String,
    /// Upload size in bytes.
    #[serde(rename = "size")]
    pub size_bytes: usize,
    /// Length of [`ExtractionResult::normalized_text`] in characters.
    pub character_count: usize,
}

/// The successful outcome of one pipeline run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Full document text with every whitespace run collapsed to one space.
    #[serde(rename = "text")]
    pub normalized_text: String,
    /// Pages the document reports, including pages that yielded no text.
    pub page_count: usize,
    pub metadata: DocumentMetadata,
    /// Human-readable per-page variant (`--- Page N ---` headers).
    /// Kept for callers of the library; not part of the wire format.
    #[serde(skip)]
    pub sectioned_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_page_has_no_text() {
        let p = ExtractedPage::failed(2);
        assert_eq!(p.page_num(), 3);
        assert!(!p.ok);
        assert!(!p.has_text());
    }

    #[test]
    fn whitespace_only_page_has_no_text() {
        assert!(!ExtractedPage::extracted(0, " \n\t ").has_text());
        assert!(ExtractedPage::extracted(0, " a ").has_text());
        assert!(!ExtractedPage::extracted(0, "\u{1c}\u{1d}\u{1e}\u{1f}").has_text());
    }

    #[test]
    fn result_serialises_with_wire_names() {
        let result = ExtractionResult {
            normalized_text: "hello world".into(),
            page_count: 2,
            metadata: DocumentMetadata {
                title: "t".into(),
                author: "a".into(),
                subject: String::new(),
                creator: String::new(),
                producer: String::new(),
                creation_date: "D:20240101".into(),
                mod_date: String::new(),
                filename: "t.pdf".into(),
                size_bytes: 1234,
                character_count: 11,
            },
            sectioned_text: "--- Page 1 ---\nhello world".into(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["text"], "hello world");
        assert_eq!(json["pageCount"], 2);
        assert_eq!(json["metadata"]["creationDate"], "D:20240101");
        assert_eq!(json["metadata"]["modDate"], "");
        assert_eq!(json["metadata"]["size"], 1234);
        assert_eq!(json["metadata"]["characterCount"], 11);
        assert!(json.get("sectionedText").is_none());
    }
}
