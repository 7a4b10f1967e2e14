//! Error types for the pdf-text-api library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PipelineError`]: **Fatal**: the upload cannot be turned into a
//!   result at all (rejected input, unreadable document, internal fault).
//!   Returned as `Err(PipelineError)` from the [`crate::parse`] entry points.
//!
//! * [`PageError`]: **Non-fatal**: a single page refused to yield text but
//!   every other page is fine. It is logged and recorded as an `ok = false`
//!   [`crate::output::ExtractedPage`]; it never aborts the document.
//!
//! [`ValidationError`] and [`OpenError`] are the stage-level reasons that
//! the orchestrator folds into [`PipelineError`].

use thiserror::Error;

/// All fatal errors returned by the extraction pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The upload was rejected before any parsing was attempted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The document structure could not be opened: malformed container,
    /// missing cross-reference data, or a password is required.
    #[error("PDF file is corrupted or encrypted and cannot be read")]
    CorruptOrEncrypted,

    /// Anything else. The message is for logs only; callers facing end
    /// users should show a generic message instead.
    #[error("Unexpected error while parsing the document: {0}")]
    Unexpected(String),
}

impl PipelineError {
    /// `true` when the failure was caused by what the client sent.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PipelineError::Unexpected(_))
    }
}

/// Why an upload was rejected by the input validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No file part was supplied.
    #[error("No file found in the request")]
    MissingFile,

    /// The file part carried an empty filename.
    #[error("Filename is empty")]
    EmptyFilename,

    /// The filename's extension is not in the allowed set.
    #[error("Unsupported file type, allowed extensions: {allowed}")]
    DisallowedExtension { filename: String, allowed: String },

    /// The payload exceeds the configured ceiling.
    #[error("File too large, maximum supported size is {}MB", .limit / (1024 * 1024))]
    TooLarge { size: usize, limit: usize },
}

/// Failure to open a byte buffer as a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenError {
    /// Header, trailer or xref is corrupt and cannot be parsed.
    #[error("document is corrupt: {0}")]
    Corrupt(String),

    /// The document is encrypted and no password was supplied.
    #[error("document is encrypted and requires a password")]
    PasswordRequired,

    /// The engine itself failed (not bound, out of memory, ...).
    #[error("document engine failure: {0}")]
    Engine(String),
}

impl From<OpenError> for PipelineError {
    fn from(e: OpenError) -> Self {
        match e {
            OpenError::Corrupt(_) | OpenError::PasswordRequired => PipelineError::CorruptOrEncrypted,
            OpenError::Engine(detail) => PipelineError::Unexpected(detail),
        }
    }
}

/// A non-fatal error for a single page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// The engine could not load the page object.
    #[error("Page {page}: failed to load: {detail}")]
    LoadFailed { page: usize, detail: String },

    /// The page loaded but its text layer could not be read.
    #[error("Page {page}: text extraction failed: {detail}")]
    TextFailed { page: usize, detail: String },
}

/// Builder validation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid configuration: {0}")]
pub struct ConfigError(pub String);
