//! pdfium engine via `pdfium-render`.
//!
//! ## Binding
//!
//! pdfium is a C++ shared library loaded at runtime. [`PdfiumBackend::bind`]
//! looks for it in this order:
//!
//! 1. `PDFIUM_LIB_PATH`: explicit path to the library file
//! 2. the platform library name in the current working directory
//! 3. the system library search path
//!
//! Binding happens once at startup; the bound engine is shared by every
//! request (`pdfium-render`'s `sync` + `thread_safe` features make that
//! sound).
//!
//! ## Loading from memory
//!
//! Documents are opened straight from the upload buffer with
//! `load_pdf_from_byte_slice`, so no temporary file is ever written.

use super::{LoadedDocument, PdfBackend};
use crate::error::{OpenError, PageError};
use crate::output::RawMetadata;
use pdfium_render::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit pdfium library file.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Production document engine.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl fmt::Debug for PdfiumBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfiumBackend").finish_non_exhaustive()
    }
}

impl PdfiumBackend {
    /// Bind to the first pdfium library found (see module docs).
    pub fn bind() -> Result<Self, OpenError> {
        if let Ok(path) = std::env::var(PDFIUM_LIB_PATH_ENV) {
            if !path.is_empty() {
                return Self::bind_from_path(Path::new(&path));
            }
        }

        let local = Pdfium::pdfium_platform_library_name_at_path("./");
        let bindings = Pdfium::bind_to_library(&local)
            .inspect(|_| debug!("Bound pdfium from {}", PathBuf::from(&local).display()))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| {
                OpenError::Engine(format!(
                    "failed to load the pdfium library: {e:?}. \
                     Set {PDFIUM_LIB_PATH_ENV}=/path/to/libpdfium or install it system-wide"
                ))
            })?;

        info!("pdfium engine bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Bind to a pdfium library at an explicit `path`.
    pub fn bind_from_path(path: &Path) -> Result<Self, OpenError> {
        let bindings = Pdfium::bind_to_library(path).map_err(|e| {
            OpenError::Engine(format!(
                "failed to bind pdfium from '{}': {e:?}",
                path.display()
            ))
        })?;
        info!("pdfium engine bound from {}", path.display());
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PdfBackend for PdfiumBackend {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn LoadedDocument + 'a>, OpenError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(classify_load_error)?;
        Ok(Box::new(PdfiumDocument { document }))
    }
}

/// pdfium reports a missing password as an internal "PasswordError";
/// everything else about a buffer that will not load is corruption.
fn classify_load_error(e: PdfiumError) -> OpenError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        OpenError::PasswordRequired
    } else {
        OpenError::Corrupt(err_str)
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl LoadedDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_text(&self, index: usize) -> Result<String, PageError> {
        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| PageError::LoadFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })?;

        let text = page.text().map_err(|e| PageError::TextFailed {
            page: index + 1,
            detail: format!("{:?}", e),
        })?;

        Ok(text.all())
    }

    fn metadata(&self) -> RawMetadata {
        let metadata = self.document.metadata();

        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata.get(tag).and_then(|t| {
                let v = t.value().to_string();
                if v.is_empty() {
                    None
                } else {
                    Some(v)
                }
            })
        };

        RawMetadata {
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            subject: get_meta(PdfDocumentMetadataTagType::Subject),
            creator: get_meta(PdfDocumentMetadataTagType::Creator),
            producer: get_meta(PdfDocumentMetadataTagType::Producer),
            creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
            mod_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        }
    }
}
