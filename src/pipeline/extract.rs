//! Document extraction: open the buffer and pull text from every page.
//!
//! ## Per-page isolation
//!
//! Each page is attempted independently and its `Result` is folded into an
//! [`ExtractedPage`]: `Ok(text)` becomes `ok = true`, `Err(_)` becomes an
//! empty `ok = false` page. One bad content stream therefore costs exactly
//! one page of text and never the document.
//!
//! Only a failure to *open* the document is fatal here.

use crate::backend::{LoadedDocument, PdfBackend};
use crate::config::ExtractionConfig;
use crate::error::{OpenError, PipelineError};
use crate::output::{ExtractedDocument, ExtractedPage};
use tracing::{debug, error, info, warn};

/// Open `bytes` with `backend` and extract every page in document order.
pub fn extract(
    bytes: &[u8],
    backend: &dyn PdfBackend,
    config: &ExtractionConfig,
) -> Result<ExtractedDocument, PipelineError> {
    let document = backend.open(bytes).map_err(|e| {
        match &e {
            OpenError::PasswordRequired => warn!("Document is encrypted: {}", e),
            OpenError::Corrupt(_) => warn!("Document could not be parsed: {}", e),
            OpenError::Engine(_) => error!("Document engine failed: {}", e),
        }
        PipelineError::from(e)
    })?;

    let total_pages = document.page_count();
    debug!("Document opened: {} pages", total_pages);

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(total_pages);
    }

    let pages: Vec<ExtractedPage> = (0..total_pages)
        .map(|idx| extract_page(document.as_ref(), idx, total_pages, config))
        .collect();

    let metadata = document.metadata();

    let extracted = ExtractedDocument { pages, metadata };
    let success = extracted.success_count();
    if success < total_pages {
        warn!(
            "{}/{} pages yielded no text because extraction failed",
            total_pages - success,
            total_pages
        );
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(total_pages, success);
    }

    Ok(extracted)
}

/// Attempt one page, converting a failure into an empty `ok = false` page.
fn extract_page(
    document: &dyn LoadedDocument,
    idx: usize,
    total_pages: usize,
    config: &ExtractionConfig,
) -> ExtractedPage {
    let page_num = idx + 1;

    let page = match document.page_text(idx) {
        Ok(text) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_page_complete(page_num, total_pages, text.chars().count());
            }
            ExtractedPage::extracted(idx, text)
        }
        Err(e) => {
            warn!("Skipping text of page {}: {}", page_num, e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_page_error(page_num, total_pages, &e.to_string());
            }
            ExtractedPage::failed(idx)
        }
    };

    if idx % config.progress_interval == 0 {
        info!("Processed {}/{} pages", page_num, total_pages);
    }

    page
}
