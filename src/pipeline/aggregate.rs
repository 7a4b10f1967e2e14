//! Result aggregation: assemble the response payload.
//!
//! Each metadata field has its own small defaulting function so the
//! fallback rules can be read (and tested) in isolation:
//!
//! | Field | When absent |
//! |-------|-------------|
//! | `title` | the upload's filename |
//! | `author` | the configured unknown-author sentinel |
//! | everything else | `""` |

use crate::config::ExtractionConfig;
use crate::output::{DocumentMetadata, ExtractedDocument, ExtractionResult, RawMetadata};
use crate::pipeline::normalize;

/// Build the final result from an extracted document.
pub fn aggregate(
    document: &ExtractedDocument,
    filename: &str,
    size_bytes: usize,
    config: &ExtractionConfig,
) -> ExtractionResult {
    let normalized_text = normalize::normalize(&document.pages);
    let sectioned_text = normalize::sectioned(&document.pages);
    assemble(
        document,
        normalized_text,
        sectioned_text,
        filename,
        size_bytes,
        config,
    )
}

/// Build the result around text that has already been normalised.
pub fn assemble(
    document: &ExtractedDocument,
    normalized_text: String,
    sectioned_text: String,
    filename: &str,
    size_bytes: usize,
    config: &ExtractionConfig,
) -> ExtractionResult {
    let character_count = normalized_text.chars().count();

    let metadata = build_metadata(
        &document.metadata,
        filename,
        size_bytes,
        character_count,
        &config.unknown_author,
    );

    ExtractionResult {
        normalized_text,
        page_count: document.pages.len(),
        metadata,
        sectioned_text,
    }
}

/// Fill every metadata field, applying per-field defaults.
pub fn build_metadata(
    raw: &RawMetadata,
    filename: &str,
    size_bytes: usize,
    character_count: usize,
    unknown_author: &str,
) -> DocumentMetadata {
    DocumentMetadata {
        title: title_or_filename(raw.title.as_deref(), filename),
        author: author_or_unknown(raw.author.as_deref(), unknown_author),
        subject: or_empty(raw.subject.as_deref()),
        creator: or_empty(raw.creator.as_deref()),
        producer: or_empty(raw.producer.as_deref()),
        creation_date: or_empty(raw.creation_date.as_deref()),
        mod_date: or_empty(raw.mod_date.as_deref()),
        filename: filename.to_string(),
        size_bytes,
        character_count,
    }
}

pub fn title_or_filename(title: Option<&str>, filename: &str) -> String {
    title.unwrap_or(filename).to_string()
}

pub fn author_or_unknown(author: Option<&str>, unknown_author: &str) -> String {
    author.unwrap_or(unknown_author).to_string()
}

pub fn or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}
