//! Input validation: reject an upload before any parsing is attempted.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. a file part is present
//! 2. its filename is not empty
//! 3. the extension (text after the last `.`, case-insensitive) is allowed
//! 4. the byte length is within the configured ceiling
//!
//! The size check comes last so a wrong file type is reported as such even
//! when it is also too large.

use crate::config::ExtractionConfig;
use crate::error::ValidationError;
use crate::output::ValidatedUpload;
use bytes::Bytes;

/// Validate a (possibly absent) file part and its filename.
pub fn validate(
    file: Option<Bytes>,
    filename: &str,
    config: &ExtractionConfig,
) -> Result<ValidatedUpload, ValidationError> {
    let bytes = file.ok_or(ValidationError::MissingFile)?;

    if filename.is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    let allowed = extension(filename).is_some_and(|ext| config.is_allowed_extension(ext));
    if !allowed {
        return Err(ValidationError::DisallowedExtension {
            filename: filename.to_string(),
            allowed: config.allowed_extensions_display(),
        });
    }

    if bytes.len() > config.max_file_size {
        return Err(ValidationError::TooLarge {
            size: bytes.len(),
            limit: config.max_file_size,
        });
    }

    Ok(ValidatedUpload {
        bytes,
        filename: filename.to_string(),
    })
}

/// Text after the last `.`, or `None` when the name has no dot.
pub fn extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}
