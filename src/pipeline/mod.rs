//! Pipeline stages for upload-to-text extraction.
//!
//! Each submodule implements exactly one transformation step; the
//! orchestrator in [`crate::parse`] sequences them.
//!
//! ## Data Flow
//!
//! ```text
//! validate ──▶ extract ──▶ normalize ──▶ aggregate
//! (checks)     (engine)    (whitespace)  (metadata defaults)
//! ```
//!
//! 1. [`validate`]: presence, filename, extension and size checks; pure
//! 2. [`extract`]: open the document and read every page, isolating
//!    per-page failures
//! 3. [`normalize`]: collapse page texts into one whitespace-normalised string
//! 4. [`aggregate`]: assemble the result and fill metadata defaults

pub mod aggregate;
pub mod extract;
pub mod normalize;
pub mod validate;

use std::fmt;

/// Where a pipeline run currently is.
///
/// Runs only move forward: `Received → Validated → Extracted → Normalized →
/// Aggregated → Done`, or stop early at whichever stage failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Received,
    Validated,
    Extracted,
    Normalized,
    Aggregated,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::Extracted => "extracted",
            Stage::Normalized => "normalized",
            Stage::Aggregated => "aggregated",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}
