//! Configuration for the extraction pipeline.
//!
//! Every knob the pipeline reads lives in [`ExtractionConfig`], built via
//! its [`ExtractionConfigBuilder`] and handed to the orchestrator (and the
//! HTTP router state) at construction time. Nothing is read from
//! process-wide state while a request is in flight.

use crate::error::ConfigError;
use crate::progress::ProgressCallback;
use std::collections::BTreeSet;
use std::fmt;

/// Default upload ceiling: 100 MiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 100 * 1024 * 1024;

/// Default progress logging interval, in pages.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10;

/// Author reported when the document does not name one.
pub const DEFAULT_UNKNOWN_AUTHOR: &str = "未知作者";

/// Configuration for one extraction pipeline.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_text_api::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .max_file_size(10 * 1024 * 1024)
///     .allowed_extensions(["pdf"])
///     .build()
///     .unwrap();
/// assert!(config.is_allowed_extension("PDF"));
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Largest accepted upload in bytes. Default: 100 MiB.
    pub max_file_size: usize,

    /// Accepted filename extensions, lower-case, without the dot.
    /// Default: `{"pdf"}`.
    pub allowed_extensions: BTreeSet<String>,

    /// Emit a progress log line every N pages. Default: 10.
    pub progress_interval: usize,

    /// Value reported as `author` when the document carries none.
    pub unknown_author: String,

    /// Optional per-page event sink.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: BTreeSet::from(["pdf".to_string()]),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            unknown_author: DEFAULT_UNKNOWN_AUTHOR.to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("max_file_size", &self.max_file_size)
            .field("allowed_extensions", &self.allowed_extensions)
            .field("progress_interval", &self.progress_interval)
            .field("unknown_author", &self.unknown_author)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Case-insensitive membership test against the allowed set.
    pub fn is_allowed_extension(&self, ext: &str) -> bool {
        self.allowed_extensions.contains(&ext.to_lowercase())
    }

    /// The allowed set rendered for messages, e.g. `"pdf"` or `"pdf, txt"`.
    pub fn allowed_extensions_display(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Size ceiling in whole megabytes, for user-facing messages.
    pub fn max_file_size_mb(&self) -> usize {
        self.max_file_size / (1024 * 1024)
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn max_file_size(mut self, bytes: usize) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    /// Replace the allowed set. Entries are lower-cased and a leading dot
    /// is stripped, so `".PDF"` and `"pdf"` are the same extension.
    pub fn allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.allowed_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn progress_interval(mut self, pages: usize) -> Self {
        self.config.progress_interval = pages;
        self
    }

    pub fn unknown_author(mut self, author: impl Into<String>) -> Self {
        self.config.unknown_author = author.into();
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ConfigError> {
        let c = &self.config;
        if c.max_file_size == 0 {
            return Err(ConfigError("max file size must be > 0".into()));
        }
        if c.allowed_extensions.is_empty() {
            return Err(ConfigError(
                "at least one allowed extension is required".into(),
            ));
        }
        if c.progress_interval == 0 {
            return Err(ConfigError("progress interval must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}
