//! Core data types for the scour sanitizing pipeline.
//!
//! These types represent what the pipeline reports back for each input:
//! the metadata found before cleaning, the per-item outcome, and batch
//! statistics.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// A single metadata entry surfaced to the caller, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataItem {
    /// Display label (e.g. "Hersteller", "GPS-Koordinaten")
    pub label: String,

    /// Formatted value
    pub value: String,

    /// True when the item identifies capture device, time, or location
    pub sensitive: bool,
}

impl MetadataItem {
    /// Create a non-sensitive item (geometry, color model, and the like).
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            sensitive: false,
        }
    }

    /// Create a sensitive item (anything from the EXIF/GPS/TIFF tag tables).
    pub fn sensitive(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            sensitive: true,
        }
    }
}

/// Ordered metadata report for one image.
///
/// This is the synchronous `describe` surface consumed by UIs: items are
/// already ordered and labelled for a before/after panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataReport {
    pub items: Vec<MetadataItem>,
}

impl MetadataReport {
    /// True when nothing was found at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when at least one item is classified sensitive.
    pub fn has_sensitive(&self) -> bool {
        self.items.iter().any(|item| item.sensitive)
    }

    /// Look up a value by label. Convenience for tests and callers.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.label == label)
            .map(|item| item.value.as_str())
    }
}

/// Per-input outcome. Exactly one of these per submitted input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemStatus {
    /// Cleaned bytes were produced and written
    Success,

    /// Extension is not jpg/jpeg/png; the file was never opened
    UnsupportedFormat { extension: String },

    /// The container was malformed or truncated
    DecodeFailure { message: String },

    /// Re-encoding or serialization failed
    EncodeFailure { message: String },

    /// Reading the input or writing the output failed
    IoFailure { message: String },
}

impl ItemStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemStatus::Success)
    }

    /// Failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ItemStatus::Success => None,
            ItemStatus::UnsupportedFormat { extension } => Some(extension),
            ItemStatus::DecodeFailure { message }
            | ItemStatus::EncodeFailure { message }
            | ItemStatus::IoFailure { message } => Some(message),
        }
    }
}

impl From<PipelineError> for ItemStatus {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::UnsupportedFormat { extension, .. } => {
                ItemStatus::UnsupportedFormat { extension }
            }
            PipelineError::Decode { source, .. } => ItemStatus::DecodeFailure {
                message: source.to_string(),
            },
            PipelineError::Encode { source, .. } => ItemStatus::EncodeFailure {
                message: source.to_string(),
            },
            PipelineError::Io { message, .. } => ItemStatus::IoFailure { message },
            // Guard failures never reach the decoder; report them as I/O.
            err @ PipelineError::FileTooLarge { .. } => ItemStatus::IoFailure {
                message: err.to_string(),
            },
            PipelineError::FileNotFound(path) => ItemStatus::IoFailure {
                message: format!("file not found: {}", path.display()),
            },
        }
    }
}

/// The complete record for one processed input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// The submitted input path
    pub input: PathBuf,

    /// Outcome for this input
    pub status: ItemStatus,

    /// Metadata found in the original ("before" report)
    pub report: MetadataReport,

    /// Report extracted from the cleaned bytes ("after"), present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned_report: Option<MetadataReport>,

    /// Where the cleaned file was written, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Size of the cleaned file in bytes, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_written: Option<u64>,
}

impl ProcessingResult {
    /// Record a failed input.
    pub fn failure(input: &Path, report: MetadataReport, status: ItemStatus) -> Self {
        Self {
            input: input.to_path_buf(),
            status,
            report,
            cleaned_report: None,
            output: None,
            bytes_written: None,
        }
    }

    /// Record a successfully cleaned and persisted input.
    pub fn success(
        input: &Path,
        report: MetadataReport,
        cleaned_report: MetadataReport,
        output: PathBuf,
        bytes_written: u64,
    ) -> Self {
        Self {
            input: input.to_path_buf(),
            status: ItemStatus::Success,
            report,
            cleaned_report: Some(cleaned_report),
            output: Some(output),
            bytes_written: Some(bytes_written),
        }
    }
}

/// Statistics for a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Inputs cleaned and written
    pub succeeded: usize,

    /// Inputs skipped for an unsupported extension
    pub unsupported: usize,

    /// Inputs that failed to decode, re-encode, or persist
    pub failed: usize,

    /// Wall-clock batch duration in seconds
    pub total_seconds: f64,
}

impl ProcessingStats {
    /// Tally a finished batch.
    pub fn tally(results: &[ProcessingResult], elapsed: std::time::Duration) -> Self {
        let mut stats = Self {
            total_seconds: elapsed.as_secs_f64(),
            ..Self::default()
        };
        for result in results {
            match result.status {
                ItemStatus::Success => stats.succeeded += 1,
                ItemStatus::UnsupportedFormat { .. } => stats.unsupported += 1,
                _ => stats.failed += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.unsupported + self.failed
    }
}
