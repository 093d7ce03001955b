//! Single-item processing: read, parse, extract, sanitize, persist.
//!
//! Every stage failure maps to exactly one [`ItemStatus`] so a batch
//! always yields one result per submitted input.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::container::ImageContainer;
use crate::error::PipelineError;
use crate::extract::MetadataExtractor;
use crate::sanitize::Sanitizer;
use crate::types::{ItemStatus, MetadataReport, ProcessingResult};

/// Extensions the pipeline will open. Matched case-insensitively.
pub(crate) const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Process one input file end to end. Never panics and never returns an
/// error: every outcome is a [`ProcessingResult`].
pub(crate) fn process_one(path: &Path, config: &Config) -> ProcessingResult {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_string();
    if !SUPPORTED_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str()) {
        // Rejected on name alone; the file is never opened.
        return failure(
            path,
            MetadataReport::default(),
            PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            },
        );
    }

    let file_meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return failure(
                path,
                MetadataReport::default(),
                PipelineError::FileNotFound(path.to_path_buf()),
            );
        }
        Err(e) => {
            return failure(
                path,
                MetadataReport::default(),
                PipelineError::Io {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                },
            );
        }
    };

    let size_mb = file_meta.len() / (1024 * 1024);
    if size_mb > config.limits.max_file_size_mb {
        return failure(
            path,
            MetadataReport::default(),
            PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb,
                max_mb: config.limits.max_file_size_mb,
            },
        );
    }

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return failure(
                path,
                MetadataReport::default(),
                PipelineError::Io {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                },
            );
        }
    };

    let container = match ImageContainer::parse(&bytes) {
        Ok(container) => container,
        Err(source) => {
            return failure(
                path,
                MetadataReport::default(),
                PipelineError::Decode {
                    path: path.to_path_buf(),
                    source,
                },
            );
        }
    };

    let report = MetadataExtractor::extract(&container);

    let cleaned = match Sanitizer::sanitize(&container) {
        Ok(cleaned) => cleaned,
        Err(source) => {
            return failure(
                path,
                report,
                PipelineError::Encode {
                    path: path.to_path_buf(),
                    source,
                },
            );
        }
    };

    // "After" view of what remains, from the bytes actually written.
    let cleaned_report = ImageContainer::parse(&cleaned)
        .map(|c| MetadataExtractor::extract(&c))
        .unwrap_or_default();

    let dest = config.destination_dir();
    let output = output_path(path, &dest, &extension);
    if let Err(e) = std::fs::create_dir_all(&dest) {
        return failure(
            path,
            report,
            PipelineError::Io {
                path: dest,
                message: e.to_string(),
            },
        );
    }
    if let Err(e) = std::fs::write(&output, &cleaned) {
        return failure(
            path,
            report,
            PipelineError::Io {
                path: output,
                message: e.to_string(),
            },
        );
    }

    tracing::info!(
        input = %path.display(),
        output = %output.display(),
        bytes = cleaned.len(),
        sensitive = report.has_sensitive(),
        "cleaned"
    );
    ProcessingResult::success(path, report, cleaned_report, output, cleaned.len() as u64)
}

fn failure(path: &Path, report: MetadataReport, err: PipelineError) -> ProcessingResult {
    tracing::warn!(input = %path.display(), error = %err, "processing failed");
    ProcessingResult::failure(path, report, ItemStatus::from(err))
}

/// Cleaned files keep the input stem and extension: `photo.jpg` becomes
/// `photo_cleaned.jpg` in the destination directory.
fn output_path(input: &Path, dest: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    dest.join(format!("{stem}_cleaned.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_naming() {
        let out = output_path(Path::new("/in/vacation.JPG"), Path::new("/out"), "JPG");
        assert_eq!(out, PathBuf::from("/out/vacation_cleaned.JPG"));

        let out = output_path(Path::new("photo.png"), Path::new("/tmp/x"), "png");
        assert_eq!(out, PathBuf::from("/tmp/x/photo_cleaned.png"));
    }

    #[test]
    fn test_unsupported_extension_skips_file_access() {
        // The path does not exist; an unsupported input must be rejected
        // on its extension without any read attempt.
        let config = Config::default();
        let result = process_one(Path::new("/nonexistent/clip.gif"), &config);
        assert_eq!(
            result.status,
            ItemStatus::UnsupportedFormat {
                extension: "gif".to_string()
            }
        );
    }

    #[test]
    fn test_extensionless_input_is_unsupported() {
        let config = Config::default();
        let result = process_one(Path::new("/nonexistent/README"), &config);
        assert!(matches!(
            result.status,
            ItemStatus::UnsupportedFormat { .. }
        ));
    }

    #[test]
    fn test_missing_file_reports_io_failure() {
        let config = Config::default();
        let result = process_one(Path::new("/nonexistent/photo.jpg"), &config);
        match result.status {
            ItemStatus::IoFailure { message } => assert!(message.contains("not found")),
            other => panic!("expected IoFailure, got {:?}", other),
        }
    }
}
