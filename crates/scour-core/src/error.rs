//! Error types for the scour sanitizing pipeline.
//!
//! Errors are organized by stage. The container layer reports pure
//! byte-level errors (`ParseError`, `EncodeError`) with no path context;
//! the pipeline wraps them with the input path.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for scour operations.
#[derive(Error, Debug)]
pub enum ScourError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Container parse errors from direct buffer cleaning
    #[error("Decode error: {0}")]
    Parse(#[from] ParseError),

    /// Re-encode errors from direct buffer cleaning
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Byte-level container decode errors.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The buffer does not start with the expected format signature
    #[error("missing {0} signature")]
    Signature(&'static str),

    /// A segment or chunk length field runs past the end of the buffer
    #[error("segment at offset {offset} runs past end of buffer")]
    Truncated { offset: usize },

    /// A structurally required segment is absent
    #[error("required {0} segment missing")]
    MissingStructural(&'static str),
}

/// Re-encode errors from the sanitizer.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Pixel data could not be decoded for the orientation bake-in
    #[error("pixel data could not be decoded: {0}")]
    PixelDecode(String),

    /// The encoder failed to serialize a valid container
    #[error("re-encoding failed: {0}")]
    Encoder(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input extension is not jpg/jpeg/png
    #[error("Unsupported format for {path}: {extension:?}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Container decoding failed
    #[error("Decode error for {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Sanitizing re-encode failed
    #[error("Encode error for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },

    /// Reading the input or writing the output failed
    #[error("IO error for {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Convenience type alias for scour results.
pub type Result<T> = std::result::Result<T, ScourError>;
