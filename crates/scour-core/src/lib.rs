//! Scour Core - metadata-aware image sanitizing library.
//!
//! Scour parses JPEG and PNG containers at the segment level, reports
//! the metadata they carry, and re-emits them with only the segments
//! required to display the image.
//!
//! # Architecture
//!
//! ```text
//! Bytes → Parse (segments) → Extract (report) → Sanitize → Persist
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use scour_core::{clean_bytes, Config, Processor};
//!
//! // Whole files, in parallel:
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load().unwrap();
//!     let processor = Processor::new(&config);
//!     let handle = processor.submit(vec!["./photo.jpg".into()]);
//!     let results = handle.collect().await;
//!     println!("{:?}", results[0].status);
//! }
//!
//! // Or a single in-memory buffer:
//! let (report, cleaned) = clean_bytes(&bytes)?;
//! ```

pub mod config;
pub mod container;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod sanitize;
pub mod types;

pub use config::Config;
pub use container::{ImageContainer, ImageFormat, MetadataSubkind, Segment, SegmentKind};
pub use error::{ConfigError, EncodeError, ParseError, PipelineError, Result, ScourError};
pub use extract::MetadataExtractor;
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{discover, BatchEvent, BatchHandle, Processor};
pub use sanitize::{Sanitizer, JPEG_QUALITY};
pub use types::{
    ItemStatus, MetadataItem, MetadataReport, ProcessingResult, ProcessingStats,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Clean a single in-memory image buffer.
///
/// Returns the metadata report for the original bytes together with the
/// sanitized bytes. Filesystem-free entry point for embedding callers.
pub fn clean_bytes(bytes: &[u8]) -> Result<(MetadataReport, Vec<u8>)> {
    let container = ImageContainer::parse(bytes)?;
    let report = MetadataExtractor::extract(&container);
    let cleaned = Sanitizer::sanitize(&container)?;
    Ok((report, cleaned))
}
