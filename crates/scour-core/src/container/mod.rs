//! Container decoding: JPEG marker segments and PNG chunks, classified
//! into pixel data, metadata, and structural spans.
//!
//! Segments keep their raw bytes verbatim, so re-serializing an unmodified
//! container reproduces the input byte for byte. Classification decides
//! what the sanitizer keeps: anything not proven structural or pixel data
//! is dropped.

pub mod jpeg;
pub mod png;

use crate::error::ParseError;

/// Supported container formats. No conversion between them ever happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
        }
    }
}

/// Metadata families a segment can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataSubkind {
    Exif,
    Gps,
    Tiff,
    IccProfile,
    Xmp,
    TextualComment,
    Thumbnail,
}

/// Classification of a raw byte span within a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Compressed pixel data (JPEG scan, PNG IDAT)
    PixelData,

    /// An identified metadata carrier
    Metadata(MetadataSubkind),

    /// Required for a standard decoder to accept the file
    StructuralRequired,

    /// Not proven necessary for decoding; dropped during sanitization
    Unknown,
}

/// A demarcated byte region: one JPEG marker segment (including marker and
/// length bytes) or one PNG chunk (length, type, data, CRC).
#[derive(Debug, Clone)]
pub struct Segment {
    pub kind: SegmentKind,
    pub bytes: Vec<u8>,
}

impl Segment {
    pub(crate) fn new(kind: SegmentKind, bytes: Vec<u8>) -> Self {
        Self { kind, bytes }
    }

    /// True when the sanitizer must carry this segment over.
    pub fn is_retained(&self) -> bool {
        matches!(
            self.kind,
            SegmentKind::PixelData | SegmentKind::StructuralRequired
        )
    }
}

/// A fully parsed container: format tag plus ordered segments.
///
/// Containers are created per input and live only for the duration of one
/// processing call.
#[derive(Debug)]
pub struct ImageContainer {
    pub format: ImageFormat,
    pub segments: Vec<Segment>,
}

impl ImageContainer {
    /// Parse a byte buffer, detecting JPEG or PNG from its signature.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        if bytes.starts_with(&png::SIGNATURE) {
            png::parse(bytes)
        } else if bytes.starts_with(&jpeg::SOI) {
            jpeg::parse(bytes)
        } else {
            Err(ParseError::Signature("JPEG or PNG"))
        }
    }

    /// Re-serialize exactly as parsed. For an unmodified container this is
    /// byte-identical to the original input.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = match self.format {
            ImageFormat::Png => png::SIGNATURE.to_vec(),
            ImageFormat::Jpeg => Vec::new(),
        };
        for segment in &self.segments {
            out.extend_from_slice(&segment.bytes);
        }
        out
    }

    /// Iterate over metadata segments with their subkinds.
    pub fn metadata_segments(&self) -> impl Iterator<Item = (MetadataSubkind, &Segment)> {
        self.segments.iter().filter_map(|segment| match segment.kind {
            SegmentKind::Metadata(subkind) => Some((subkind, segment)),
            _ => None,
        })
    }

    /// The first metadata segment of the given subkind, if any.
    pub fn find_metadata(&self, subkind: MetadataSubkind) -> Option<&Segment> {
        self.metadata_segments()
            .find(|(kind, _)| *kind == subkind)
            .map(|(_, segment)| segment)
    }
}
