//! PNG chunk scanning and classification.
//!
//! Chunks are 4-byte length + 4-byte type + data + 4-byte CRC. CRCs are not
//! verified: retained chunks are copied verbatim (CRC included), and dropped
//! chunks never reach an output file.

use crate::error::ParseError;

use super::{ImageContainer, ImageFormat, MetadataSubkind, Segment, SegmentKind};

pub(crate) const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub(crate) fn parse(bytes: &[u8]) -> Result<ImageContainer, ParseError> {
    if !bytes.starts_with(&SIGNATURE) {
        return Err(ParseError::Signature("PNG"));
    }

    let mut segments = Vec::new();
    let mut offset = SIGNATURE.len();
    let mut saw_ihdr = false;
    let mut saw_iend = false;

    while offset < bytes.len() {
        if offset + 8 > bytes.len() {
            return Err(ParseError::Truncated { offset });
        }
        let data_len = u32::from_be_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ]) as usize;
        let end = offset
            .checked_add(12 + data_len)
            .filter(|&end| end <= bytes.len())
            .ok_or(ParseError::Truncated { offset })?;

        let chunk_type: [u8; 4] = bytes[offset + 4..offset + 8].try_into().unwrap();
        saw_ihdr |= &chunk_type == b"IHDR";

        segments.push(Segment::new(
            classify(&chunk_type),
            bytes[offset..end].to_vec(),
        ));
        offset = end;

        if &chunk_type == b"IEND" {
            saw_iend = true;
            // IEND must be last; keep anything after it for the round-trip.
            if offset < bytes.len() {
                segments.push(Segment::new(SegmentKind::Unknown, bytes[offset..].to_vec()));
            }
            break;
        }
    }

    if !saw_ihdr {
        return Err(ParseError::MissingStructural("IHDR"));
    }
    if !saw_iend {
        return Err(ParseError::MissingStructural("IEND"));
    }

    Ok(ImageContainer {
        format: ImageFormat::Png,
        segments,
    })
}

fn classify(chunk_type: &[u8; 4]) -> SegmentKind {
    match chunk_type {
        b"IHDR" | b"PLTE" | b"IEND" => SegmentKind::StructuralRequired,
        b"IDAT" => SegmentKind::PixelData,
        b"eXIf" => SegmentKind::Metadata(MetadataSubkind::Exif),
        b"tEXt" | b"iTXt" | b"zTXt" => SegmentKind::Metadata(MetadataSubkind::TextualComment),
        b"iCCP" => SegmentKind::Metadata(MetadataSubkind::IccProfile),
        // tRNS is ancillary but changes pixel interpretation; dropping it
        // would alter transparency for palette images.
        b"tRNS" => SegmentKind::StructuralRequired,
        // Critical chunks (uppercase first letter) must survive.
        _ if chunk_type[0].is_ascii_uppercase() => SegmentKind::StructuralRequired,
        _ => SegmentKind::Unknown,
    }
}

/// The four type bytes of a chunk segment.
pub(crate) fn chunk_type(segment: &Segment) -> Option<&[u8]> {
    segment.bytes.get(4..8)
}

/// Chunk data without framing.
pub(crate) fn chunk_data(segment: &Segment) -> &[u8] {
    let len = segment.bytes.len();
    segment.bytes.get(8..len.saturating_sub(4)).unwrap_or(&[])
}

/// Keyword and text of a tEXt chunk. Both halves are Latin-1.
pub(crate) fn text_keyword_value(segment: &Segment) -> Option<(String, String)> {
    if chunk_type(segment) != Some(b"tEXt") {
        return None;
    }
    let data = chunk_data(segment);
    let nul = data.iter().position(|&b| b == 0)?;
    Some((latin1(&data[..nul]), latin1(&data[nul + 1..])))
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// (width, height, bit depth, color type) from the IHDR chunk.
pub(crate) fn ihdr_geometry(segment: &Segment) -> Option<(u32, u32, u8, u8)> {
    if chunk_type(segment) != Some(b"IHDR") {
        return None;
    }
    let data = chunk_data(segment);
    if data.len() < 13 {
        return None;
    }
    let width = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let height = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    Some((width, height, data[8], data[9]))
}

pub(crate) fn color_type_name(color_type: u8) -> &'static str {
    match color_type {
        0 => "Graustufen",
        2 => "RGB",
        3 => "Palette",
        4 => "Graustufen + Alpha",
        6 => "RGBA",
        _ => "Unbekannt",
    }
}
