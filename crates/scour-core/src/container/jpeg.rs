//! JPEG marker-segment scanning and classification.
//!
//! The scanner walks 0xFF-prefixed markers from SOI to EOI. Entropy-coded
//! scan data after an SOS header is folded into the same PixelData segment,
//! skipping byte-stuffed 0xFF00 pairs and restart markers.

use crate::error::ParseError;

use super::{ImageContainer, ImageFormat, MetadataSubkind, Segment, SegmentKind};

/// Start-of-image marker; doubles as the format signature.
pub(crate) const SOI: [u8; 2] = [0xFF, 0xD8];

const EXIF_HEADER: &[u8] = b"Exif\0\0";
const XMP_NAMESPACE: &[u8] = b"http://ns.adobe.com/xap/1.0/";

pub(crate) fn parse(bytes: &[u8]) -> Result<ImageContainer, ParseError> {
    if !bytes.starts_with(&SOI) {
        return Err(ParseError::Signature("JPEG"));
    }

    let mut segments = vec![Segment::new(SegmentKind::StructuralRequired, SOI.to_vec())];
    let mut offset = 2;
    let mut saw_sof = false;

    while offset < bytes.len() {
        if bytes[offset] != 0xFF || offset + 1 >= bytes.len() {
            return Err(ParseError::Truncated { offset });
        }
        let marker = bytes[offset + 1];

        match marker {
            // Standalone markers carry no length field.
            0x01 | 0xD0..=0xD7 => {
                segments.push(Segment::new(
                    SegmentKind::Unknown,
                    bytes[offset..offset + 2].to_vec(),
                ));
                offset += 2;
            }

            // EOI terminates the image. Anything after it is not part of
            // the container; keep it so round-trips stay identical.
            0xD9 => {
                segments.push(Segment::new(
                    SegmentKind::StructuralRequired,
                    bytes[offset..offset + 2].to_vec(),
                ));
                offset += 2;
                if offset < bytes.len() {
                    segments.push(Segment::new(
                        SegmentKind::Unknown,
                        bytes[offset..].to_vec(),
                    ));
                }
                break;
            }

            // SOS: header segment plus the entropy-coded scan that follows.
            0xDA => {
                let length = read_length(bytes, offset)?;
                let scan_end = find_scan_end(bytes, offset + 2 + length);
                segments.push(Segment::new(
                    SegmentKind::PixelData,
                    bytes[offset..scan_end].to_vec(),
                ));
                offset = scan_end;
            }

            _ => {
                let length = read_length(bytes, offset)?;
                let end = offset + 2 + length;
                let payload = &bytes[offset + 4..end];
                let kind = classify(marker, payload);
                if is_sof_marker(marker) {
                    saw_sof = true;
                }
                segments.push(Segment::new(kind, bytes[offset..end].to_vec()));
                offset = end;
            }
        }
    }

    if !saw_sof {
        return Err(ParseError::MissingStructural("SOF"));
    }

    Ok(ImageContainer {
        format: ImageFormat::Jpeg,
        segments,
    })
}

/// Length field of a marker segment, validated against the buffer.
/// The returned length includes the two length bytes themselves.
fn read_length(bytes: &[u8], offset: usize) -> Result<usize, ParseError> {
    if offset + 4 > bytes.len() {
        return Err(ParseError::Truncated { offset });
    }
    let length = u16::from_be_bytes([bytes[offset + 2], bytes[offset + 3]]) as usize;
    if length < 2 || offset + 2 + length > bytes.len() {
        return Err(ParseError::Truncated { offset });
    }
    Ok(length)
}

/// Scan data runs until a marker that is neither a stuffed 0xFF00 pair nor
/// a restart marker. A scan that reaches the end of the buffer simply ends
/// there; the missing EOI shows up as a decode failure downstream.
fn find_scan_end(bytes: &[u8], mut pos: usize) -> usize {
    while pos + 1 < bytes.len() {
        if bytes[pos] == 0xFF {
            let next = bytes[pos + 1];
            if next != 0x00 && !(0xD0..=0xD7).contains(&next) {
                return pos;
            }
            pos += 2;
        } else {
            pos += 1;
        }
    }
    bytes.len()
}

fn is_sof_marker(marker: u8) -> bool {
    // SOF0-SOF15 minus DHT (C4), JPG (C8), and DAC (CC).
    matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

fn classify(marker: u8, payload: &[u8]) -> SegmentKind {
    match marker {
        0xE1 if payload.starts_with(EXIF_HEADER) => {
            SegmentKind::Metadata(MetadataSubkind::Exif)
        }
        0xE1 if payload.starts_with(XMP_NAMESPACE) => {
            SegmentKind::Metadata(MetadataSubkind::Xmp)
        }
        0xE2 => SegmentKind::Metadata(MetadataSubkind::IccProfile),
        0xFE => SegmentKind::Metadata(MetadataSubkind::TextualComment),
        // DHT, DQT, DRI
        0xC4 | 0xDB | 0xDD => SegmentKind::StructuralRequired,
        _ if is_sof_marker(marker) => SegmentKind::StructuralRequired,
        // APP0/JFIF lands here: decoders do not need it.
        _ => SegmentKind::Unknown,
    }
}

/// TIFF payload of an Exif APP1 segment (after marker, length, "Exif\0\0").
pub(crate) fn exif_payload(segment: &Segment) -> Option<&[u8]> {
    segment.bytes.get(4 + EXIF_HEADER.len()..)
}

/// Payload of a COM segment.
pub(crate) fn comment_payload(segment: &Segment) -> Option<&[u8]> {
    segment.bytes.get(4..)
}

/// (width, height, component count) from an SOF segment.
pub(crate) fn sof_geometry(segment: &Segment) -> Option<(u16, u16, u8)> {
    if segment.bytes.len() < 2 || !is_sof_marker(segment.bytes[1]) {
        return None;
    }
    // SOF payload: precision u8, height u16, width u16, components u8
    let payload = segment.bytes.get(4..)?;
    if payload.len() < 6 {
        return None;
    }
    let height = u16::from_be_bytes([payload[1], payload[2]]);
    let width = u16::from_be_bytes([payload[3], payload[4]]);
    Some((width, height, payload[5]))
}
