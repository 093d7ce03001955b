//! Shared fixture builders: real encoded images with hand-assembled
//! EXIF payloads spliced in.

#![allow(dead_code)]

use std::io::Cursor;

// ---------------------------------------------------------------------------
// TIFF/EXIF payload assembly (big-endian)
// ---------------------------------------------------------------------------

pub enum EntryValue {
    Inline([u8; 4]),
    External(Vec<u8>),
}

/// One IFD entry. Values wider than four bytes go to the data area.
pub struct Entry {
    pub tag: u16,
    pub kind: u16,
    pub count: u32,
    pub value: EntryValue,
}

impl Entry {
    pub fn ascii(tag: u16, text: &str) -> Self {
        let mut data = text.as_bytes().to_vec();
        data.push(0);
        let count = data.len() as u32;
        if data.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..data.len()].copy_from_slice(&data);
            Self {
                tag,
                kind: 2,
                count,
                value: EntryValue::Inline(inline),
            }
        } else {
            Self {
                tag,
                kind: 2,
                count,
                value: EntryValue::External(data),
            }
        }
    }

    pub fn short(tag: u16, value: u16) -> Self {
        let mut inline = [0u8; 4];
        inline[..2].copy_from_slice(&value.to_be_bytes());
        Self {
            tag,
            kind: 3,
            count: 1,
            value: EntryValue::Inline(inline),
        }
    }

    pub fn byte(tag: u16, value: u8) -> Self {
        Self {
            tag,
            kind: 1,
            count: 1,
            value: EntryValue::Inline([value, 0, 0, 0]),
        }
    }

    pub fn long(tag: u16, value: u32) -> Self {
        Self {
            tag,
            kind: 4,
            count: 1,
            value: EntryValue::Inline(value.to_be_bytes()),
        }
    }

    pub fn rationals(tag: u16, values: &[(u32, u32)]) -> Self {
        let mut data = Vec::new();
        for &(num, denom) in values {
            data.extend_from_slice(&num.to_be_bytes());
            data.extend_from_slice(&denom.to_be_bytes());
        }
        Self {
            tag,
            kind: 5,
            count: values.len() as u32,
            value: EntryValue::External(data),
        }
    }
}

/// Assembles a TIFF payload with IFD0 plus optional Exif and GPS sub-IFDs.
/// Pointer entries and offsets are filled in on `build`.
#[derive(Default)]
pub struct TiffBuilder {
    pub ifd0: Vec<Entry>,
    pub exif: Vec<Entry>,
    pub gps: Vec<Entry>,
}

impl TiffBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(mut self) -> Vec<u8> {
        fn ifd_len(entries: usize) -> u32 {
            2 + 12 * entries as u32 + 4
        }

        let n0 = self.ifd0.len()
            + usize::from(!self.exif.is_empty())
            + usize::from(!self.gps.is_empty());
        let mut next = 8 + ifd_len(n0);
        let exif_offset = next;
        if !self.exif.is_empty() {
            next += ifd_len(self.exif.len());
        }
        let gps_offset = next;
        if !self.gps.is_empty() {
            next += ifd_len(self.gps.len());
        }
        let data_offset = next;

        if !self.exif.is_empty() {
            self.ifd0.push(Entry::long(0x8769, exif_offset));
        }
        if !self.gps.is_empty() {
            self.ifd0.push(Entry::long(0x8825, gps_offset));
        }
        self.ifd0.sort_by_key(|e| e.tag);
        self.exif.sort_by_key(|e| e.tag);
        self.gps.sort_by_key(|e| e.tag);

        let mut out = vec![b'M', b'M', 0x00, 0x2A];
        out.extend_from_slice(&8u32.to_be_bytes());
        let mut data = Vec::new();
        write_ifd(&mut out, &mut data, data_offset, &self.ifd0);
        if !self.exif.is_empty() {
            write_ifd(&mut out, &mut data, data_offset, &self.exif);
        }
        if !self.gps.is_empty() {
            write_ifd(&mut out, &mut data, data_offset, &self.gps);
        }
        out.extend_from_slice(&data);
        out
    }
}

fn write_ifd(out: &mut Vec<u8>, data: &mut Vec<u8>, data_offset: u32, entries: &[Entry]) {
    out.extend_from_slice(&(entries.len() as u16).to_be_bytes());
    for entry in entries {
        out.extend_from_slice(&entry.tag.to_be_bytes());
        out.extend_from_slice(&entry.kind.to_be_bytes());
        out.extend_from_slice(&entry.count.to_be_bytes());
        match &entry.value {
            EntryValue::Inline(bytes) => out.extend_from_slice(bytes),
            EntryValue::External(bytes) => {
                if data.len() % 2 == 1 {
                    data.push(0);
                }
                out.extend_from_slice(&(data_offset + data.len() as u32).to_be_bytes());
                data.extend_from_slice(bytes);
            }
        }
    }
    // no next IFD
    out.extend_from_slice(&0u32.to_be_bytes());
}

/// GPS sub-IFD placing the image near Berlin: 52.520008 N, 13.404954 E.
pub fn gps_berlin() -> Vec<Entry> {
    vec![
        Entry::ascii(0x0001, "N"),
        Entry::rationals(0x0002, &[(52, 1), (31, 1), (120288, 10000)]),
        Entry::ascii(0x0003, "E"),
        Entry::rationals(0x0004, &[(13, 1), (24, 1), (178344, 10000)]),
    ]
}

// ---------------------------------------------------------------------------
// Container assembly
// ---------------------------------------------------------------------------

fn crc32(data: &[u8]) -> u32 {
    let mut table = [0u32; 256];
    for (i, slot) in table.iter_mut().enumerate() {
        let mut c = i as u32;
        for _ in 0..8 {
            c = if c & 1 != 0 {
                0xEDB8_8320 ^ (c >> 1)
            } else {
                c >> 1
            };
        }
        *slot = c;
    }
    let mut crc = 0xFFFF_FFFFu32;
    for &b in data {
        crc = table[((crc ^ b as u32) & 0xFF) as usize] ^ (crc >> 8);
    }
    crc ^ 0xFFFF_FFFF
}

/// A complete PNG chunk with a valid CRC.
pub fn png_chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = (data.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    let mut crc_input = chunk_type.to_vec();
    crc_input.extend_from_slice(data);
    out.extend_from_slice(&crc32(&crc_input).to_be_bytes());
    out
}

pub fn encode_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([120, 90, 60]),
    ));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

pub fn encode_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([120, 90, 60]),
    ));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Jpeg)
        .unwrap();
    out
}

/// Insert a chunk right after IHDR (8 signature bytes + 25 chunk bytes).
pub fn splice_png_chunk(png: &[u8], chunk: &[u8]) -> Vec<u8> {
    let mut out = png[..33].to_vec();
    out.extend_from_slice(chunk);
    out.extend_from_slice(&png[33..]);
    out
}

/// Encoded JPEG with an APP1 EXIF segment spliced in after SOI.
pub fn jpeg_with_exif(width: u32, height: u32, tiff: &[u8]) -> Vec<u8> {
    let jpeg = encode_jpeg(width, height);
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(tiff);
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Encoded PNG with an eXIf chunk carrying a raw TIFF payload.
pub fn png_with_exif(width: u32, height: u32, tiff: &[u8]) -> Vec<u8> {
    splice_png_chunk(&encode_png(width, height), &png_chunk(b"eXIf", tiff))
}

/// Encoded PNG with a tEXt chunk.
pub fn png_with_text(width: u32, height: u32, keyword: &str, value: &str) -> Vec<u8> {
    let mut data = keyword.as_bytes().to_vec();
    data.push(0);
    data.extend_from_slice(value.as_bytes());
    splice_png_chunk(&encode_png(width, height), &png_chunk(b"tEXt", &data))
}
