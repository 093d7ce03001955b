//! Sanitizing re-encode: emit a container holding only structural and
//! pixel-data segments.
//!
//! Two paths. The common one copies retained segments verbatim, so pixel
//! bytes are untouched. When the EXIF carried an orientation other than
//! upright, dropping it would change how the image is presented, so the
//! rotation/flip is baked into the pixels and the image is re-encoded.

use std::io::Cursor;

use image::DynamicImage;

use crate::container::{png, ImageContainer, ImageFormat};
use crate::error::EncodeError;
use crate::extract::MetadataExtractor;

/// Fixed JPEG re-encode quality, used only on the orientation bake-in path.
pub const JPEG_QUALITY: u8 = 90;

/// Rebuilds metadata-free containers.
pub struct Sanitizer;

impl Sanitizer {
    /// Emit cleaned bytes for a parsed container.
    pub fn sanitize(container: &ImageContainer) -> Result<Vec<u8>, EncodeError> {
        match MetadataExtractor::orientation(container) {
            Some(orientation @ 2..=8) => Self::bake_orientation(container, orientation),
            _ => Ok(Self::copy_structural(container)),
        }
    }

    /// Verbatim path: StructuralRequired and PixelData segments in their
    /// original relative order; Metadata and Unknown segments dropped.
    fn copy_structural(container: &ImageContainer) -> Vec<u8> {
        let mut out = match container.format {
            ImageFormat::Png => png::SIGNATURE.to_vec(),
            ImageFormat::Jpeg => Vec::new(),
        };
        for segment in container.segments.iter().filter(|s| s.is_retained()) {
            out.extend_from_slice(&segment.bytes);
        }
        out
    }

    /// Re-encode path: decode the pixels, apply the orientation transform,
    /// encode without carrying anything else over. The format never changes.
    fn bake_orientation(
        container: &ImageContainer,
        orientation: u32,
    ) -> Result<Vec<u8>, EncodeError> {
        tracing::debug!("baking EXIF orientation {} into pixel data", orientation);

        let original = container.to_bytes();
        let decoded = image::ImageReader::new(Cursor::new(original.as_slice()))
            .with_guessed_format()
            .map_err(|e| EncodeError::PixelDecode(e.to_string()))?
            .decode()
            .map_err(|e| EncodeError::PixelDecode(e.to_string()))?;

        let upright = apply_orientation(decoded, orientation);

        let mut out = Vec::new();
        let mut cursor = Cursor::new(&mut out);
        match container.format {
            ImageFormat::Jpeg => {
                let encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
                upright
                    .write_with_encoder(encoder)
                    .map_err(|e| EncodeError::Encoder(e.to_string()))?;
            }
            ImageFormat::Png => {
                let encoder = image::codecs::png::PngEncoder::new(&mut cursor);
                upright
                    .write_with_encoder(encoder)
                    .map_err(|e| EncodeError::Encoder(e.to_string()))?;
            }
        }
        Ok(out)
    }
}

/// EXIF orientation values 2-8 mapped to the flips and quarter turns that
/// bring the image upright. Value 1 (and anything out of range) is a no-op.
fn apply_orientation(image: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    /// 2x1 image with distinct pixels so transforms are observable.
    fn two_pixels() -> DynamicImage {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 0, 255]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_orientation_rotations_swap_dimensions() {
        for orientation in [5, 6, 7, 8] {
            let rotated = apply_orientation(two_pixels(), orientation);
            assert_eq!(rotated.dimensions(), (1, 2), "orientation {orientation}");
        }
        for orientation in [1, 2, 3, 4] {
            let flipped = apply_orientation(two_pixels(), orientation);
            assert_eq!(flipped.dimensions(), (2, 1), "orientation {orientation}");
        }
    }

    #[test]
    fn test_orientation_fliph_mirrors_pixels() {
        let mirrored = apply_orientation(two_pixels(), 2).to_rgb8();
        assert_eq!(mirrored.get_pixel(0, 0), &Rgb([0, 0, 255]));
        assert_eq!(mirrored.get_pixel(1, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_copy_structural_drops_non_retained() {
        // PNG with a tEXt chunk between IHDR and IDAT.
        let mut bytes = png::SIGNATURE.to_vec();
        let chunk = |t: &[u8; 4], data: &[u8]| {
            let mut c = (data.len() as u32).to_be_bytes().to_vec();
            c.extend_from_slice(t);
            c.extend_from_slice(data);
            c.extend_from_slice(&[0; 4]);
            c
        };
        let ihdr = {
            let mut d = 1u32.to_be_bytes().to_vec();
            d.extend_from_slice(&1u32.to_be_bytes());
            d.extend_from_slice(&[8, 2, 0, 0, 0]);
            d
        };
        bytes.extend_from_slice(&chunk(b"IHDR", &ihdr));
        bytes.extend_from_slice(&chunk(b"tEXt", b"Author\0me"));
        bytes.extend_from_slice(&chunk(b"IDAT", &[0x01]));
        bytes.extend_from_slice(&chunk(b"IEND", &[]));

        let container = ImageContainer::parse(&bytes).unwrap();
        let cleaned = Sanitizer::sanitize(&container).unwrap();

        let recleaned = ImageContainer::parse(&cleaned).unwrap();
        assert!(recleaned.metadata_segments().next().is_none());
        assert_eq!(recleaned.segments.len(), 3);
        // Already-clean input passes through byte-identically.
        assert_eq!(Sanitizer::sanitize(&recleaned).unwrap(), cleaned);
    }
}
