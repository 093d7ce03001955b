//! Metadata extraction into a human-readable report.
//!
//! EXIF/GPS/TIFF payloads go through the `exif` crate's fixed tag table;
//! each field decodes fallibly and is simply left out of the report when
//! missing or malformed. Extraction never fails as a whole.

use exif::{In, Tag, Value};

use crate::container::{jpeg, png, ImageContainer, ImageFormat, MetadataSubkind, SegmentKind};
use crate::types::{MetadataItem, MetadataReport};

/// Builds the before/after metadata reports for parsed containers.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Build the report for a parsed container.
    ///
    /// Item order matches the rendering order: basic image properties
    /// first, then the EXIF block, GPS, TIFF identification, and finally
    /// auxiliary carriers (textual chunks, ICC, XMP).
    pub fn extract(container: &ImageContainer) -> MetadataReport {
        let mut items = Vec::new();
        Self::push_geometry(container, &mut items);
        if let Some(exif) = Self::read_exif(container) {
            Self::push_exif_items(&exif, &mut items);
        }
        Self::push_auxiliary(container, &mut items);
        MetadataReport { items }
    }

    /// EXIF orientation value (1-8), if the container carries one.
    /// Consumed by the sanitizer to decide on the bake-in path.
    pub fn orientation(container: &ImageContainer) -> Option<u32> {
        let exif = Self::read_exif(container)?;
        Self::get_u32(&exif, Tag::Orientation)
    }

    /// Decode the first EXIF segment's TIFF payload, if present.
    fn read_exif(container: &ImageContainer) -> Option<exif::Exif> {
        let segment = container.find_metadata(MetadataSubkind::Exif)?;
        let payload = match container.format {
            ImageFormat::Jpeg => jpeg::exif_payload(segment)?.to_vec(),
            ImageFormat::Png => png::chunk_data(segment).to_vec(),
        };
        exif::Reader::new().read_raw(payload).ok()
    }

    /// Width/height and color model from the structural segments. These are
    /// properties of the pixel data itself, not sensitive metadata.
    fn push_geometry(container: &ImageContainer, items: &mut Vec<MetadataItem>) {
        match container.format {
            ImageFormat::Jpeg => {
                let geometry = container.segments.iter().find_map(jpeg::sof_geometry);
                if let Some((width, height, components)) = geometry {
                    items.push(MetadataItem::new(
                        "Bildgröße",
                        format!("{width} × {height} Pixel"),
                    ));
                    let model = match components {
                        1 => "Graustufen",
                        3 => "YCbCr",
                        4 => "CMYK",
                        _ => "Unbekannt",
                    };
                    items.push(MetadataItem::new("Farbmodell", model));
                }
            }
            ImageFormat::Png => {
                let geometry = container.segments.iter().find_map(png::ihdr_geometry);
                if let Some((width, height, _, color_type)) = geometry {
                    items.push(MetadataItem::new(
                        "Bildgröße",
                        format!("{width} × {height} Pixel"),
                    ));
                    items.push(MetadataItem::new(
                        "Farbmodell",
                        png::color_type_name(color_type),
                    ));
                }
            }
        }
    }

    /// Everything decoded from the TIFF/EXIF/GPS tag tables.
    fn push_exif_items(exif: &exif::Exif, items: &mut Vec<MetadataItem>) {
        if let Some(dpi) = Self::get_rational(exif, Tag::XResolution) {
            items.push(MetadataItem::new("DPI", format!("{dpi:.0}")));
        }

        if let Some(make) = Self::get_string(exif, Tag::LensMake) {
            items.push(MetadataItem::sensitive("Kamera", make));
        }
        if let Some(model) = Self::get_string(exif, Tag::LensModel) {
            items.push(MetadataItem::sensitive("Kameramodell", model));
        }
        if let Some(datetime) = Self::get_datetime(exif) {
            items.push(MetadataItem::sensitive("Aufnahmedatum", datetime));
        }
        if let Some(software) = Self::get_string(exif, Tag::Software) {
            items.push(MetadataItem::sensitive("Software", software));
        }

        let latitude = Self::get_gps_coord(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef);
        let longitude = Self::get_gps_coord(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef);
        if let (Some(lat), Some(lon)) = (latitude, longitude) {
            items.push(MetadataItem::sensitive(
                "GPS-Koordinaten",
                format!("{lat:.6}, {lon:.6}"),
            ));
        }
        if let Some(altitude) = Self::get_gps_altitude(exif) {
            items.push(MetadataItem::sensitive("GPS-Höhe", format!("{altitude:.1} m")));
        }

        if let Some(make) = Self::get_string(exif, Tag::Make) {
            items.push(MetadataItem::sensitive("Hersteller", make));
        }
        if let Some(model) = Self::get_string(exif, Tag::Model) {
            items.push(MetadataItem::sensitive("Modell", model));
        }

        // Embedded IFD1 thumbnail, reported by size.
        if let Some(size) = exif
            .get_field(Tag::JPEGInterchangeFormatLength, In::THUMBNAIL)
            .and_then(|f| match &f.value {
                Value::Long(v) => v.first().copied(),
                Value::Short(v) => v.first().map(|&x| x as u32),
                _ => None,
            })
        {
            items.push(MetadataItem::new("Vorschaubild", format!("{size} Bytes")));
        }
    }

    /// Auxiliary carriers reported by content or presence.
    fn push_auxiliary(container: &ImageContainer, items: &mut Vec<MetadataItem>) {
        for (subkind, segment) in container.metadata_segments() {
            match subkind {
                MetadataSubkind::TextualComment => match container.format {
                    ImageFormat::Png => {
                        if let Some((keyword, value)) = png::text_keyword_value(segment) {
                            items.push(MetadataItem::new(keyword, value));
                        } else if let Some(chunk_type) = png::chunk_type(segment) {
                            let name: String =
                                chunk_type.iter().map(|&b| b as char).collect();
                            items.push(MetadataItem::new(
                                name,
                                format!("{} Bytes", png::chunk_data(segment).len()),
                            ));
                        }
                    }
                    ImageFormat::Jpeg => {
                        if let Some(payload) = jpeg::comment_payload(segment) {
                            let text: String = payload
                                .iter()
                                .map(|&b| b as char)
                                .collect::<String>()
                                .trim_end_matches('\0')
                                .to_string();
                            items.push(MetadataItem::new("Kommentar", text));
                        }
                    }
                },
                MetadataSubkind::IccProfile => {
                    items.push(MetadataItem::new(
                        "ICC-Profil",
                        format!("{} Bytes", Self::payload_len(container, segment)),
                    ));
                }
                MetadataSubkind::Xmp => {
                    items.push(MetadataItem::new(
                        "XMP-Daten",
                        format!("{} Bytes", Self::payload_len(container, segment)),
                    ));
                }
                _ => {}
            }
        }
    }

    fn payload_len(container: &ImageContainer, segment: &crate::container::Segment) -> usize {
        match container.format {
            // Marker and length bytes are framing, not payload.
            ImageFormat::Jpeg => segment.bytes.len().saturating_sub(4),
            ImageFormat::Png => png::chunk_data(segment).len(),
        }
    }

    /// Get a string field, stripping the quotes the Display impl adds.
    fn get_string(exif: &exif::Exif, tag: Tag) -> Option<String> {
        exif.get_field(tag, In::PRIMARY).map(|f| {
            f.display_value()
                .to_string()
                .trim_matches('"')
                .to_string()
        })
    }

    /// Get a u32 field.
    fn get_u32(exif: &exif::Exif, tag: Tag) -> Option<u32> {
        exif.get_field(tag, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Short(v) => v.first().map(|&x| x as u32),
                Value::Long(v) => v.first().copied(),
                _ => None,
            })
    }

    /// Get the first rational of a field as f64.
    fn get_rational(exif: &exif::Exif, tag: Tag) -> Option<f64> {
        exif.get_field(tag, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Rational(v) => v.first().map(|r| r.to_f64()),
                _ => None,
            })
    }

    /// Capture datetime, preferring DateTimeOriginal over DateTime.
    fn get_datetime(exif: &exif::Exif) -> Option<String> {
        exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)
            .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY))
            .map(|f| {
                f.display_value()
                    .to_string()
                    .trim_matches('"')
                    .to_string()
            })
    }

    /// GPS coordinate: rational degrees/minutes/seconds triple plus the
    /// hemisphere reference, converted to signed decimal degrees.
    fn get_gps_coord(exif: &exif::Exif, coord_tag: Tag, ref_tag: Tag) -> Option<f64> {
        let coord = exif.get_field(coord_tag, In::PRIMARY)?;
        let reference = exif.get_field(ref_tag, In::PRIMARY)?;

        let degrees = Self::dms_to_decimal(&coord.value)?;
        let ref_str = reference.display_value().to_string();

        let sign = if ref_str.contains('S') || ref_str.contains('W') {
            -1.0
        } else {
            1.0
        };
        Some(sign * degrees)
    }

    fn dms_to_decimal(value: &Value) -> Option<f64> {
        match value {
            Value::Rational(rationals) if rationals.len() >= 3 => {
                let degrees = rationals[0].to_f64();
                let minutes = rationals[1].to_f64();
                let seconds = rationals[2].to_f64();
                Some(degrees + minutes / 60.0 + seconds / 3600.0)
            }
            _ => None,
        }
    }

    /// Altitude in meters, negated when the reference says below sea level.
    fn get_gps_altitude(exif: &exif::Exif) -> Option<f64> {
        let altitude = Self::get_rational(exif, Tag::GPSAltitude)?;
        let below_sea_level = exif
            .get_field(Tag::GPSAltitudeRef, In::PRIMARY)
            .map(|f| matches!(&f.value, Value::Byte(v) if v.first() == Some(&1)))
            .unwrap_or(false);
        Some(if below_sea_level { -altitude } else { altitude })
    }
}
