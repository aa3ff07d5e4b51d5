//! EXIF metadata extraction: GPS position, capture time and caption.

use exif::{Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};

use crate::types::{GeoLocation, ImageSource};

/// Metadata pulled from one photo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoMetadata {
    /// GPS position; `None` means the photo cannot be placed on the map
    pub location: Option<GeoLocation>,
    /// Capture time as `YYYY-MM-DDTHH:MM:SS`
    pub captured_at: Option<String>,
    /// Embedded caption
    pub caption: Option<String>,
}

/// Extracts EXIF metadata from image sources.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extract metadata from a file on disk or from in-memory bytes.
    ///
    /// Lenient: unreadable or absent EXIF yields empty metadata, never an error.
    pub fn extract(source: &ImageSource) -> PhotoMetadata {
        let exif = match source {
            ImageSource::FilePath(path) => File::open(path)
                .ok()
                .and_then(|file| Self::read_exif(&mut BufReader::new(file))),
            ImageSource::InMemory(bytes) => Self::read_exif(&mut Cursor::new(bytes.as_slice())),
        };

        exif.map(|exif| Self::from_exif(&exif)).unwrap_or_default()
    }

    /// Parse EXIF out of any container kamadak-exif understands
    /// (JPEG, TIFF/DNG, HEIF, PNG, WebP).
    fn read_exif<R: BufRead + Seek>(reader: &mut R) -> Option<Exif> {
        match Reader::new().read_from_container(reader) {
            Ok(exif) => Some(exif),
            Err(e) => {
                tracing::debug!("No readable EXIF: {}", e);
                None
            }
        }
    }

    /// Build metadata from parsed EXIF.
    pub fn from_exif(exif: &Exif) -> PhotoMetadata {
        PhotoMetadata {
            location: Self::get_location(exif),
            captured_at: Self::get_datetime(exif),
            caption: Self::get_caption(exif),
        }
    }

    /// Both coordinates must be present and in range.
    fn get_location(exif: &Exif) -> Option<GeoLocation> {
        let latitude = Self::get_gps_coord(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef)?;
        let longitude = Self::get_gps_coord(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef)?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            tracing::debug!("GPS out of range: {}, {}", latitude, longitude);
            return None;
        }

        Some(GeoLocation {
            latitude,
            longitude,
        })
    }

    /// Get GPS coordinate, converting from degrees/minutes/seconds to decimal.
    fn get_gps_coord(exif: &Exif, coord_tag: Tag, ref_tag: Tag) -> Option<f64> {
        let coord = exif.get_field(coord_tag, In::PRIMARY)?;
        let reference = exif.get_field(ref_tag, In::PRIMARY)?;

        let degrees = parse_gps_rationals(&coord.value)?;
        let sign = match first_ascii(&reference.value)?.as_bytes().first() {
            Some(b'S' | b's' | b'W' | b'w') => -1.0,
            _ => 1.0,
        };

        Some(sign * degrees)
    }

    /// Get the capture datetime, preferring DateTimeOriginal over DateTime.
    fn get_datetime(exif: &Exif) -> Option<String> {
        let field = exif
            .get_field(Tag::DateTimeOriginal, In::PRIMARY)
            .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY))?;
        match &field.value {
            Value::Ascii(parts) => parts.first().and_then(|raw| format_exif_datetime(raw)),
            _ => None,
        }
    }

    /// Caption from ImageDescription, falling back to UserComment.
    fn get_caption(exif: &Exif) -> Option<String> {
        let description = exif
            .get_field(Tag::ImageDescription, In::PRIMARY)
            .and_then(|f| first_ascii(&f.value));
        if let Some(text) = description.and_then(non_blank) {
            return Some(text);
        }

        let comment = exif.get_field(Tag::UserComment, In::PRIMARY)?;
        match &comment.value {
            Value::Undefined(bytes, _) => {
                decode_user_comment(bytes, exif.little_endian()).and_then(non_blank)
            }
            Value::Ascii(_) => first_ascii(&comment.value).and_then(non_blank),
            _ => None,
        }
    }
}

/// Parse GPS rationals (degrees, minutes, seconds) to decimal degrees.
fn parse_gps_rationals(value: &Value) -> Option<f64> {
    let Value::Rational(rationals) = value else {
        return None;
    };
    let part = |idx: usize| rationals.get(idx).map(|r| r.to_f64()).unwrap_or(0.0);
    if rationals.is_empty() {
        return None;
    }

    let decimal = part(0) + part(1) / 60.0 + part(2) / 3600.0;
    decimal.is_finite().then_some(decimal)
}

fn first_ascii(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(parts) => parts
            .first()
            .map(|raw| String::from_utf8_lossy(raw).into_owned()),
        _ => None,
    }
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `YYYY:MM:DD HH:MM:SS` to `YYYY-MM-DDTHH:MM:SS`.
fn format_exif_datetime(raw: &[u8]) -> Option<String> {
    let dt = exif::DateTime::from_ascii(raw).ok()?;
    if dt.year == 0 || dt.month == 0 || dt.day == 0 {
        return None;
    }
    Some(format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        dt.year, dt.month, dt.day, dt.hour, dt.minute, dt.second
    ))
}

/// UserComment carries an 8-byte character code prefix.
fn decode_user_comment(bytes: &[u8], little_endian: bool) -> Option<String> {
    if bytes.len() < 8 {
        return None;
    }
    let (code, text) = bytes.split_at(8);
    match code {
        b"UNICODE\0" => {
            let units: Vec<u16> = text
                .chunks_exact(2)
                .map(|pair| {
                    if little_endian {
                        u16::from_le_bytes([pair[0], pair[1]])
                    } else {
                        u16::from_be_bytes([pair[0], pair[1]])
                    }
                })
                .collect();
            Some(String::from_utf16_lossy(&units))
        }
        // ASCII, undefined (all zero) and anything unrecognized
        _ => Some(String::from_utf8_lossy(text).into_owned()),
    }
}
