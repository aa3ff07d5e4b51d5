//! Fixture builders shared by the integration tests.
//!
//! Photos are generated in code: a gradient image encoded as JPEG or PNG,
//! optionally carrying an EXIF block built with kamadak-exif's writer.

#![allow(dead_code)]

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbImage};
use photomap_core::{Config, Transcoder};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// EXIF content for a fixture.
#[derive(Default, Clone)]
pub struct ExifTags {
    pub gps: Option<(f64, f64)>,
    pub date: Option<&'static str>,
    pub caption: Option<&'static str>,
}

impl ExifTags {
    pub fn gps(lat: f64, lng: f64) -> Self {
        Self {
            gps: Some((lat, lng)),
            ..Self::default()
        }
    }
}

/// Directory layout mirroring a project checkout.
pub struct Workspace {
    pub root: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("photos")).unwrap();
        Self { root }
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root.path().join("photos")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.path().join("public").join("photos")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.path().join("public").join("data.json")
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.paths.input_dir = self.input_dir();
        config.paths.output_dir = self.output_dir();
        config.paths.manifest = self.manifest_path();
        config
    }

    pub fn add(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.input_dir().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    pub fn derivative(&self, name: &str) -> PathBuf {
        self.output_dir().join(name)
    }

    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = match std::fs::read_dir(self.output_dir()) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    pub fn manifest(&self) -> Vec<photomap_core::PhotoRecord> {
        let json = std::fs::read_to_string(self.manifest_path()).unwrap();
        serde_json::from_str(&json).unwrap()
    }
}

/// Deterministic gradient so resized output is not trivially uniform.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    gradient(width, height)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

pub fn plain_jpeg(width: u32, height: u32) -> Vec<u8> {
    let rgb = gradient(width, height).to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, 90)
        .encode_image(&rgb)
        .unwrap();
    buffer
}

/// JPEG with an APP1 EXIF segment right after SOI.
pub fn jpeg(width: u32, height: u32, tags: &ExifTags) -> Vec<u8> {
    insert_exif(&plain_jpeg(width, height), &exif_tiff(tags))
}

pub fn insert_exif(jpeg: &[u8], tiff: &[u8]) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFFu8, 0xD8]);
    let length = u16::try_from(2 + 6 + tiff.len()).unwrap();

    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// TIFF-structured EXIF payload for `tags`.
pub fn exif_tiff(tags: &ExifTags) -> Vec<u8> {
    let mut fields = vec![Field {
        tag: Tag::Orientation,
        ifd_num: In::PRIMARY,
        value: Value::Short(vec![1]),
    }];

    if let Some((lat, lng)) = tags.gps {
        let lat_ref: &[u8] = if lat < 0.0 { b"S" } else { b"N" };
        let lng_ref: &[u8] = if lng < 0.0 { b"W" } else { b"E" };
        fields.push(ascii_field(Tag::GPSLatitudeRef, lat_ref));
        fields.push(Field {
            tag: Tag::GPSLatitude,
            ifd_num: In::PRIMARY,
            value: dms(lat),
        });
        fields.push(ascii_field(Tag::GPSLongitudeRef, lng_ref));
        fields.push(Field {
            tag: Tag::GPSLongitude,
            ifd_num: In::PRIMARY,
            value: dms(lng),
        });
    }
    if let Some(date) = tags.date {
        fields.push(ascii_field(Tag::DateTimeOriginal, date.as_bytes()));
    }
    if let Some(caption) = tags.caption {
        fields.push(ascii_field(Tag::ImageDescription, caption.as_bytes()));
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buffer = Cursor::new(Vec::new());
    writer.write(&mut buffer, false).unwrap();
    buffer.into_inner()
}

fn ascii_field(tag: Tag, text: &[u8]) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.to_vec()]),
    }
}

/// Decimal degrees to an EXIF degrees/minutes/seconds triple.
fn dms(value: f64) -> Value {
    let value = value.abs();
    let degrees = value.trunc();
    let minutes = ((value - degrees) * 60.0).trunc();
    let seconds = (value - degrees - minutes / 60.0) * 3600.0;
    Value::Rational(vec![
        Rational::from((degrees as u32, 1)),
        Rational::from((minutes as u32, 1)),
        Rational::from(((seconds * 10_000.0).round() as u32, 10_000)),
    ])
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected {expected}, got {actual}"
    );
}

pub fn dimensions(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}

/// Re-encodes the raw bytes as a bare JPEG, dropping any EXIF, the way real
/// HEIC converters do.
#[derive(Default)]
pub struct StripTranscoder {
    pub qualities: Mutex<Vec<u8>>,
}

impl Transcoder for StripTranscoder {
    fn transcode(&self, raw: &[u8], quality: u8) -> std::io::Result<Vec<u8>> {
        self.qualities.lock().unwrap().push(quality);
        let decoded = image::load_from_memory(raw).map_err(std::io::Error::other)?;
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, quality)
            .encode_image(&decoded.to_rgb8())
            .map_err(std::io::Error::other)?;
        Ok(buffer)
    }
}

/// Emits a JPEG carrying different GPS coordinates than the original.
pub struct DecoyTranscoder {
    pub decoy: (f64, f64),
}

impl Transcoder for DecoyTranscoder {
    fn transcode(&self, raw: &[u8], _quality: u8) -> std::io::Result<Vec<u8>> {
        let decoded = image::load_from_memory(raw).map_err(std::io::Error::other)?;
        let (w, h) = (decoded.width(), decoded.height());
        Ok(jpeg(w, h, &ExifTags::gps(self.decoy.0, self.decoy.1)))
    }
}

/// Always fails, like a converter that cannot parse the input.
pub struct FailingTranscoder;

impl Transcoder for FailingTranscoder {
    fn transcode(&self, _raw: &[u8], _quality: u8) -> std::io::Result<Vec<u8>> {
        Err(std::io::Error::other("unsupported HEIC brand"))
    }
}
