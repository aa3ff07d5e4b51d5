//! Core data types for the PhotoMap ingestion pipeline.
//!
//! [`PhotoRecord`] is the manifest schema read by the map front-end; the
//! remaining types describe how a single input file moves through the
//! pipeline and how its processing ended.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// One manifest entry: a geolocated photo with its rendered derivatives.
///
/// Field names are part of the front-end contract and must stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Input file name without its extension
    pub id: String,

    /// Latitude in decimal degrees (south is negative)
    pub lat: f64,

    /// Longitude in decimal degrees (west is negative)
    pub lng: f64,

    /// Web path of the square thumbnail
    pub thumb: String,

    /// Web path of the bounded large image
    pub large: String,

    /// Input file name exactly as found on disk
    pub original_name: String,

    /// Capture time as `YYYY-MM-DDTHH:MM:SS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Caption embedded in the photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Where a pipeline stage should read its bytes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Read lazily from disk
    FilePath(PathBuf),
    /// Already held in memory (transcoded output or retained original bytes)
    InMemory(Vec<u8>),
}

impl ImageSource {
    /// Take the full contents of the source, reading from disk if needed.
    pub async fn into_bytes(self) -> std::io::Result<Vec<u8>> {
        match self {
            Self::FilePath(path) => tokio::fs::read(path).await,
            Self::InMemory(bytes) => Ok(bytes),
        }
    }

    /// Backing path, if this source lives on disk.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::FilePath(path) => Some(path),
            Self::InMemory(_) => None,
        }
    }
}

/// Why a file was deliberately passed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Extension is not on the allow-list
    UnsupportedFormat { extension: String },
    /// No usable GPS coordinates in the metadata
    NoGeolocation,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat { extension } if extension.is_empty() => {
                write!(f, "unsupported format (no extension)")
            }
            Self::UnsupportedFormat { extension } => {
                write!(f, "unsupported format .{}", extension)
            }
            Self::NoGeolocation => write!(f, "no GPS data"),
        }
    }
}

/// Final state of one input file.
#[derive(Debug)]
pub enum ItemOutcome {
    /// Derivatives written; the record belongs in the manifest
    Processed(PhotoRecord),
    /// Intentionally not processed
    Skipped {
        file_name: String,
        reason: SkipReason,
    },
    /// A stage failed for this file
    Failed {
        file_name: String,
        error: PipelineError,
    },
}

impl ItemOutcome {
    /// Name of the input file this outcome describes.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Processed(record) => &record.original_name,
            Self::Skipped { file_name, .. } | Self::Failed { file_name, .. } => file_name,
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed(_))
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files whose derivatives were written
    pub processed: usize,
    /// Files passed over (unsupported format, no GPS)
    pub skipped: usize,
    /// Files that hit a per-file error
    pub failed: usize,
    /// Records in the written manifest (differs from `processed` on id collisions)
    pub records: usize,
    /// Where the manifest was written
    pub manifest_path: PathBuf,
}

impl RunSummary {
    /// Total number of candidate files seen.
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PhotoRecord {
        PhotoRecord {
            id: "beach".into(),
            lat: 34.01,
            lng: -118.49,
            thumb: "/photos/beach_thumb.jpg".into(),
            large: "/photos/beach_large.jpg".into(),
            original_name: "beach.jpg".into(),
            date: None,
            caption: None,
        }
    }

    #[test]
    fn test_record_serializes_front_end_schema() {
        let value = serde_json::to_value(sample_record()).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["id", "large", "lat", "lng", "originalName", "thumb"]
        );
        assert_eq!(obj["originalName"], "beach.jpg");
        assert_eq!(obj["lng"], -118.49);
    }

    #[test]
    fn test_record_optional_fields_when_present() {
        let mut record = sample_record();
        record.date = Some("2024-07-04T18:30:00".into());
        record.caption = Some("Sunset".into());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"date\":\"2024-07-04T18:30:00\""));
        assert!(json.contains("\"caption\":\"Sunset\""));

        let back: PhotoRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::UnsupportedFormat {
            extension: "txt".into(),
        };
        assert_eq!(reason.to_string(), "unsupported format .txt");
        assert_eq!(SkipReason::NoGeolocation.to_string(), "no GPS data");
    }

    #[test]
    fn test_outcome_file_name() {
        let processed = ItemOutcome::Processed(sample_record());
        assert_eq!(processed.file_name(), "beach.jpg");
        assert!(processed.is_processed());

        let skipped = ItemOutcome::Skipped {
            file_name: "selfie.png".into(),
            reason: SkipReason::NoGeolocation,
        };
        assert_eq!(skipped.file_name(), "selfie.png");
        assert!(!skipped.is_processed());
    }

    #[tokio::test]
    async fn test_image_source_into_bytes() {
        let source = ImageSource::InMemory(vec![1, 2, 3]);
        assert!(source.path().is_none());
        assert_eq!(source.into_bytes().await.unwrap(), vec![1, 2, 3]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        std::fs::write(&path, b"abc").unwrap();
        let source = ImageSource::FilePath(path.clone());
        assert_eq!(source.path(), Some(path.as_path()));
        assert_eq!(source.into_bytes().await.unwrap(), b"abc");
    }
}
