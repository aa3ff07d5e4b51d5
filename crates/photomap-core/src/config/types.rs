//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the raw photos
    pub input_dir: PathBuf,

    /// Directory receiving the derivative JPEGs
    pub output_dir: PathBuf,

    /// Manifest file written at the end of each run
    pub manifest: PathBuf,

    /// URL prefix under which `output_dir` is served; prepended to derivative names
    pub url_prefix: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("photos"),
            output_dir: PathBuf::from("public/photos"),
            manifest: PathBuf::from("public/data.json"),
            url_prefix: "/photos".to_string(),
        }
    }
}

/// Directory scanning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Accepted input extensions (matched case-insensitively)
    pub supported_formats: Vec<String>,

    /// Extensions whose decoders drop embedded metadata; these are transcoded
    /// for rendering and read in their original form for metadata
    pub transcode_formats: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
                "heic".to_string(),
                "dng".to_string(),
            ],
            transcode_formats: vec!["heic".to_string()],
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 200,
        }
    }
}

/// External converter used for the lossy-metadata format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    /// Converter executable
    pub program: String,

    /// Argument template; `{input}`, `{output}` and `{quality}` are substituted
    pub args: Vec<String>,

    /// JPEG quality requested from the converter (1-100)
    pub quality: u8,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            program: "heif-convert".to_string(),
            args: vec![
                "-q".to_string(),
                "{quality}".to_string(),
                "{input}".to_string(),
                "{output}".to_string(),
            ],
            quality: 100,
        }
    }
}

/// Square thumbnail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Edge length in pixels; thumbnails are always exactly this square
    pub size: u32,

    /// JPEG quality (1-100)
    pub quality: u8,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            size: 300,
            quality: 80,
        }
    }
}

/// Bounded large-image settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LargeConfig {
    /// Bounding box edge in pixels; sources already inside it are never upscaled
    pub max_dimension: u32,

    /// JPEG quality (1-100)
    pub quality: u8,
}

impl Default for LargeConfig {
    fn default() -> Self {
        Self {
            max_dimension: 1600,
            quality: 85,
        }
    }
}

/// Manifest output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print the manifest
    pub pretty: bool,

    /// Sort records by id instead of keeping scan order
    pub sort_by_id: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            sort_by_id: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
