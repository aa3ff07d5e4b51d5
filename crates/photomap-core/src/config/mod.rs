//! Configuration management for PhotoMap.
//!
//! Configuration is read from `photomap.toml` in the working directory when
//! present. Every section falls back to its defaults, so an absent file means
//! the conventional layout: `photos/` in, `public/photos/` and
//! `public/data.json` out.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "photomap.toml";

/// Root configuration structure for PhotoMap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input/output locations
    pub paths: PathsConfig,

    /// Directory scanning settings
    pub scan: ScanConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Lossy-metadata format converter
    pub transcode: TranscodeConfig,

    /// Thumbnail derivative settings
    pub thumbnail: ThumbnailConfig,

    /// Large derivative settings
    pub large: LargeConfig,

    /// Manifest output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path (relative to the working directory).
    pub fn default_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE_NAME)
    }

    /// Resolved input directory (with ~ expansion).
    pub fn input_dir(&self) -> PathBuf {
        expand(&self.paths.input_dir)
    }

    /// Resolved output directory (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        expand(&self.paths.output_dir)
    }

    /// Resolved manifest path (with ~ expansion).
    pub fn manifest_path(&self) -> PathBuf {
        expand(&self.paths.manifest)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.paths.input_dir, PathBuf::from("photos"));
        assert_eq!(config.paths.output_dir, PathBuf::from("public/photos"));
        assert_eq!(config.paths.manifest, PathBuf::from("public/data.json"));
        assert_eq!(config.thumbnail.size, 300);
        assert_eq!(config.thumbnail.quality, 80);
        assert_eq!(config.large.max_dimension, 1600);
        assert_eq!(config.large.quality, 85);
        assert_eq!(config.transcode.quality, 100);
    }

    #[test]
    fn test_default_supported_formats() {
        let formats = ScanConfig::default().supported_formats;
        for ext in ["jpg", "jpeg", "png", "webp", "heic", "dng"] {
            assert!(formats.iter().any(|f| f == ext), "missing {ext}");
        }
        assert_eq!(formats.len(), 6);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("[thumbnail]"));
        assert!(toml.contains("[large]"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [paths]
            input_dir = "raw"

            [large]
            quality = 90
            "#,
        )
        .unwrap();
        assert_eq!(config.paths.input_dir, PathBuf::from("raw"));
        assert_eq!(config.paths.output_dir, PathBuf::from("public/photos"));
        assert_eq!(config.large.quality, 90);
        assert_eq!(config.large.max_dimension, 1600);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[output]\nsort_by_id = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.output.sort_by_id);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_tilde_expansion() {
        let mut config = Config::default();
        config.paths.input_dir = PathBuf::from("~/pictures");
        assert!(config.input_dir().ends_with("pictures"));
        assert_eq!(config.output_dir(), PathBuf::from("public/photos"));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = Config::from_toml("[thumbnail\nsize = 1").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
