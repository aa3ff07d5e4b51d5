//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "scan.supported_formats must not be empty".into(),
            ));
        }
        if let Some(format) = self.scan.transcode_formats.iter().find(|t| {
            !self
                .scan
                .supported_formats
                .iter()
                .any(|s| s.eq_ignore_ascii_case(t))
        }) {
            return Err(ConfigError::ValidationError(format!(
                "scan.transcode_formats entry {format:?} is not in scan.supported_formats"
            )));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.transcode.program.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "transcode.program must not be empty".into(),
            ));
        }
        check_quality("transcode.quality", self.transcode.quality)?;
        if self.thumbnail.size == 0 {
            return Err(ConfigError::ValidationError(
                "thumbnail.size must be > 0".into(),
            ));
        }
        check_quality("thumbnail.quality", self.thumbnail.quality)?;
        if self.large.max_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "large.max_dimension must be > 0".into(),
            ));
        }
        check_quality("large.quality", self.large.quality)?;
        Ok(())
    }
}

fn check_quality(name: &str, quality: u8) -> Result<(), ConfigError> {
    if quality == 0 || quality > 100 {
        return Err(ConfigError::ValidationError(format!(
            "{name} must be between 1 and 100"
        )));
    }
    Ok(())
}
