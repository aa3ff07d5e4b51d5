//! Input validation before processing.

use std::io::Read;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Validates files before processing.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Perform quick validation before reading the whole file.
    ///
    /// Checks:
    /// - File is readable
    /// - File size is within limits
    /// - File has valid image magic bytes
    pub fn validate(&self, path: &Path) -> Result<(), PipelineError> {
        let metadata = std::fs::metadata(path).map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        self.check_magic_bytes(path)
    }

    /// Check file magic bytes to verify it's a valid image format.
    fn check_magic_bytes(&self, path: &Path) -> Result<(), PipelineError> {
        let mut file = std::fs::File::open(path).map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut header = [0u8; 12];
        let bytes_read = file
            .read(&mut header)
            .map_err(|source| PipelineError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        if bytes_read < 4 {
            return Err(PipelineError::InvalidImage {
                path: path.to_path_buf(),
                message: "File too small to be a valid image".to_string(),
            });
        }

        if !Self::is_valid_image_header(&header, bytes_read) {
            return Err(PipelineError::InvalidImage {
                path: path.to_path_buf(),
                message: "Unrecognized image format (invalid magic bytes)".to_string(),
            });
        }

        Ok(())
    }

    /// Check if the header bytes match a supported container.
    fn is_valid_image_header(header: &[u8; 12], bytes_read: usize) -> bool {
        if bytes_read < 4 {
            return false;
        }

        // JPEG: FF D8 FF
        if header[..3] == [0xFF, 0xD8, 0xFF] {
            return true;
        }

        // PNG: 89 50 4E 47
        if header[..4] == [0x89, b'P', b'N', b'G'] {
            return true;
        }

        // WebP: RIFF....WEBP
        if &header[..4] == b"RIFF" {
            return bytes_read < 12 || &header[8..12] == b"WEBP";
        }

        // TIFF / DNG: II*\0 or MM\0*
        if header[..4] == [b'I', b'I', 0x2A, 0x00] || header[..4] == [b'M', b'M', 0x00, 0x2A] {
            return true;
        }

        // HEIC/HEIF: ftyp box at offset 4
        bytes_read >= 12 && &header[4..8] == b"ftyp"
    }
}
