//! Image decoding with content-based format detection.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::error::PipelineError;
use crate::types::ImageSource;

/// Decodes normalized image sources into pixels.
pub struct ImageDecoder;

/// Result of decoding an image.
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageDecoder {
    /// Decode a source on the blocking thread pool.
    ///
    /// `path` identifies the input file in errors; for transcoded inputs it is
    /// the original file, not the in-memory JPEG.
    pub async fn decode(
        source: ImageSource,
        path: &Path,
    ) -> Result<DecodedImage, PipelineError> {
        let bytes = source
            .into_bytes()
            .await
            .map_err(|source| PipelineError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let path_owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::decode_bytes_sync(bytes, &path_owned))
            .await
            .map_err(|e| PipelineError::Render {
                path: path.to_path_buf(),
                message: format!("Task join error: {}", e),
            })?
    }

    /// Synchronous decode from bytes (runs in spawn_blocking).
    pub fn decode_bytes_sync(bytes: Vec<u8>, path: &Path) -> Result<DecodedImage, PipelineError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Render {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = match reader.format() {
            Some(f) => f,
            None => ImageFormat::from_path(path).map_err(|_| PipelineError::Render {
                path: path.to_path_buf(),
                message: "Cannot detect image format".to_string(),
            })?,
        };
        let image = image::load(reader.into_inner(), format).map_err(|e| PipelineError::Render {
            path: path.to_path_buf(),
            message: format!("Decode error: {}", e),
        })?;

        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            image,
            format,
            width,
            height,
        })
    }
}
