//! Derivative rendering: a square cover-fit thumbnail and a bounded large
//! image, both JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::path::{Path, PathBuf};

use crate::config::{LargeConfig, ThumbnailConfig};
use crate::error::PipelineError;

/// File names of the derivatives written for one photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDerivatives {
    pub thumb_name: String,
    pub large_name: String,
}

impl RenderedDerivatives {
    /// Derivative names for a photo id.
    pub fn for_id(id: &str) -> Self {
        Self {
            thumb_name: format!("{id}_thumb.jpg"),
            large_name: format!("{id}_large.jpg"),
        }
    }
}

/// Writes derivative images into the output directory.
pub struct Renderer {
    thumbnail: ThumbnailConfig,
    large: LargeConfig,
    output_dir: PathBuf,
}

impl Renderer {
    pub fn new(thumbnail: ThumbnailConfig, large: LargeConfig, output_dir: PathBuf) -> Self {
        Self {
            thumbnail,
            large,
            output_dir,
        }
    }

    /// Render and write both derivatives for `id`, overwriting existing files.
    ///
    /// Runs on the blocking thread pool. `source_path` is only used for errors.
    pub async fn render(
        &self,
        image: DynamicImage,
        id: &str,
        source_path: &Path,
    ) -> Result<RenderedDerivatives, PipelineError> {
        let names = RenderedDerivatives::for_id(id);
        let thumb_path = self.output_dir.join(&names.thumb_name);
        let large_path = self.output_dir.join(&names.large_name);
        let thumbnail = self.thumbnail.clone();
        let large = self.large.clone();
        let path = source_path.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let thumb_bytes =
                render_thumbnail(&image, &thumbnail).map_err(|e| render_err(&path, e))?;
            std::fs::write(&thumb_path, thumb_bytes)
                .map_err(|e| render_err(&path, format!("{}: {}", thumb_path.display(), e)))?;

            let large_bytes = render_large(&image, &large).map_err(|e| render_err(&path, e))?;
            std::fs::write(&large_path, large_bytes)
                .map_err(|e| render_err(&path, format!("{}: {}", large_path.display(), e)))?;
            Ok::<(), PipelineError>(())
        })
        .await
        .map_err(|e| render_err(source_path, format!("Task join error: {}", e)))??;

        Ok(names)
    }
}

/// Exactly `size`×`size`: scale to cover, then center-crop.
pub fn render_thumbnail(
    image: &DynamicImage,
    config: &ThumbnailConfig,
) -> Result<Vec<u8>, image::ImageError> {
    let thumb = image.resize_to_fill(config.size, config.size, FilterType::Lanczos3);
    encode_jpeg(&thumb, config.quality)
}

/// Fit inside `max_dimension`² keeping aspect ratio; never upscales.
pub fn render_large(
    image: &DynamicImage,
    config: &LargeConfig,
) -> Result<Vec<u8>, image::ImageError> {
    let (width, height) = image.dimensions();
    let bound = config.max_dimension;
    if width <= bound && height <= bound {
        return encode_jpeg(image, config.quality);
    }
    let resized = image.resize(bound, bound, FilterType::Lanczos3);
    encode_jpeg(&resized, config.quality)
}

/// Encode as baseline JPEG; alpha and high bit depths are flattened to RGB8.
fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let rgb = image.to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality).encode_image(&rgb)?;
    Ok(buffer)
}

fn render_err(path: &Path, message: impl ToString) -> PipelineError {
    PipelineError::Render {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}
