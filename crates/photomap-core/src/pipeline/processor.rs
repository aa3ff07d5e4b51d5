//! Per-file orchestration - wires the stages together for one input.

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{PhotoMapError, PipelineError};
use crate::types::{ItemOutcome, PhotoRecord, SkipReason};

use super::decode::ImageDecoder;
use super::discovery::{DiscoveredFile, FileDiscovery};
use super::metadata::MetadataExtractor;
use super::normalize::{CommandTranscoder, FormatNormalizer, Transcoder};
use super::render::Renderer;
use super::validate::Validator;

/// Runs a single file through validate → normalize → extract → decode → render.
pub struct ImageProcessor {
    discovery: FileDiscovery,
    validator: Validator,
    normalizer: FormatNormalizer,
    renderer: Renderer,
    url_prefix: String,
}

impl ImageProcessor {
    /// Create a processor using the configured external transcoder.
    pub fn new(config: &Config) -> Self {
        let transcoder = Arc::new(CommandTranscoder::new(&config.transcode));
        Self::with_transcoder(config, transcoder)
    }

    /// Create a processor with a caller-supplied transcoder.
    pub fn with_transcoder(config: &Config, transcoder: Arc<dyn Transcoder>) -> Self {
        Self {
            discovery: FileDiscovery::new(config.scan.clone()),
            validator: Validator::new(config.limits.clone()),
            normalizer: FormatNormalizer::new(transcoder, config.transcode.quality),
            renderer: Renderer::new(
                config.thumbnail.clone(),
                config.large.clone(),
                config.output_dir(),
            ),
            url_prefix: config.paths.url_prefix.clone(),
        }
    }

    /// List candidate files in the input directory.
    pub fn discover(&self, dir: &Path) -> Result<Vec<DiscoveredFile>, PhotoMapError> {
        self.discovery.discover(dir)
    }

    /// Process one file end to end. Never fails: every problem is captured
    /// in the returned outcome.
    pub async fn process_file(&self, file: &DiscoveredFile) -> ItemOutcome {
        if !file.supported {
            return ItemOutcome::Skipped {
                file_name: file.file_name.clone(),
                reason: SkipReason::UnsupportedFormat {
                    extension: file.extension.clone(),
                },
            };
        }

        match self.process_supported(file).await {
            Ok(Some(record)) => ItemOutcome::Processed(record),
            Ok(None) => ItemOutcome::Skipped {
                file_name: file.file_name.clone(),
                reason: SkipReason::NoGeolocation,
            },
            Err(error) => ItemOutcome::Failed {
                file_name: file.file_name.clone(),
                error,
            },
        }
    }

    /// `Ok(None)` when the photo carries no usable GPS position; nothing is
    /// written in that case.
    async fn process_supported(
        &self,
        file: &DiscoveredFile,
    ) -> Result<Option<PhotoRecord>, PipelineError> {
        let start = std::time::Instant::now();
        tracing::debug!("Processing: {:?}", file.path);

        self.validator.validate(&file.path)?;

        let transcode = self.discovery.needs_transcode(&file.extension);
        let input = self.normalizer.normalize(file, transcode).await?;

        let metadata_start = std::time::Instant::now();
        let metadata = MetadataExtractor::extract(&input.metadata);
        tracing::trace!("  Metadata: {:?}", metadata_start.elapsed());

        let Some(location) = metadata.location else {
            return Ok(None);
        };

        let decode_start = std::time::Instant::now();
        let decoded = ImageDecoder::decode(input.image, &file.path).await?;
        tracing::trace!(
            "  Decode: {:?} ({}x{})",
            decode_start.elapsed(),
            decoded.width,
            decoded.height
        );

        let render_start = std::time::Instant::now();
        let id = file.id();
        let names = self.renderer.render(decoded.image, id, &file.path).await?;
        tracing::trace!("  Render: {:?}", render_start.elapsed());

        tracing::debug!("Processed {:?} in {:?}", file.file_name, start.elapsed());

        Ok(Some(PhotoRecord {
            id: id.to_string(),
            lat: location.latitude,
            lng: location.longitude,
            thumb: self.public_url(&names.thumb_name),
            large: self.public_url(&names.large_name),
            original_name: file.file_name.clone(),
            date: metadata.captured_at,
            caption: metadata.caption,
        }))
    }

    /// Web path for a derivative file name.
    fn public_url(&self, name: &str) -> String {
        let prefix = self.url_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str, extension: &str, supported: bool) -> DiscoveredFile {
        DiscoveredFile {
            path: PathBuf::from("/nonexistent").join(name),
            file_name: name.into(),
            extension: extension.into(),
            supported,
        }
    }

    #[test]
    fn test_public_url() {
        let mut config = Config::default();
        let processor = ImageProcessor::new(&config);
        assert_eq!(processor.public_url("a_thumb.jpg"), "/photos/a_thumb.jpg");

        config.paths.url_prefix = "https://cdn.example.com/p/".into();
        let processor = ImageProcessor::new(&config);
        assert_eq!(
            processor.public_url("a_thumb.jpg"),
            "https://cdn.example.com/p/a_thumb.jpg"
        );

        config.paths.url_prefix = String::new();
        let processor = ImageProcessor::new(&config);
        assert_eq!(processor.public_url("a_thumb.jpg"), "a_thumb.jpg");
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_skipped() {
        let processor = ImageProcessor::new(&Config::default());
        let outcome = processor
            .process_file(&file("notes.txt", "txt", false))
            .await;
        assert!(matches!(
            outcome,
            ItemOutcome::Skipped {
                reason: SkipReason::UnsupportedFormat { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unreadable_file_is_failed_outcome() {
        let processor = ImageProcessor::new(&Config::default());
        let outcome = processor.process_file(&file("gone.jpg", "jpg", true)).await;
        match outcome {
            ItemOutcome::Failed { file_name, error } => {
                assert_eq!(file_name, "gone.jpg");
                assert!(matches!(error, PipelineError::Read { .. }));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
