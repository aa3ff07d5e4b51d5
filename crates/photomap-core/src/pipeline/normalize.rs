//! Format normalization.
//!
//! Most inputs are decoded straight from disk. Formats whose decoders strip
//! embedded metadata (HEIC) are transcoded to JPEG for rendering, while the
//! untouched original bytes are kept for metadata extraction.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use crate::config::TranscodeConfig;
use crate::error::PipelineError;
use crate::types::ImageSource;

use super::discovery::DiscoveredFile;

/// Converts raw bytes of a lossy-metadata format into a decodable JPEG.
///
/// Implementations are blocking; the normalizer runs them on the blocking
/// thread pool.
pub trait Transcoder: Send + Sync {
    /// Transcode `raw` to JPEG bytes at the given quality (1-100).
    fn transcode(&self, raw: &[u8], quality: u8) -> std::io::Result<Vec<u8>>;
}

/// Byte sources for the later stages of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    /// What the renderer decodes
    pub image: ImageSource,
    /// What the metadata extractor reads
    pub metadata: ImageSource,
}

/// Chooses byte sources per file and transcodes where required.
pub struct FormatNormalizer {
    transcoder: Arc<dyn Transcoder>,
    quality: u8,
}

impl FormatNormalizer {
    pub fn new(transcoder: Arc<dyn Transcoder>, quality: u8) -> Self {
        Self {
            transcoder,
            quality,
        }
    }

    /// Produce the render and metadata sources for a file.
    ///
    /// With `transcode == false` both point at the file on disk.
    pub async fn normalize(
        &self,
        file: &DiscoveredFile,
        transcode: bool,
    ) -> Result<NormalizedInput, PipelineError> {
        if !transcode {
            return Ok(NormalizedInput {
                image: ImageSource::FilePath(file.path.clone()),
                metadata: ImageSource::FilePath(file.path.clone()),
            });
        }

        let raw = tokio::fs::read(&file.path)
            .await
            .map_err(|source| PipelineError::Read {
                path: file.path.clone(),
                source,
            })?;

        let start = std::time::Instant::now();
        let transcoder = Arc::clone(&self.transcoder);
        let quality = self.quality;
        let (raw, converted) = tokio::task::spawn_blocking(move || {
            let converted = transcoder.transcode(&raw, quality);
            (raw, converted)
        })
        .await
        .map_err(|e| PipelineError::Transcode {
            path: file.path.clone(),
            message: format!("Task join error: {}", e),
        })?;

        let jpeg = converted.map_err(|e| PipelineError::Transcode {
            path: file.path.clone(),
            message: e.to_string(),
        })?;
        tracing::trace!("  Transcode: {:?}", start.elapsed());

        Ok(NormalizedInput {
            image: ImageSource::InMemory(jpeg),
            metadata: ImageSource::InMemory(raw),
        })
    }
}

/// Runs an external converter such as `heif-convert` or `sips`.
///
/// The raw bytes are written to a scratch file, the converter is invoked with
/// the configured argument template, and the produced JPEG is read back.
pub struct CommandTranscoder {
    program: String,
    args: Vec<String>,
}

impl CommandTranscoder {
    pub fn new(config: &TranscodeConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }

    fn render_args(&self, input: &Path, output: &Path, quality: u8) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        let quality = quality.to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{input}", &input)
                    .replace("{output}", &output)
                    .replace("{quality}", &quality)
            })
            .collect()
    }
}

impl Transcoder for CommandTranscoder {
    fn transcode(&self, raw: &[u8], quality: u8) -> std::io::Result<Vec<u8>> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("input.heic");
        let output = scratch.path().join("output.jpg");
        std::fs::write(&input, raw)?;

        let result = Command::new(&self.program)
            .args(self.render_args(&input, &output, quality))
            .output()?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(std::io::Error::other(format!(
                "{} exited with {}: {}",
                self.program,
                result.status,
                stderr.trim()
            )));
        }

        std::fs::read(&output)
    }
}
