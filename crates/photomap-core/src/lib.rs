//! PhotoMap Core - photo ingestion for map display.
//!
//! Turns a directory of geotagged photos into web-sized JPEG derivatives and a
//! JSON manifest that a map front-end reads to place markers.
//!
//! # Architecture
//!
//! Each file runs through the pipeline on its own; a failure skips that file
//! and the run continues:
//!
//! ```text
//! Scan → Validate → Normalize (HEIC → JPEG) → GPS → Render → Manifest
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use photomap_core::{Config, PhotoMap};
//!
//! #[tokio::main]
//! async fn main() -> photomap_core::Result<()> {
//!     let photomap = PhotoMap::new(Config::load()?);
//!     let summary = photomap.run().await?;
//!     println!("Processed {} photos", summary.processed);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PhotoMapError, PipelineError, PipelineResult, Result};
pub use output::{Manifest, ManifestWriter};
pub use pipeline::{ImageProcessor, Transcoder};
pub use types::{GeoLocation, ImageSource, ItemOutcome, PhotoRecord, RunSummary, SkipReason};

use std::sync::Arc;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// PhotoMap runner - the main entry point for an ingestion run.
pub struct PhotoMap {
    config: Config,
    processor: ImageProcessor,
}

impl PhotoMap {
    /// Create a runner using the configured external HEIC converter.
    pub fn new(config: Config) -> Self {
        let processor = ImageProcessor::new(&config);
        Self { config, processor }
    }

    /// Create a runner with a caller-supplied transcoder.
    pub fn with_transcoder(config: Config, transcoder: Arc<dyn Transcoder>) -> Self {
        let processor = ImageProcessor::with_transcoder(&config, transcoder);
        Self { config, processor }
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process every file in the input directory and write the manifest.
    ///
    /// Files are handled one after another. Only a missing input directory,
    /// an uncreatable output directory, or a failed manifest write abort the
    /// run; in those cases the previous manifest is left untouched.
    pub async fn run(&self) -> Result<RunSummary> {
        let outcomes = self.collect_outcomes().await?;
        self.finish(&outcomes)
    }

    /// Scan and process all files, returning one outcome per candidate.
    pub async fn collect_outcomes(&self) -> Result<Vec<ItemOutcome>> {
        let input_dir = self.config.input_dir();
        let files = self.processor.discover(&input_dir)?;
        pipeline::prepare_output_dir(&self.config.output_dir())?;

        tracing::info!("Found {} file(s) in {:?}", files.len(), input_dir);

        let mut outcomes = Vec::with_capacity(files.len());
        for file in &files {
            let outcome = self.processor.process_file(file).await;
            log_outcome(&outcome);
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Fold outcomes into the manifest, write it and summarize the run.
    pub fn finish(&self, outcomes: &[ItemOutcome]) -> Result<RunSummary> {
        let mut manifest = Manifest::from_outcomes(outcomes);
        if self.config.output.sort_by_id {
            manifest.sort_by_id();
        }

        let writer = ManifestWriter::new(self.config.manifest_path(), self.config.output.pretty);
        writer.write(&manifest)?;

        let mut summary = RunSummary {
            records: manifest.len(),
            manifest_path: writer.path().to_path_buf(),
            ..RunSummary::default()
        };
        for outcome in outcomes {
            match outcome {
                ItemOutcome::Processed(_) => summary.processed += 1,
                ItemOutcome::Skipped { .. } => summary.skipped += 1,
                ItemOutcome::Failed { .. } => summary.failed += 1,
            }
        }

        tracing::info!(
            "Done! Processed {} photo(s). Metadata saved to {:?}",
            summary.records,
            summary.manifest_path
        );
        Ok(summary)
    }
}

/// One log line per file, at a level matching the outcome.
fn log_outcome(outcome: &ItemOutcome) {
    match outcome {
        ItemOutcome::Processed(record) => {
            tracing::info!(
                "Processed {}: {}, {}",
                record.original_name,
                record.lat,
                record.lng
            );
        }
        ItemOutcome::Skipped {
            file_name,
            reason: SkipReason::NoGeolocation,
        } => {
            tracing::warn!("No GPS data found for {}. Skipping.", file_name);
        }
        ItemOutcome::Skipped { file_name, reason } => {
            tracing::info!("Skipping {}: {}", file_name, reason);
        }
        ItemOutcome::Failed { file_name, error } => {
            tracing::error!("Failed: {} - {}", file_name, error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[tokio::test]
    async fn test_run_missing_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.input_dir = dir.path().join("photos");
        config.paths.output_dir = dir.path().join("public/photos");
        config.paths.manifest = dir.path().join("public/data.json");

        let err = PhotoMap::new(config).run().await.unwrap_err();
        assert!(matches!(err, PhotoMapError::MissingInputDirectory(_)));
        // Nothing created on the output side
        assert!(!dir.path().join("public").exists());
    }

    #[tokio::test]
    async fn test_run_empty_dir_writes_empty_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("photos")).unwrap();
        let mut config = Config::default();
        config.paths.input_dir = dir.path().join("photos");
        config.paths.output_dir = dir.path().join("public/photos");
        config.paths.manifest = dir.path().join("public/data.json");

        let summary = PhotoMap::new(config).run().await.unwrap();
        assert_eq!(summary.total(), 0);
        assert!(dir.path().join("public/photos").is_dir());
        let json = std::fs::read_to_string(dir.path().join("public/data.json")).unwrap();
        assert_eq!(json.trim(), "[]");
    }
}
