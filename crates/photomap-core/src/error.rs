//! Error types for the PhotoMap ingestion pipeline.
//!
//! Errors are split by blast radius: [`PhotoMapError`] aborts the whole run,
//! while [`PipelineError`] is confined to a single input file and is reported
//! as part of that file's outcome.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type. Any of these terminates the run.
#[derive(Error, Debug)]
pub enum PhotoMapError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The input directory is absent
    #[error("Input directory does not exist: {0}")]
    MissingInputDirectory(PathBuf),

    /// The output directory could not be created
    #[error("Cannot create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest could not be written
    #[error("Cannot write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Per-file processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The source file could not be read
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Header does not look like any supported image container
    #[error("Invalid image {path}: {message}")]
    InvalidImage { path: PathBuf, message: String },

    /// Converting the lossy-metadata format to a decodable image failed
    #[error("Transcode failed for {path}: {message}")]
    Transcode { path: PathBuf, message: String },

    /// Decoding, resizing, encoding or writing a derivative failed
    #[error("Render failed for {path}: {message}")]
    Render { path: PathBuf, message: String },
}

impl PipelineError {
    /// Path of the input file the error belongs to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Read { path, .. }
            | Self::FileTooLarge { path, .. }
            | Self::InvalidImage { path, .. }
            | Self::Transcode { path, .. }
            | Self::Render { path, .. } => path,
        }
    }
}

/// Convenience type alias for PhotoMap results.
pub type Result<T> = std::result::Result<T, PhotoMapError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
