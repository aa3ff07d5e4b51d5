//! Photo ingestion pipeline components.
//!
//! This module contains all the stages a photo passes through:
//! - **discovery**: List candidate files in the input directory
//! - **validate**: Pre-processing validation
//! - **normalize**: Pick byte sources, transcoding formats that lose metadata
//! - **metadata**: Extract GPS position, capture time and caption
//! - **decode**: Decode images from various formats
//! - **render**: Write the thumbnail and large JPEG derivatives
//! - **processor**: Orchestrates the stages for a single file

pub mod decode;
pub mod discovery;
pub mod metadata;
pub mod normalize;
pub mod processor;
pub mod render;
pub mod validate;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{prepare_output_dir, DiscoveredFile, FileDiscovery};
pub use metadata::{MetadataExtractor, PhotoMetadata};
pub use normalize::{CommandTranscoder, FormatNormalizer, NormalizedInput, Transcoder};
pub use processor::ImageProcessor;
pub use render::{RenderedDerivatives, Renderer};
pub use validate::Validator;
