//! File-level pipeline around the scoring core.
//!
//! - **discovery**: Find capture images in directories
//! - **decode**: Turn image files into pixel buffers, with size limits and a timeout
//! - **processor**: Decode then score, producing an [`AnalysisReport`](crate::AnalysisReport)

pub mod decode;
pub mod discovery;
pub mod processor;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use processor::ImageProcessor;
