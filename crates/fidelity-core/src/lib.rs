//! Fidelity Core - biometric image quality scoring.
//!
//! Scores how usable a face capture is for identity verification. The core is
//! a pure, synchronous transformation over an already-decoded RGBA buffer:
//!
//! ```text
//! PixelBuffer → six estimators → QualityMetrics → weighted sum → FidelityScore
//! ```
//!
//! Around it sit the collaborators: a decode adapter and directory discovery
//! ([`pipeline`]), report output ([`output`]) and a client for the trust
//! service that consumes the score ([`trust`]).
//!
//! # Usage
//!
//! ```rust
//! use fidelity_core::{PixelBuffer, QualityAnalyzer};
//!
//! let buffer = PixelBuffer::filled(64, 64, [128, 128, 128, 255]).unwrap();
//! let score = QualityAnalyzer::default().analyze(&buffer).unwrap();
//! assert!((0.0..=1.0).contains(&score.aggregate));
//! println!("{}", score.metrics);
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod quality;
pub mod trust;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    AnalysisError, AnalysisResult, ConfigError, FidelityError, InputError, Result, TrustError,
};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::ImageProcessor;
pub use quality::{FaceDetector, QualityAnalyzer, SkinToneDetector};
pub use trust::{HttpTrustClient, TrustRequest, TrustResponse, TrustService};
pub use types::{AnalysisReport, Diagnostics, FidelityScore, PixelBuffer, QualityMetrics};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Score a buffer with the default configuration.
pub fn analyze(buffer: &PixelBuffer) -> AnalysisResult<FidelityScore> {
    QualityAnalyzer::default().analyze(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_analyze_with_defaults() {
        let buffer = PixelBuffer::filled(8, 8, [0, 0, 0, 255]).unwrap();
        let score = analyze(&buffer).unwrap();
        assert_eq!(score.metrics.lighting, 0.0);
        assert!(score.metrics.in_unit_range());
    }
}
