//! Biometric image quality estimators.
//!
//! Each estimator reads the same immutable [`PixelBuffer`](crate::PixelBuffer)
//! and produces one normalized score:
//! - **sharpness**: RMS Laplacian response (blur proxy)
//! - **lighting**: mean brightness and clipped-pixel ratios
//! - **contrast**: RMS contrast from a luminance histogram
//! - **face_region**: skin-tone ratio in a centered crop (face presence proxy)
//! - **noise**: mean local variance over small windows
//! - **resolution**: megapixel threshold table
//!
//! **aggregate** combines them with fixed weights and **analyzer** wires the
//! whole thing together.

pub mod aggregate;
pub mod analyzer;
pub mod contrast;
pub mod face_region;
pub mod lighting;
pub mod noise;
pub mod resolution;
pub mod sharpness;

/// Clamp a score to `[0, 1]`, mapping NaN and infinities to 0.
///
/// Estimators divide by configured constants, so a zero or non-finite
/// setting must not leak NaN into the metrics.
pub(crate) fn unit_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// Re-exports for convenient access
pub use analyzer::QualityAnalyzer;
pub use face_region::{FaceDetector, FaceEstimate, Region, SkinToneDetector};
