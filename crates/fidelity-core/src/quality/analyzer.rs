//! Analyzer orchestration - runs the six estimators and aggregates them.

use std::time::Instant;

use crate::config::{
    Config, ContrastConfig, LightingConfig, NoiseConfig, ResolutionConfig, SharpnessConfig,
    WeightsConfig,
};
use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{Diagnostics, FidelityScore, PixelBuffer, QualityMetrics};

use super::aggregate;
use super::contrast::{self, ContrastEstimate};
use super::face_region::{FaceDetector, FaceEstimate, SkinToneDetector};
use super::lighting::{self, LightingEstimate};
use super::noise::{self, NoiseEstimate};
use super::resolution::{self, ResolutionEstimate};
use super::sharpness::{self, SharpnessEstimate};

/// Raw output of every estimator for one buffer.
struct Estimates {
    sharpness: SharpnessEstimate,
    lighting: LightingEstimate,
    contrast: ContrastEstimate,
    face: FaceEstimate,
    noise: NoiseEstimate,
    resolution: ResolutionEstimate,
}

impl Estimates {
    fn metrics(&self) -> QualityMetrics {
        QualityMetrics {
            sharpness: self.sharpness.score,
            lighting: self.lighting.score,
            contrast: self.contrast.score,
            face_region: self.face.score.clamp(0.0, 1.0),
            noise_level: self.noise.score,
            resolution: self.resolution.score,
        }
    }

    fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            laplacian_rms: self.sharpness.laplacian_rms,
            mean_brightness: self.lighting.mean_brightness,
            dark_ratio: self.lighting.dark_ratio,
            bright_ratio: self.lighting.bright_ratio,
            rms_contrast: self.contrast.rms_contrast,
            luminance_min: self.contrast.min,
            luminance_max: self.contrast.max,
            skin_ratio: self.face.skin_ratio,
            face_region_pixels: self.face.region_pixels,
            noise_windows: self.noise.windows,
            mean_window_variance: self.noise.mean_variance,
            megapixels: self.resolution.megapixels,
        }
    }
}

/// Stateless scorer turning a [`PixelBuffer`] into a [`FidelityScore`].
///
/// Holds only configuration; every call allocates its own working state, so
/// one analyzer can be shared across threads.
pub struct QualityAnalyzer {
    sharpness: SharpnessConfig,
    lighting: LightingConfig,
    contrast: ContrastConfig,
    noise: NoiseConfig,
    resolution: ResolutionConfig,
    weights: WeightsConfig,
    max_dimension: u32,
    parallel: bool,
    face_detector: Box<dyn FaceDetector>,
}

impl Default for QualityAnalyzer {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl QualityAnalyzer {
    /// Create an analyzer from configuration, using the skin-tone face proxy.
    pub fn new(config: &Config) -> Self {
        Self {
            sharpness: config.sharpness.clone(),
            lighting: config.lighting.clone(),
            contrast: config.contrast.clone(),
            noise: config.noise.clone(),
            resolution: config.resolution.clone(),
            weights: config.weights,
            max_dimension: config.limits.max_image_dimension,
            parallel: config.analysis.parallel,
            face_detector: Box::new(SkinToneDetector::new(config.face_region.clone())),
        }
    }

    /// Replace the face presence estimator.
    pub fn with_face_detector(mut self, detector: impl FaceDetector + 'static) -> Self {
        self.face_detector = Box::new(detector);
        self
    }

    /// Toggle concurrent estimator execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Name of the active face detector.
    pub fn face_detector_name(&self) -> &str {
        self.face_detector.name()
    }

    /// Reject buffers over the configured dimension ceiling.
    pub fn validate(&self, buffer: &PixelBuffer) -> AnalysisResult<()> {
        if buffer.width() > self.max_dimension || buffer.height() > self.max_dimension {
            return Err(AnalysisError::ImageTooLarge {
                width: buffer.width(),
                height: buffer.height(),
                max_dim: self.max_dimension,
            });
        }
        Ok(())
    }

    /// Validate raw RGBA bytes into a buffer and score it.
    pub fn analyze_bytes(
        &self,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> AnalysisResult<FidelityScore> {
        let buffer = PixelBuffer::new(width, height, data)?;
        self.analyze(&buffer)
    }

    /// Score a pixel buffer.
    ///
    /// The only failure is an input-validation error, raised before any
    /// estimator runs.
    pub fn analyze(&self, buffer: &PixelBuffer) -> AnalysisResult<FidelityScore> {
        self.validate(buffer)?;

        let start = Instant::now();
        let estimates = if self.parallel {
            self.run_parallel(buffer)
        } else {
            self.run_sequential(buffer)
        };
        let metrics = estimates.metrics();
        let aggregate = aggregate::combine(&metrics, &self.weights);

        tracing::debug!(
            "Scored {}x{} in {:?}: fidelity={:.3} ({})",
            buffer.width(),
            buffer.height(),
            start.elapsed(),
            aggregate,
            metrics
        );

        Ok(FidelityScore {
            aggregate,
            metrics,
            diagnostics: estimates.diagnostics(),
        })
    }

    fn run_sequential(&self, buffer: &PixelBuffer) -> Estimates {
        let stage = Instant::now();
        let sharpness = sharpness::estimate(buffer, &self.sharpness);
        tracing::trace!("  Sharpness: {:?}", stage.elapsed());

        let stage = Instant::now();
        let lighting = lighting::assess(buffer, &self.lighting);
        tracing::trace!("  Lighting: {:?}", stage.elapsed());

        let stage = Instant::now();
        let contrast = contrast::analyze(buffer, &self.contrast);
        tracing::trace!("  Contrast: {:?}", stage.elapsed());

        let stage = Instant::now();
        let face = self.face_detector.detect(buffer);
        tracing::trace!("  Face region ({}): {:?}", self.face_detector.name(), stage.elapsed());

        let stage = Instant::now();
        let noise = noise::estimate(buffer, &self.noise);
        tracing::trace!("  Noise: {:?}", stage.elapsed());

        Estimates {
            sharpness,
            lighting,
            contrast,
            face,
            noise,
            resolution: resolution::score(buffer.width(), buffer.height(), &self.resolution),
        }
    }

    /// Fork/join the estimators on the rayon pool. Each estimator is itself
    /// sequential, so the result is bit-identical to `run_sequential`.
    fn run_parallel(&self, buffer: &PixelBuffer) -> Estimates {
        let ((sharpness, lighting), ((contrast, face), noise)) = rayon::join(
            || {
                rayon::join(
                    || sharpness::estimate(buffer, &self.sharpness),
                    || lighting::assess(buffer, &self.lighting),
                )
            },
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || contrast::analyze(buffer, &self.contrast),
                            || self.face_detector.detect(buffer),
                        )
                    },
                    || noise::estimate(buffer, &self.noise),
                )
            },
        );

        Estimates {
            sharpness,
            lighting,
            contrast,
            face,
            noise,
            resolution: resolution::score(buffer.width(), buffer.height(), &self.resolution),
        }
    }
}
