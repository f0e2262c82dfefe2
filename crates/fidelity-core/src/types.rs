//! Core data types for fidelity scoring.
//!
//! [`PixelBuffer`] is the only input the scoring core accepts. [`FidelityScore`]
//! is what it returns; [`AnalysisReport`] wraps a score with file identity for
//! output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::{AnalysisError, AnalysisResult};
use crate::trust::TrustResponse;

/// Luminance of an RGB sample: the plain average of the three channels.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0
}

/// An immutable, already-decoded RGBA raster.
///
/// Samples are interleaved `r, g, b, a`; alpha is carried but never read by
/// the estimators. The constructors reject zero dimensions and byte lengths
/// other than `width * height * 4`, so every `PixelBuffer` is well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Bytes per pixel.
    pub const CHANNELS: usize = 4;

    /// Wrap an RGBA byte vector, validating its shape.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> AnalysisResult<Self> {
        if width == 0 || height == 0 {
            return Err(AnalysisError::ZeroDimension { width, height });
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(Self::CHANNELS))
            .unwrap_or(usize::MAX);
        if data.len() != expected {
            return Err(AnalysisError::LengthMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> AnalysisResult<Self> {
        let count = (width as usize).saturating_mul(height as usize);
        Self::new(width, height, rgba.repeat(count))
    }

    /// Build a buffer from a per-pixel RGB function. Alpha is set to 255.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> AnalysisResult<Self>
    where
        F: FnMut(u32, u32) -> [u8; 3],
    {
        let mut data = Vec::with_capacity((width as usize * height as usize) * Self::CHANNELS);
        for y in 0..height {
            for x in 0..width {
                let [r, g, b] = f(x, y);
                data.extend_from_slice(&[r, g, b, 255]);
            }
        }
        Self::new(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw interleaved RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Iterate over pixels as 4-byte RGBA slices in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(Self::CHANNELS)
    }

    /// RGB sample at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Luminance at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn luminance(&self, x: u32, y: u32) -> f64 {
        let [r, g, b] = self.rgb(x, y);
        luminance(r, g, b)
    }

    /// `r + g + b` at `(x, y)`, i.e. three times the luminance, kept integral
    /// so neighbourhood sums stay exact.
    #[inline]
    pub fn channel_sum(&self, x: u32, y: u32) -> u32 {
        let [r, g, b] = self.rgb(x, y);
        u32::from(r) + u32::from(g) + u32::from(b)
    }
}

/// The six normalized sub-scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub sharpness: f64,
    pub lighting: f64,
    pub contrast: f64,
    pub face_region: f64,
    pub noise_level: f64,
    pub resolution: f64,
}

impl QualityMetrics {
    /// Metrics in aggregation order (matches [`crate::config::WeightsConfig::as_array`]).
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.sharpness,
            self.lighting,
            self.contrast,
            self.face_region,
            self.noise_level,
            self.resolution,
        ]
    }

    /// True when every metric is finite and within `[0, 1]`.
    pub fn in_unit_range(&self) -> bool {
        self.as_array()
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v))
    }
}

/// Three-decimal rendering for display, e.g. `sharpness=0.412 lighting=0.873 ...`.
impl fmt::Display for QualityMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sharpness={:.3} lighting={:.3} contrast={:.3} face_region={:.3} noise_level={:.3} resolution={:.3}",
            self.sharpness,
            self.lighting,
            self.contrast,
            self.face_region,
            self.noise_level,
            self.resolution
        )
    }
}

/// Intermediate values computed on the way to each metric.
///
/// For display and debugging only; nothing here feeds the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// RMS of the Laplacian response over interior pixels
    pub laplacian_rms: f64,

    /// Mean luminance over all pixels
    pub mean_brightness: f64,

    /// Fraction of pixels below the dark threshold
    pub dark_ratio: f64,

    /// Fraction of pixels above the bright threshold
    pub bright_ratio: f64,

    /// Standard deviation of rounded luminance
    pub rms_contrast: f64,

    /// Darkest rounded luminance seen
    pub luminance_min: u8,

    /// Brightest rounded luminance seen
    pub luminance_max: u8,

    /// Fraction of the face region classified as skin
    pub skin_ratio: f64,

    /// Pixels inside the face region
    pub face_region_pixels: u64,

    /// Number of noise sampling windows that fit
    pub noise_windows: u64,

    /// Mean luminance variance across noise windows, if any fit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_window_variance: Option<f64>,

    /// Image size in megapixels (1024 * 1024 pixels each)
    pub megapixels: f64,
}

/// Result of scoring one pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FidelityScore {
    /// Weighted combination of the metrics, in `[0, 1]`
    pub aggregate: f64,

    /// Sub-scores kept for display
    pub metrics: QualityMetrics,

    /// Estimator internals
    pub diagnostics: Diagnostics,
}

/// Output record for one analyzed image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Path to the source file
    pub file_path: PathBuf,

    /// Just the filename portion
    pub file_name: String,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Aggregate fidelity score
    pub fidelity_score: f64,

    /// Sub-scores
    pub metrics: QualityMetrics,

    /// Estimator internals (omitted when disabled in config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,

    /// Trust service response, when the score was submitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust: Option<TrustResponse>,
}

impl AnalysisReport {
    /// Build a report from a score and its source image.
    pub fn new(
        file_path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        score: &FidelityScore,
        include_diagnostics: bool,
    ) -> Self {
        let file_path = file_path.into();
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Self {
            file_path,
            file_name,
            width,
            height,
            fidelity_score: score.aggregate,
            metrics: score.metrics,
            diagnostics: include_diagnostics.then_some(score.diagnostics),
            trust: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_buffer_rejects_zero_dimension() {
        let err = PixelBuffer::new(0, 10, vec![]).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::ZeroDimension {
                width: 0,
                height: 10
            }
        );
    }

    #[test]
    fn test_pixel_buffer_rejects_length_mismatch() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::LengthMismatch {
                expected: 16,
                actual: 15,
                ..
            }
        ));
    }

    #[test]
    fn test_pixel_buffer_accessors() {
        let buffer = PixelBuffer::from_fn(3, 2, |x, y| [x as u8, y as u8, 30]).unwrap();
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 2);
        assert_eq!(buffer.pixel_count(), 6);
        assert_eq!(buffer.as_bytes().len(), 24);
        assert_eq!(buffer.rgb(2, 1), [2, 1, 30]);
        assert_eq!(buffer.pixels().count(), 6);
    }

    #[test]
    fn test_luminance_is_channel_mean() {
        assert_eq!(luminance(30, 60, 90), 60.0);
        assert_eq!(luminance(255, 255, 255), 255.0);
        let buffer = PixelBuffer::filled(1, 1, [10, 20, 0, 0]).unwrap();
        assert_eq!(buffer.luminance(0, 0), 10.0);
        assert_eq!(buffer.channel_sum(0, 0), 30);
    }

    #[test]
    fn test_metrics_display_three_decimals() {
        let metrics = QualityMetrics {
            sharpness: 0.5,
            lighting: 1.0,
            contrast: 0.12345,
            face_region: 0.0,
            noise_level: 0.9999,
            resolution: 0.3,
        };
        let text = metrics.to_string();
        assert!(text.contains("sharpness=0.500"));
        assert!(text.contains("contrast=0.123"));
        assert!(text.contains("noise_level=1.000"));
    }

    #[test]
    fn test_report_omits_diagnostics_and_trust_when_absent() {
        let score = FidelityScore {
            aggregate: 0.42,
            metrics: QualityMetrics::default(),
            diagnostics: Diagnostics::default(),
        };
        let report = AnalysisReport::new("/captures/alice.png", 640, 480, &score, false);
        assert_eq!(report.file_name, "alice.png");

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"fidelity_score\":0.42"));
        assert!(!json.contains("diagnostics"));
        assert!(!json.contains("trust"));
    }
}
