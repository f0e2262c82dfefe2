//! RMS contrast from a 256-bucket luminance histogram.

use super::unit_score;
use crate::config::ContrastConfig;
use crate::types::{luminance, PixelBuffer};

/// Contrast score and histogram statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastEstimate {
    pub score: f64,
    /// Standard deviation of rounded luminance
    pub rms_contrast: f64,
    /// Mean rounded luminance
    pub mean: f64,
    pub min: u8,
    pub max: u8,
}

/// Build a histogram of rounded luminance, returning it with the observed
/// min and max bucket.
fn histogram(buffer: &PixelBuffer) -> ([u64; 256], u8, u8) {
    let mut buckets = [0u64; 256];
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    for px in buffer.pixels() {
        // Average of three u8 values rounds into 0..=255
        let gray = luminance(px[0], px[1], px[2]).round() as u8;
        buckets[gray as usize] += 1;
        min = min.min(gray);
        max = max.max(gray);
    }
    (buckets, min, max)
}

/// Score global contrast as `min(rms / divisor, 1)`.
pub fn analyze(buffer: &PixelBuffer, config: &ContrastConfig) -> ContrastEstimate {
    let (buckets, min, max) = histogram(buffer);
    let total = buffer.pixel_count() as f64;

    let mean = buckets
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum::<f64>()
        / total;

    let variance = buckets
        .iter()
        .enumerate()
        .map(|(level, &count)| {
            let delta = level as f64 - mean;
            count as f64 * delta * delta
        })
        .sum::<f64>()
        / total;

    let rms_contrast = variance.max(0.0).sqrt();
    ContrastEstimate {
        score: unit_score(rms_contrast / config.divisor),
        rms_contrast,
        mean,
        min,
        max,
    }
}
