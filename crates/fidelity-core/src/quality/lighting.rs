//! Exposure quality from the brightness distribution.

use super::unit_score;
use crate::config::LightingConfig;
use crate::types::{luminance, PixelBuffer};

/// Lighting score and the brightness statistics behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingEstimate {
    pub score: f64,
    pub mean_brightness: f64,
    pub dark_ratio: f64,
    pub bright_ratio: f64,
}

/// Score exposure as the mean of two sub-scores:
///
/// - brightness: `1 - |mean - target| / target`, penalizing a mean away from mid-gray
/// - exposure: `1 - 2 * max(dark_ratio, bright_ratio)`, penalizing clipped regions
///
/// Each sub-score is clamped to `[0, 1]` before averaging, so a very dark image
/// cannot drag the brightness half negative.
pub fn assess(buffer: &PixelBuffer, config: &LightingConfig) -> LightingEstimate {
    let mut total = 0.0;
    let mut dark = 0u64;
    let mut bright = 0u64;

    for px in buffer.pixels() {
        let value = luminance(px[0], px[1], px[2]);
        total += value;
        if value < config.dark_threshold {
            dark += 1;
        }
        if value > config.bright_threshold {
            bright += 1;
        }
    }

    let count = buffer.pixel_count() as f64;
    let mean_brightness = total / count;
    let dark_ratio = dark as f64 / count;
    let bright_ratio = bright as f64 / count;

    let target = config.target_brightness;
    let brightness_score = unit_score(1.0 - (mean_brightness - target).abs() / target);
    let exposure_score = (1.0 - 2.0 * dark_ratio.max(bright_ratio)).clamp(0.0, 1.0);

    LightingEstimate {
        score: ((brightness_score + exposure_score) / 2.0).clamp(0.0, 1.0),
        mean_brightness,
        dark_ratio,
        bright_ratio,
    }
}
