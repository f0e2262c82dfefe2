//! Windowed-variance noise estimate.
//!
//! Sampling centers sit `r` pixels apart on a grid that keeps a `r`-pixel
//! border, and each center is scored by the luminance variance of its
//! `(2r + 1)^2` neighbourhood. Smooth captures have low local variance and
//! score high; sensor or compression noise drives the score down.

use super::unit_score;
use crate::config::NoiseConfig;
use crate::types::PixelBuffer;

/// Noise score and window statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseEstimate {
    pub score: f64,
    /// Windows that fit inside the image
    pub windows: u64,
    /// Mean window variance; `None` when no window fits
    pub mean_variance: Option<f64>,
}

/// Luminance variance of the window centered on `(cx, cy)`, computed as
/// `E[g^2] - E[g]^2`. Floored at zero against rounding error.
fn window_variance(buffer: &PixelBuffer, cx: u32, cy: u32, radius: u32) -> f64 {
    // Accumulate channel sums (3x luminance) as integers; scale back at the end.
    let mut sum = 0u64;
    let mut sum_sq = 0u64;
    for y in cy - radius..=cy + radius {
        for x in cx - radius..=cx + radius {
            let s = u64::from(buffer.channel_sum(x, y));
            sum += s;
            sum_sq += s * s;
        }
    }
    let side = f64::from(2 * radius + 1);
    let n = side * side;
    let mean = sum as f64 / n;
    ((sum_sq as f64 / n - mean * mean) / 9.0).max(0.0)
}

/// Estimate noise as `1 - min(mean_variance / divisor, 1)`.
///
/// Images with no room for a single window (either side `<= 2r`) get
/// `config.empty_score` rather than a 0/0 average.
pub fn estimate(buffer: &PixelBuffer, config: &NoiseConfig) -> NoiseEstimate {
    let radius = config.window_radius.max(1);
    let (width, height) = (buffer.width(), buffer.height());

    let mut total = 0.0;
    let mut windows = 0u64;
    // Centers satisfy r <= c < dim - r, so every window stays in bounds.
    let fits = |center: u32, dim: u32| center.checked_add(radius).is_some_and(|end| end < dim);
    let mut cy = radius;
    while fits(cy, height) {
        let mut cx = radius;
        while fits(cx, width) {
            total += window_variance(buffer, cx, cy, radius);
            windows += 1;
            cx += radius;
        }
        cy += radius;
    }

    if windows == 0 {
        tracing::debug!(
            "Noise: {}x{} too small for a {}px window, using neutral score",
            width,
            height,
            u64::from(radius) * 2 + 1
        );
        return NoiseEstimate {
            score: unit_score(config.empty_score),
            windows: 0,
            mean_variance: None,
        };
    }

    let mean_variance = total / windows as f64;
    NoiseEstimate {
        score: unit_score(1.0 - (mean_variance / config.divisor).min(1.0)),
        windows,
        mean_variance: Some(mean_variance),
    }
}
