//! Laplacian edge-energy sharpness estimate.
//!
//! Blurred captures have little high-frequency energy, so the RMS response of
//! a 4-neighbour Laplacian over the interior is a cheap blur proxy.

use super::unit_score;
use crate::config::SharpnessConfig;
use crate::types::PixelBuffer;

/// Sharpness score plus the raw response it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharpnessEstimate {
    /// Normalized score in `[0, 1]`
    pub score: f64,
    /// RMS Laplacian response over interior pixels
    pub laplacian_rms: f64,
}

/// Estimate sharpness from the Laplacian response.
///
/// The 1-pixel border is skipped. Buffers narrower or shorter than 3 pixels
/// have no interior and score 0.
pub fn estimate(buffer: &PixelBuffer, config: &SharpnessConfig) -> SharpnessEstimate {
    let (width, height) = (buffer.width(), buffer.height());
    if width < 3 || height < 3 {
        tracing::debug!("Sharpness: {}x{} has no interior, scoring 0", width, height);
        return SharpnessEstimate {
            score: 0.0,
            laplacian_rms: 0.0,
        };
    }

    // Work in channel sums (3x luminance) so flat regions give exactly zero.
    let mut energy = 0.0;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = i64::from(buffer.channel_sum(x, y));
            let neighbours = i64::from(buffer.channel_sum(x, y - 1))
                + i64::from(buffer.channel_sum(x - 1, y))
                + i64::from(buffer.channel_sum(x + 1, y))
                + i64::from(buffer.channel_sum(x, y + 1));
            let laplacian = (neighbours - 4 * center).abs() as f64 / 3.0;
            energy += laplacian * laplacian;
        }
    }

    let interior = f64::from(width - 2) * f64::from(height - 2);
    let laplacian_rms = (energy / interior).sqrt();
    SharpnessEstimate {
        score: unit_score(laplacian_rms / config.divisor),
        laplacian_rms,
    }
}
