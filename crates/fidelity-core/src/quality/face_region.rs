//! Face presence proxy.
//!
//! [`SkinToneDetector`] counts skin-coloured pixels in a centered square and is
//! only a coarse stand-in for real face detection: it says nothing about
//! subjects whose skin falls outside the RGB rule, and it is sensitive to
//! lighting colour. It sits behind the [`FaceDetector`] trait so a proper
//! detector can replace it without changing how the score is aggregated.

use super::unit_score;
use crate::config::FaceRegionConfig;
use crate::types::PixelBuffer;

/// Face score and the region statistics behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceEstimate {
    /// Face presence score in `[0, 1]`
    pub score: f64,
    /// Fraction of sampled pixels classified as skin
    pub skin_ratio: f64,
    /// Pixels sampled
    pub region_pixels: u64,
}

/// Anything that can turn a pixel buffer into a face presence score.
pub trait FaceDetector: Send + Sync {
    /// Detector name for logging.
    fn name(&self) -> &str;

    /// Estimate face presence. Must return a score in `[0, 1]`.
    fn detect(&self, buffer: &PixelBuffer) -> FaceEstimate;
}

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Region {
    /// Square of side `fraction * min(width, height)` (at least 1 pixel)
    /// centered on the image midpoint and clamped to the image.
    pub fn centered(width: u32, height: u32, fraction: f64) -> Self {
        let shortest = width.min(height);
        let side = ((f64::from(shortest) * fraction).floor() as u32).clamp(1, shortest);
        let (cx, cy) = (width / 2, height / 2);
        let x0 = cx.saturating_sub(side / 2);
        let y0 = cy.saturating_sub(side / 2);
        Self {
            x0,
            y0,
            x1: (x0 + side).min(width),
            y1: (y0 + side).min(height),
        }
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.x1 - self.x0) * u64::from(self.y1 - self.y0)
    }
}

/// RGB skin-tone rule.
#[inline]
pub fn is_skin(r: u8, g: u8, b: u8) -> bool {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    r > 95 && g > 40 && b > 20 && r > g && r > b && r - g > 15 && max - min > 15
}

/// Skin-ratio detector over a centered crop.
#[derive(Debug, Clone)]
pub struct SkinToneDetector {
    config: FaceRegionConfig,
}

impl SkinToneDetector {
    pub fn new(config: FaceRegionConfig) -> Self {
        Self { config }
    }
}

impl Default for SkinToneDetector {
    fn default() -> Self {
        Self::new(FaceRegionConfig::default())
    }
}

impl FaceDetector for SkinToneDetector {
    fn name(&self) -> &str {
        "skin-tone"
    }

    fn detect(&self, buffer: &PixelBuffer) -> FaceEstimate {
        let region = Region::centered(buffer.width(), buffer.height(), self.config.region_fraction);

        let mut skin = 0u64;
        for y in region.y0..region.y1 {
            for x in region.x0..region.x1 {
                let [r, g, b] = buffer.rgb(x, y);
                if is_skin(r, g, b) {
                    skin += 1;
                }
            }
        }

        let region_pixels = region.pixel_count();
        let skin_ratio = skin as f64 / region_pixels as f64;
        FaceEstimate {
            score: unit_score(skin_ratio * self.config.skin_boost),
            skin_ratio,
            region_pixels,
        }
    }
}
