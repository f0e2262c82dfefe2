//! Megapixel threshold lookup.

use crate::config::ResolutionConfig;

/// Pixels per megapixel.
pub const PIXELS_PER_MEGAPIXEL: f64 = 1024.0 * 1024.0;

/// Resolution score and the megapixel count it was looked up from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionEstimate {
    pub score: f64,
    pub megapixels: f64,
}

/// Image size in megapixels.
pub fn megapixels(width: u32, height: u32) -> f64 {
    f64::from(width) * f64::from(height) / PIXELS_PER_MEGAPIXEL
}

/// First tier whose bound the image meets wins; below every tier the floor
/// score applies.
pub fn score(width: u32, height: u32, config: &ResolutionConfig) -> ResolutionEstimate {
    let megapixels = megapixels(width, height);
    let score = config
        .tiers
        .iter()
        .find(|tier| megapixels >= tier.min_megapixels)
        .map_or(config.floor_score, |tier| tier.score);
    ResolutionEstimate {
        score: score.clamp(0.0, 1.0),
        megapixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(width: u32, height: u32) -> f64 {
        score(width, height, &ResolutionConfig::default()).score
    }

    #[test]
    fn test_vga_is_below_lowest_tier() {
        let result = score(640, 480, &ResolutionConfig::default());
        assert!((result.megapixels - 0.29296875).abs() < 1e-12);
        assert_eq!(result.score, 0.3);
    }

    #[test]
    fn test_exact_tier_boundaries() {
        assert_eq!(lookup(2048, 1024), 1.0); // exactly 2.0 MP
        assert_eq!(lookup(1024, 1024), 0.9); // exactly 1.0 MP
        assert_eq!(lookup(1024, 512), 0.8); // exactly 0.5 MP
    }

    #[test]
    fn test_full_hd_falls_just_below_two_megapixels() {
        // 1920 * 1080 / 1048576 = 1.9775...
        let result = score(1920, 1080, &ResolutionConfig::default());
        assert!(result.megapixels < 2.0);
        assert_eq!(result.score, 0.9);
    }

    #[test]
    fn test_tier_bands() {
        assert_eq!(lookup(800, 600), 0.6); // 0.458 MP
        assert_eq!(lookup(1280, 720), 0.8); // 0.879 MP
        assert_eq!(lookup(4000, 3000), 1.0);
        assert_eq!(lookup(1, 1), 0.3);
    }

    #[test]
    fn test_empty_table_uses_floor() {
        let config = ResolutionConfig {
            tiers: vec![],
            floor_score: 0.7,
        };
        assert_eq!(score(4000, 3000, &config).score, 0.7);
    }
}
