//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

/// Allowed drift of the weight sum away from 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

fn check_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(format!("{name} must be a finite value > 0")));
    }
    Ok(())
}

fn check_unit(name: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(format!("{name} must be between 0.0 and 1.0")));
    }
    Ok(())
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    ///
    /// `from_toml` and the loaders call this; a `Config` built in code
    /// should be checked before it reaches the analyzer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("sharpness.divisor", self.sharpness.divisor)?;
        check_positive("contrast.divisor", self.contrast.divisor)?;
        check_positive("noise.divisor", self.noise.divisor)?;
        check_positive("face_region.skin_boost", self.face_region.skin_boost)?;
        check_positive("lighting.target_brightness", self.lighting.target_brightness)?;

        if self.lighting.dark_threshold >= self.lighting.bright_threshold {
            return Err(invalid(
                "lighting.dark_threshold must be below lighting.bright_threshold",
            ));
        }

        let fraction = self.face_region.region_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(invalid(
                "face_region.region_fraction must be in (0.0, 1.0]",
            ));
        }

        if self.noise.window_radius == 0 {
            return Err(invalid("noise.window_radius must be > 0"));
        }
        check_unit("noise.empty_score", self.noise.empty_score)?;

        check_unit("resolution.floor_score", self.resolution.floor_score)?;
        for (i, tier) in self.resolution.tiers.iter().enumerate() {
            check_unit(&format!("resolution.tiers[{i}].score"), tier.score)?;
            if !tier.min_megapixels.is_finite() || tier.min_megapixels < 0.0 {
                return Err(invalid(format!(
                    "resolution.tiers[{i}].min_megapixels must be >= 0"
                )));
            }
        }
        if self
            .resolution
            .tiers
            .windows(2)
            .any(|pair| pair[0].min_megapixels <= pair[1].min_megapixels)
        {
            return Err(invalid(
                "resolution.tiers must be ordered by descending min_megapixels",
            ));
        }

        let weights = &self.weights;
        let named = [
            ("weights.sharpness", weights.sharpness),
            ("weights.lighting", weights.lighting),
            ("weights.contrast", weights.contrast),
            ("weights.face_region", weights.face_region),
            ("weights.noise_level", weights.noise_level),
            ("weights.resolution", weights.resolution),
        ];
        for (name, value) in named {
            check_unit(name, value)?;
        }
        if (weights.total() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!(
                "weights must sum to 1.0 (got {:.6})",
                weights.total()
            )));
        }

        if self.limits.max_file_size_mb == 0 {
            return Err(invalid("limits.max_file_size_mb must be > 0"));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(invalid("limits.max_image_dimension must be > 0"));
        }
        if self.noise.window_radius > self.limits.max_image_dimension / 2 {
            return Err(invalid(
                "noise.window_radius must be <= limits.max_image_dimension / 2",
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(invalid("limits.decode_timeout_ms must be > 0"));
        }

        if self.trust.timeout_ms == 0 {
            return Err(invalid("trust.timeout_ms must be > 0"));
        }
        check_unit("trust.agreement_rate", self.trust.agreement_rate)?;
        check_unit("trust.witness_score", self.trust.witness_score)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolutionTier;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_divisor() {
        let mut config = Config::default();
        config.sharpness.divisor = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sharpness.divisor"));
    }

    #[test]
    fn test_validate_rejects_nan_divisor() {
        let mut config = Config::default();
        config.noise.divisor = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("noise.divisor"));
    }

    #[test]
    fn test_validate_rejects_weights_not_summing_to_one() {
        let mut config = Config::default();
        config.weights.sharpness = 0.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_validate_rejects_negative_weight() {
        let mut config = Config::default();
        config.weights.sharpness = -0.05;
        config.weights.lighting = 0.50;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("weights.sharpness"));
    }

    #[test]
    fn test_validate_rejects_unordered_tiers() {
        let mut config = Config::default();
        config.resolution.tiers.push(ResolutionTier {
            min_megapixels: 4.0,
            score: 1.0,
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("descending"));
    }

    #[test]
    fn test_validate_rejects_region_fraction_out_of_range() {
        let mut config = Config::default();
        config.face_region.region_fraction = 0.0;
        assert!(config.validate().is_err());

        config.face_region.region_fraction = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("region_fraction"));
    }

    #[test]
    fn test_validate_rejects_zero_window_radius() {
        let mut config = Config::default();
        config.noise.window_radius = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("window_radius"));
    }

    #[test]
    fn test_validate_rejects_oversized_window_radius() {
        let err = Config::from_toml("[noise]\nwindow_radius = 4294967295\n").unwrap_err();
        assert!(err.to_string().contains("window_radius"));

        let mut config = Config::default();
        config.limits.max_image_dimension = 64;
        config.noise.window_radius = 32;
        assert!(config.validate().is_ok());
        config.noise.window_radius = 33;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_lighting_thresholds() {
        let mut config = Config::default();
        config.lighting.dark_threshold = 210.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("dark_threshold"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_trust_inputs() {
        let mut config = Config::default();
        config.trust.witness_score = 1.2;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("witness_score"));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = Config::default();
        config.limits.max_image_dimension = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_image_dimension"));
    }
}
