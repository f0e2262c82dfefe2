//! Configuration management for fidelity scoring.
//!
//! Configuration is loaded from the platform config directory with defaults
//! for every field. All config structs implement `Default`, so a partial file
//! only overrides what it names.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Analysis orchestration
    pub analysis: AnalysisConfig,

    /// Sharpness estimator
    pub sharpness: SharpnessConfig,

    /// Lighting assessor
    pub lighting: LightingConfig,

    /// Contrast analyzer
    pub contrast: ContrastConfig,

    /// Face region detector
    pub face_region: FaceRegionConfig,

    /// Noise estimator
    pub noise: NoiseConfig,

    /// Resolution scorer
    pub resolution: ResolutionConfig,

    /// Aggregator weights
    pub weights: WeightsConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Input discovery
    pub input: InputConfig,

    /// Trust service client
    pub trust: TrustConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.fidelity.fidelity/config.toml
    /// - Linux: ~/.config/fidelity/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\fidelity\config\config.toml
    ///
    /// Falls back to ~/.fidelity/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "fidelity", "fidelity")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".fidelity").join("config.toml")
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analysis.parallel);
        assert_eq!(config.sharpness.divisor, 50.0);
        assert_eq!(config.contrast.divisor, 70.0);
        assert_eq!(config.noise.divisor, 1000.0);
        assert_eq!(config.noise.window_radius, 3);
        assert_eq!(config.face_region.skin_boost, 3.0);
        assert_eq!(config.limits.max_image_dimension, 10000);
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = WeightsConfig::default();
        assert!((weights.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[weights]"));
        assert!(toml.contains("[noise]"));
        assert!(toml.contains("[[resolution.tiers]]"));
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [sharpness]
            divisor = 40.0

            [trust]
            endpoint = "http://trust.internal:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.sharpness.divisor, 40.0);
        assert_eq!(config.trust.endpoint, "http://trust.internal:9000");
        assert_eq!(config.trust.agreement_rate, 0.95);
        assert_eq!(config.weights, WeightsConfig::default());
        assert_eq!(config.resolution.tiers.len(), 4);
    }

    #[test]
    fn test_from_toml_rejects_invalid_values() {
        let err = Config::from_toml("[contrast]\ndivisor = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("contrast.divisor"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[analysis]\nparallel = false\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.analysis.parallel);
    }

    #[test]
    fn test_default_config_roundtrips_through_toml() {
        let toml = Config::default().to_toml().unwrap();
        let parsed = Config::from_toml(&toml).unwrap();
        assert_eq!(parsed.resolution.tiers, ResolutionConfig::default().tiers);
        assert_eq!(parsed.weights, WeightsConfig::default());
    }
}
