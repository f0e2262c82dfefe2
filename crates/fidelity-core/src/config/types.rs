//! Sub-configuration structs with the empirically chosen defaults.
//!
//! The normalization divisors, thresholds and weights below have no derivation
//! in the scoring model; they are tuning values. Change them through the config
//! file rather than in code.

use serde::{Deserialize, Serialize};

/// Analysis orchestration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Run the six estimators concurrently on the rayon pool
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Laplacian sharpness settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SharpnessConfig {
    /// RMS Laplacian response that maps to a score of 1.0
    pub divisor: f64,
}

impl Default for SharpnessConfig {
    fn default() -> Self {
        Self { divisor: 50.0 }
    }
}

/// Exposure settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Luminance below this counts as a dark pixel
    pub dark_threshold: f64,

    /// Luminance above this counts as a bright pixel
    pub bright_threshold: f64,

    /// Ideal mean luminance
    pub target_brightness: f64,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            dark_threshold: 50.0,
            bright_threshold: 200.0,
            target_brightness: 128.0,
        }
    }
}

/// RMS contrast settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastConfig {
    /// RMS contrast that maps to a score of 1.0
    pub divisor: f64,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self { divisor: 70.0 }
    }
}

/// Skin-tone face presence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceRegionConfig {
    /// Side of the centered sampling square, as a fraction of min(width, height)
    pub region_fraction: f64,

    /// Multiplier applied to the skin ratio before clamping.
    /// The heuristic misses a lot of real skin, so the raw ratio runs low.
    pub skin_boost: f64,
}

impl Default for FaceRegionConfig {
    fn default() -> Self {
        Self {
            region_fraction: 0.4,
            skin_boost: 3.0,
        }
    }
}

/// Windowed-variance noise settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Window half-size; windows are (2r+1)^2 and sampling centers are r apart
    pub window_radius: u32,

    /// Mean window variance that maps to a score of 0.0
    pub divisor: f64,

    /// Score reported when the image is too small for a single window
    pub empty_score: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            window_radius: 3,
            divisor: 1000.0,
            empty_score: 0.5,
        }
    }
}

/// A single row of the resolution lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionTier {
    /// Inclusive lower bound in megapixels (1 MP = 1024 * 1024 pixels)
    pub min_megapixels: f64,

    /// Score for images at or above the bound
    pub score: f64,
}

/// Megapixel threshold table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Tiers ordered from the highest bound down; first match wins
    pub tiers: Vec<ResolutionTier>,

    /// Score for images below every tier
    pub floor_score: f64,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        let tier = |min_megapixels, score| ResolutionTier {
            min_megapixels,
            score,
        };
        Self {
            tiers: vec![
                tier(2.0, 1.0),
                tier(1.0, 0.9),
                tier(0.5, 0.8),
                tier(0.3, 0.6),
            ],
            floor_score: 0.3,
        }
    }
}

/// Aggregator weights. Must be non-negative and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightsConfig {
    pub sharpness: f64,
    pub lighting: f64,
    pub contrast: f64,
    pub face_region: f64,
    pub noise_level: f64,
    pub resolution: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            sharpness: 0.25,
            lighting: 0.20,
            contrast: 0.15,
            face_region: 0.20,
            noise_level: 0.10,
            resolution: 0.10,
        }
    }
}

impl WeightsConfig {
    /// Weights in metric order: sharpness, lighting, contrast, face region,
    /// noise level, resolution.
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

    /// Sum of all six weights.
    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height), enforced by the core too
    pub max_image_dimension: u32,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 10000,
            decode_timeout_ms: 5000,
        }
    }
}

/// Input discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// File extensions picked up when scanning directories
    pub supported_formats: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            supported_formats: ["jpg", "jpeg", "png", "webp", "bmp", "gif", "tiff"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Trust service client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// Base URL of the trust calculator
    pub endpoint: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Max retry attempts for transient failures
    pub retry_attempts: u32,

    /// Base delay between retries in milliseconds
    pub retry_delay_ms: u64,

    /// Agreement rate sent alongside the fidelity score
    pub agreement_rate: f64,

    /// Witness score sent alongside the fidelity score
    pub witness_score: f64,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8001".to_string(),
            timeout_ms: 10000,
            retry_attempts: 3,
            retry_delay_ms: 500,
            agreement_rate: 0.95,
            witness_score: 0.9,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,

    /// Include the diagnostics block in reports
    pub include_diagnostics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: true,
            include_diagnostics: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
