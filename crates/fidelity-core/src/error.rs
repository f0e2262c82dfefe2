//! Error types for the fidelity scoring workspace.
//!
//! Errors are organized by stage. The scoring core only ever produces
//! [`AnalysisError`]; the other enums belong to the collaborators around it
//! (config loading, the decode adapter and the trust service client).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for fidelity operations.
#[derive(Error, Debug)]
pub enum FidelityError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed pixel buffer handed to the scoring core
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Loading or decoding an input image failed
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Talking to the trust service failed
    #[error("Trust service error: {0}")]
    Trust(#[from] TrustError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Input-validation failures recognized by the scoring core.
///
/// Raised before any estimator runs. Degenerate but well-formed images
/// (1x1, all black) are not errors; each estimator absorbs them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Width or height is zero
    #[error("Invalid dimensions {width}x{height}: both must be > 0")]
    ZeroDimension { width: u32, height: u32 },

    /// Byte length does not match width * height * 4
    #[error("Buffer length mismatch for {width}x{height}: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Width or height exceeds the configured ceiling
    #[error("Image too large: {width}x{height} > {max_dim}")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_dim: u32,
    },
}

/// Errors from the decode adapter that turns image files into pixel buffers.
#[derive(Error, Debug)]
pub enum InputError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Decoding did not finish in time
    #[error("Decode timed out for {path} after {timeout_ms}ms")]
    Timeout { path: PathBuf, timeout_ms: u64 },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Decoded image could not be turned into a valid pixel buffer
    #[error("Invalid pixel data for {path}: {source}")]
    InvalidPixels {
        path: PathBuf,
        #[source]
        source: AnalysisError,
    },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Trust service client errors.
#[derive(Error, Debug)]
pub enum TrustError {
    /// Request failed, or the service answered with a non-success status
    #[error("Trust service request failed: {message}")]
    Http {
        message: String,
        /// HTTP status code, when the service responded at all
        status_code: Option<u16>,
    },

    /// Request did not complete in time
    #[error("Trust service timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Response body did not match the expected contract
    #[error("Invalid trust service response: {0}")]
    InvalidResponse(String),

    /// Request values outside the accepted [0, 1] range
    #[error("Invalid trust request: {0}")]
    InvalidRequest(String),
}

/// Convenience type alias for fidelity results.
pub type Result<T> = std::result::Result<T, FidelityError>;

/// Convenience type alias for scoring-core results.
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
