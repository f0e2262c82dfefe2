//! File-to-report orchestration: decode, then score.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::error::{FidelityError, Result};
use crate::quality::QualityAnalyzer;
use crate::types::AnalysisReport;

use super::decode::{format_to_string, ImageDecoder};
use super::discovery::{DiscoveredFile, FileDiscovery};

/// Runs the decode adapter and the scoring core for image files.
pub struct ImageProcessor {
    decoder: ImageDecoder,
    analyzer: Arc<QualityAnalyzer>,
    discovery: FileDiscovery,
    include_diagnostics: bool,
}

impl ImageProcessor {
    pub fn new(config: &Config) -> Self {
        Self::with_analyzer(config, QualityAnalyzer::new(config))
    }

    /// Use a preconfigured analyzer, e.g. one with a custom face detector.
    pub fn with_analyzer(config: &Config, analyzer: QualityAnalyzer) -> Self {
        Self {
            decoder: ImageDecoder::new(config.limits.clone()),
            analyzer: Arc::new(analyzer),
            discovery: FileDiscovery::new(config.input.clone()),
            include_diagnostics: config.output.include_diagnostics,
        }
    }

    /// Decode and score a single image file.
    ///
    /// Scoring runs on the blocking pool since it is pure CPU work.
    pub async fn process(&self, path: &Path) -> Result<AnalysisReport> {
        let start = Instant::now();
        tracing::debug!("Processing: {:?}", path);

        let decoded = self.decoder.decode(path).await?;
        let decode_time = start.elapsed();
        tracing::trace!(
            "  Decode: {:?} ({}, {} bytes)",
            decode_time,
            format_to_string(decoded.format),
            decoded.file_size
        );

        let (width, height) = (decoded.buffer.width(), decoded.buffer.height());
        let analyzer = Arc::clone(&self.analyzer);
        let buffer = decoded.buffer;
        let score = tokio::task::spawn_blocking(move || analyzer.analyze(&buffer))
            .await
            .map_err(|e| FidelityError::Io(std::io::Error::other(e)))??;

        tracing::debug!(
            "Scored {:?} in {:?} ({}x{}): {:.3}",
            path,
            start.elapsed(),
            width,
            height,
            score.aggregate
        );

        Ok(AnalysisReport::new(
            path,
            width,
            height,
            &score,
            self.include_diagnostics,
        ))
    }

    /// Discover all image files at a path.
    pub fn discover(&self, path: &Path) -> Vec<DiscoveredFile> {
        self.discovery.discover(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use image::{Rgba, RgbaImage};

    #[tokio::test]
    async fn test_process_uniform_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        RgbaImage::from_pixel(20, 20, Rgba([128, 128, 128, 255]))
            .save(&path)
            .unwrap();

        let processor = ImageProcessor::new(&Config::default());
        let report = processor.process(&path).await.unwrap();
        assert_eq!(report.file_name, "gray.png");
        assert_eq!((report.width, report.height), (20, 20));
        assert_eq!(report.metrics.sharpness, 0.0);
        assert_eq!(report.metrics.noise_level, 1.0);
        assert!(report.diagnostics.is_some());
        assert!(report.trust.is_none());
    }

    #[tokio::test]
    async fn test_process_without_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let mut config = Config::default();
        config.output.include_diagnostics = false;
        let report = ImageProcessor::new(&config).process(&path).await.unwrap();
        assert!(report.diagnostics.is_none());
        assert_eq!(report.metrics.lighting, 0.0);
    }

    #[tokio::test]
    async fn test_process_missing_file() {
        let processor = ImageProcessor::new(&Config::default());
        let err = processor
            .process(Path::new("/nowhere/face.png"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FidelityError::Input(InputError::FileNotFound(_))
        ));
    }
}
