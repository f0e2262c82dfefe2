//! Decode adapter: image file bytes to [`PixelBuffer`], with limits and timeout.

use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::InputError;
use crate::types::PixelBuffer;

/// Image decoder with configurable limits and timeout.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// RGBA pixels ready for scoring
    pub buffer: PixelBuffer,
    /// Detected image format
    pub format: ImageFormat,
    /// Original file size in bytes
    pub file_size: u64,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Read and decode an image file.
    ///
    /// Checks existence and file size before reading anything.
    pub async fn decode(&self, path: &Path) -> Result<DecodedImage, InputError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|_| InputError::FileNotFound(path.to_path_buf()))?;

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(InputError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| InputError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {}", e),
        })?;
        self.decode_from_bytes(bytes, path).await
    }

    /// Decode an in-memory image on the blocking pool, bounded by the
    /// configured timeout. `path` is only used for error context.
    pub async fn decode_from_bytes(
        &self,
        bytes: Vec<u8>,
        path: &Path,
    ) -> Result<DecodedImage, InputError> {
        let path_owned = path.to_path_buf();
        let max_dim = self.limits.max_image_dimension;
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);

        let decode_result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || Self::decode_bytes_sync(bytes, &path_owned, max_dim))
                .await
        })
        .await;

        match decode_result {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(InputError::Decode {
                path: path.to_path_buf(),
                message: format!("Task join error: {}", e),
            }),
            Err(_) => Err(InputError::Timeout {
                path: path.to_path_buf(),
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }

    /// Synchronous decode. Dimensions are checked from the header before the
    /// full decode so oversized images are rejected cheaply.
    fn decode_bytes_sync(
        bytes: Vec<u8>,
        path: &Path,
        max_dim: u32,
    ) -> Result<DecodedImage, InputError> {
        let decode_err = |message: String| InputError::Decode {
            path: path.to_path_buf(),
            message,
        };
        let file_size = bytes.len() as u64;

        let (width, height) = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|e| decode_err(format!("Cannot detect image format: {}", e)))?
            .into_dimensions()
            .map_err(|e| decode_err(e.to_string()))?;
        if width > max_dim || height > max_dim {
            return Err(InputError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_dim,
            });
        }

        let reader = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|e| decode_err(format!("Cannot detect image format: {}", e)))?;
        let format = reader
            .format()
            .ok_or_else(|| decode_err("Unrecognized image format".to_string()))?;
        let rgba = reader
            .decode()
            .map_err(|e| decode_err(e.to_string()))?
            .to_rgba8();

        let (width, height) = rgba.dimensions();
        let buffer =
            PixelBuffer::new(width, height, rgba.into_raw()).map_err(|source| {
                InputError::InvalidPixels {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

        Ok(DecodedImage {
            buffer,
            format,
            file_size,
        })
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 90, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_format_to_string() {
        assert_eq!(format_to_string(ImageFormat::Jpeg), "jpeg");
        assert_eq!(format_to_string(ImageFormat::Png), "png");
        assert_eq!(format_to_string(ImageFormat::WebP), "webp");
    }

    #[tokio::test]
    async fn test_decode_png_into_rgba_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "face.png", 12, 8);

        let decoder = ImageDecoder::new(LimitsConfig::default());
        let decoded = decoder.decode(&path).await.unwrap();
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!(decoded.buffer.width(), 12);
        assert_eq!(decoded.buffer.height(), 8);
        assert_eq!(decoded.buffer.rgb(5, 3), [5, 3, 90]);
        assert!(decoded.file_size > 0);
    }

    #[test]
    fn test_format_detected_by_content() {
        let dir = tempfile::tempdir().unwrap();
        let png = write_png(dir.path(), "real.png", 4, 4);
        let misnamed = dir.path().join("misnamed.jpg");
        std::fs::copy(&png, &misnamed).unwrap();

        let bytes = std::fs::read(&misnamed).unwrap();
        let result = ImageDecoder::decode_bytes_sync(bytes, &misnamed, 100).unwrap();
        assert_eq!(result.format, ImageFormat::Png);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let err = decoder
            .decode(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, InputError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_garbage_bytes_fail_to_decode() {
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let err = decoder
            .decode_from_bytes(b"not an image at all".to_vec(), Path::new("junk.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, InputError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_dimension_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "wide.png", 20, 5);

        let limits = LimitsConfig {
            max_image_dimension: 16,
            ..LimitsConfig::default()
        };
        let err = ImageDecoder::new(limits).decode(&path).await.unwrap_err();
        assert!(matches!(
            err,
            InputError::ImageTooLarge {
                width: 20,
                height: 5,
                max_dim: 16,
                ..
            }
        ));
    }
}
