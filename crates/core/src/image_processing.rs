//! Image encoding and persistence utilities.
//!
//! The remote analysis endpoint expects a PNG wrapped in a data URL
//! (`data:image/png;base64,<...>`). This module produces that encoding,
//! decodes it again, writes timestamped PNG files, and computes preview
//! sizes that keep the aspect ratio.

use crate::capture::CapturedImage;
use crate::error::{AppError, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Local};
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Prefix of every encoded image.
pub const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Smallest container edge considered laid out; below this the preview
/// falls back to [`DEFAULT_PREVIEW_SIZE`].
const MIN_CONTAINER_EDGE: f32 = 100.0;
const DEFAULT_PREVIEW_SIZE: (f32, f32) = (450.0, 280.0);

/// Image processing helpers.
pub struct ImageProcessor;

impl ImageProcessor {
    /// Encodes an image as a PNG data URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ImageProcessing`] if PNG encoding fails.
    pub fn encode_base64(image: &CapturedImage) -> Result<String> {
        let png = Self::encode_png(image)?;
        Ok(format!("{}{}", DATA_URL_PREFIX, BASE64.encode(png)))
    }

    fn encode_png(image: &CapturedImage) -> Result<Vec<u8>> {
        let mut buffer: Vec<u8> = Vec::new();
        image
            .pixels()
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|e| AppError::image(format!("Failed to encode image: {}", e)))?;
        Ok(buffer)
    }

    /// Decodes a data URL produced by [`encode_base64`](Self::encode_base64).
    pub fn decode_base64(data_url: &str) -> Result<CapturedImage> {
        let payload = data_url
            .strip_prefix(DATA_URL_PREFIX)
            .ok_or_else(|| AppError::image("Missing PNG data URL prefix"))?;
        let bytes = BASE64
            .decode(payload)
            .map_err(|e| AppError::image(format!("Invalid base64 payload: {}", e)))?;
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .map_err(|e| AppError::image(format!("Failed to decode image: {}", e)))?;
        Ok(CapturedImage::new(DynamicImage::into_rgba8(decoded)))
    }

    /// `<prefix>_<YYYYMMDD_HHMMSS>.png`
    pub fn timestamped_file_name(prefix: &str, at: DateTime<Local>) -> String {
        format!("{}_{}.png", prefix, at.format("%Y%m%d_%H%M%S"))
    }

    /// Writes the image as PNG into `dir`, named after `prefix` and `at`.
    pub fn save_png(
        image: &CapturedImage,
        dir: &Path,
        prefix: &str,
        at: DateTime<Local>,
    ) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(Self::timestamped_file_name(prefix, at));
        image
            .pixels()
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| AppError::image(format!("Failed to save image: {}", e)))?;
        tracing::info!("Image saved to: {}", path.display());
        Ok(path)
    }

    /// Scales `image_size` to fit `container` without changing its aspect
    /// ratio. A container that is not laid out yet gets a default size.
    pub fn fit_within(image_size: (f32, f32), container: (f32, f32)) -> (f32, f32) {
        let (image_w, image_h) = image_size;
        if image_w <= 0.0 || image_h <= 0.0 {
            return (0.0, 0.0);
        }

        let container_w = if container.0 < MIN_CONTAINER_EDGE {
            DEFAULT_PREVIEW_SIZE.0
        } else {
            container.0
        };
        let container_h = if container.1 < MIN_CONTAINER_EDGE {
            DEFAULT_PREVIEW_SIZE.1
        } else {
            container.1
        };

        let image_aspect = image_w / image_h;
        if image_aspect >= container_w / container_h {
            (container_w, container_w / image_aspect)
        } else {
            (container_h * image_aspect, container_h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn gradient(width: u32, height: u32) -> CapturedImage {
        let pixels = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x * 7) as u8, (y * 13) as u8, (x + y) as u8, 255 - x as u8])
        });
        CapturedImage::new(pixels)
    }

    #[test]
    fn encoding_has_data_url_prefix() {
        let encoded = ImageProcessor::encode_base64(&gradient(4, 3)).unwrap();
        assert!(encoded.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn decode_restores_the_exact_pixels() {
        let image = gradient(17, 9);
        let encoded = ImageProcessor::encode_base64(&image).unwrap();
        assert_eq!(ImageProcessor::decode_base64(&encoded).unwrap(), image);
    }

    #[test]
    fn decode_rejects_foreign_input() {
        assert!(ImageProcessor::decode_base64("data:image/jpeg;base64,AAAA").is_err());
        assert!(ImageProcessor::decode_base64("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn file_name_carries_prefix_and_timestamp() {
        let at = Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(
            ImageProcessor::timestamped_file_name("region_screenshot", at),
            "region_screenshot_20240506_070809.png"
        );
    }

    #[test]
    fn saves_png_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let at = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let path = ImageProcessor::save_png(&gradient(3, 3), dir.path(), "screenshot", at).unwrap();

        assert_eq!(path.file_name().unwrap(), "screenshot_20240102_030405.png");
        let reloaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(reloaded.dimensions(), (3, 3));
    }

    #[test]
    fn fit_keeps_aspect_ratio() {
        assert_eq!(ImageProcessor::fit_within((1600.0, 800.0), (960.0, 900.0)), (960.0, 480.0));
        assert_eq!(ImageProcessor::fit_within((1000.0, 2000.0), (800.0, 500.0)), (250.0, 500.0));
    }

    #[test]
    fn fit_uses_defaults_for_tiny_containers() {
        let (w, h) = ImageProcessor::fit_within((900.0, 300.0), (10.0, 10.0));
        assert_eq!((w, h), (450.0, 150.0));
    }
}
