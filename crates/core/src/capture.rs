//! Screen capture functionality.
//!
//! The [`CaptureBackend`] trait is the narrow seam between the coordinator
//! and the OS: grab the whole screen, or grab a rectangle of it.
//! [`ScreenCapturer`] implements it on top of the `screenshots` crate.
//!
//! # Example
//!
//! ```ignore
//! use exam_shot_core::capture::{CaptureBackend, ScreenCapturer};
//!
//! let capturer = ScreenCapturer::new()?;
//! let screenshot = capturer.capture_full()?;
//! println!("{}x{}", screenshot.width(), screenshot.height());
//! ```

use crate::error::{AppError, Result};
use crate::selection::SelectionRect;
use image::RgbaImage;
use screenshots::Screen;

/// A captured screenshot: an RGBA pixel buffer and its dimensions.
///
/// Cloning copies the pixels, which is how the preview gets its own copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedImage {
    pixels: RgbaImage,
}

impl CapturedImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Builds an image from raw RGBA bytes, failing if the length does not
    /// match `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        RgbaImage::from_raw(width, height, rgba)
            .map(Self::new)
            .ok_or_else(|| AppError::capture("Failed to create image buffer"))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// OS-level screen grabbing.
pub trait CaptureBackend {
    /// Captures the whole (primary) screen.
    fn capture_full(&self) -> Result<CapturedImage>;

    /// Captures the given rectangle, in screen coordinates.
    fn capture_area(&self, rect: &SelectionRect) -> Result<CapturedImage>;
}

/// Screen capturer backed by the `screenshots` crate.
pub struct ScreenCapturer {
    screens: Vec<Screen>,
}

impl ScreenCapturer {
    /// Initializes the screen capturer by detecting available screens.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ScreenCapture`] if enumeration fails or no screen
    /// is detected.
    pub fn new() -> Result<Self> {
        let screens = Screen::all()
            .map_err(|e| AppError::capture(format!("Failed to enumerate screens: {}", e)))?;

        if screens.is_empty() {
            return Err(AppError::capture("No screens detected"));
        }

        Ok(Self { screens })
    }

    /// Lists available screens with their dimensions and scale factor.
    pub fn list_screens(&self) -> Vec<String> {
        self.screens
            .iter()
            .enumerate()
            .map(|(i, s)| {
                format!(
                    "Monitor {}: {}x{} (scale: {})",
                    i, s.display_info.width, s.display_info.height, s.display_info.scale_factor
                )
            })
            .collect()
    }

    fn primary(&self) -> Result<&Screen> {
        self.screens
            .iter()
            .find(|s| s.display_info.is_primary)
            .or_else(|| self.screens.first())
            .ok_or_else(|| AppError::capture("No screens available"))
    }
}

impl CaptureBackend for ScreenCapturer {
    fn capture_full(&self) -> Result<CapturedImage> {
        let captured = self
            .primary()?
            .capture()
            .map_err(|e| AppError::capture(format!("Failed to capture screen: {}", e)))?;

        // screenshots ships its own `image` version, so go through raw RGBA
        let (width, height) = (captured.width(), captured.height());
        CapturedImage::from_raw(width, height, captured.into_raw())
    }

    fn capture_area(&self, rect: &SelectionRect) -> Result<CapturedImage> {
        if rect.is_empty() {
            return Err(AppError::capture("Capture region is empty"));
        }
        let captured = self
            .primary()?
            .capture_area(rect.left, rect.top, rect.width(), rect.height())
            .map_err(|e| AppError::capture(format!("Failed to capture region: {}", e)))?;

        let (width, height) = (captured.width(), captured.height());
        CapturedImage::from_raw(width, height, captured.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_checks_buffer_length() {
        assert!(CapturedImage::from_raw(2, 2, vec![0; 16]).is_ok());
        assert!(CapturedImage::from_raw(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn clones_do_not_alias() {
        let original = CapturedImage::from_raw(1, 1, vec![1, 2, 3, 4]).unwrap();
        let mut copy = original.clone();
        copy.pixels.put_pixel(0, 0, image::Rgba([9, 9, 9, 9]));
        assert_eq!(original.as_raw(), &[1, 2, 3, 4]);
    }

    #[test]
    #[ignore = "requires a graphical display"]
    fn captures_primary_screen() {
        let capturer = ScreenCapturer::new().unwrap();
        let shot = capturer.capture_full().unwrap();
        assert!(shot.width() > 0 && shot.height() > 0);
    }
}
