//! Screenshot orchestration.
//!
//! [`ScreenshotCoordinator`] owns the current screenshot and sequences every
//! capture as hide window → (select region) → grab pixels → restore window.
//! The restore is tied to a [`VisibilityGuard`], so it also happens when the
//! backend fails or the selection is cancelled.
//!
//! The phases are exposed separately ([`begin`](ScreenshotCoordinator::begin),
//! [`finish_full`](ScreenshotCoordinator::finish_full),
//! [`finish_region`](ScreenshotCoordinator::finish_region)) because a
//! frame-driven UI has to let the hide take effect between them. The
//! blocking [`capture_full`](ScreenshotCoordinator::capture_full) and
//! [`capture_region`](ScreenshotCoordinator::capture_region) chain the
//! phases for callers whose window reacts immediately.

use crate::capture::{CaptureBackend, CapturedImage};
use crate::error::{AppError, Result};
use crate::image_processing::ImageProcessor;
use crate::selection::SelectionOutcome;
use crate::window::{HostWindow, VisibilityGuard};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Time given to the window system to take a hidden window off screen.
pub const HIDE_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Which kind of capture produced the current image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureKind {
    Full,
    Region,
}

impl CaptureKind {
    /// File name prefix used when the capture is saved to disk.
    pub fn file_prefix(self) -> &'static str {
        match self {
            CaptureKind::Full => "screenshot",
            CaptureKind::Region => "region_screenshot",
        }
    }
}

/// Owns the capture backend and the most recent screenshot.
pub struct ScreenshotCoordinator<B: CaptureBackend> {
    backend: B,
    image: Option<CapturedImage>,
    kind: Option<CaptureKind>,
    screenshots_dir: PathBuf,
    settle_delay: Duration,
}

impl<B: CaptureBackend> ScreenshotCoordinator<B> {
    pub fn new(backend: B, screenshots_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            image: None,
            kind: None,
            screenshots_dir: screenshots_dir.into(),
            settle_delay: HIDE_SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Hides the host window. Dropping the guard shows it again.
    pub fn begin<W: HostWindow>(&self, window: W) -> VisibilityGuard<W> {
        VisibilityGuard::hide(window)
    }

    /// Grabs the whole screen, restores the window, and stores the result.
    ///
    /// On failure the window is still restored and the previous image kept.
    pub fn finish_full<W: HostWindow>(&mut self, guard: VisibilityGuard<W>) -> Result<&CapturedImage> {
        let captured = self.backend.capture_full();
        drop(guard);
        self.store(captured, CaptureKind::Full)
    }

    /// Completes a region capture once the selector has decided.
    ///
    /// Returns `Ok(None)` for a cancelled selection, leaving any previous
    /// image untouched.
    pub fn finish_region<W: HostWindow>(
        &mut self,
        guard: VisibilityGuard<W>,
        outcome: SelectionOutcome,
    ) -> Result<Option<&CapturedImage>> {
        let SelectionOutcome::Confirmed(rect) = outcome else {
            drop(guard);
            tracing::info!("Region selection cancelled or invalid");
            return Ok(None);
        };

        let captured = self.backend.capture_area(&rect);
        drop(guard);
        tracing::info!(
            "Captured region: ({}, {}, {}, {})",
            rect.left,
            rect.top,
            rect.right,
            rect.bottom
        );
        self.store(captured, CaptureKind::Region).map(Some)
    }

    /// Blocking full-screen capture.
    ///
    /// For hosts whose window hides as soon as it is asked to. The egui app
    /// applies visibility only between frames, so it drives
    /// [`begin`](Self::begin) and [`finish_full`](Self::finish_full) across
    /// frames instead.
    pub fn capture_full<W: HostWindow>(&mut self, window: W) -> Result<&CapturedImage> {
        let guard = self.begin(window);
        if guard.will_restore() {
            thread::sleep(self.settle_delay);
        }
        self.finish_full(guard)
    }

    /// Blocking region capture; `select` runs the interactive selection while
    /// the window is hidden. The frame-driven counterpart is
    /// [`begin`](Self::begin) followed by [`finish_region`](Self::finish_region).
    pub fn capture_region<W, F>(&mut self, window: W, select: F) -> Result<Option<&CapturedImage>>
    where
        W: HostWindow,
        F: FnOnce() -> SelectionOutcome,
    {
        let guard = self.begin(window);
        if guard.will_restore() {
            thread::sleep(self.settle_delay);
        }
        let outcome = select();
        self.finish_region(guard, outcome)
    }

    fn store(&mut self, captured: Result<CapturedImage>, kind: CaptureKind) -> Result<&CapturedImage> {
        match captured {
            Ok(image) => {
                tracing::info!("Stored {:?} capture ({}x{})", kind, image.width(), image.height());
                self.kind = Some(kind);
                Ok(self.image.insert(image))
            }
            Err(e) => {
                tracing::error!("Capture failed: {}", e);
                Err(e)
            }
        }
    }

    /// The current screenshot, if any.
    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_ref()
    }

    pub fn kind(&self) -> Option<CaptureKind> {
        self.kind
    }

    /// Drops the stored screenshot.
    pub fn clear(&mut self) {
        self.image = None;
        self.kind = None;
    }

    /// Encodes the current screenshot for transport.
    pub fn encode(&self) -> Result<String> {
        let image = self.image.as_ref().ok_or(AppError::NoImage)?;
        ImageProcessor::encode_base64(image)
    }

    /// Saves the current screenshot under the prefix of its capture kind.
    pub fn save_to_disk(&self) -> Result<PathBuf> {
        let image = self.image.as_ref().ok_or(AppError::NoImage)?;
        let prefix = self.kind.unwrap_or(CaptureKind::Full).file_prefix();
        ImageProcessor::save_png(image, &self.screenshots_dir, prefix, chrono::Local::now())
    }
}
