//! User interface for exam-shot.
//!
//! One eframe window with a preview panel on the left and the answer panel
//! on the right. Region selection opens a second, full-screen viewport on
//! top of everything while the main window is hidden.
//!
//! # Architecture
//!
//! The UI is split into focused submodules:
//! - [`app`]: Main window and the per-frame capture and analysis flow
//! - [`state`]: Capture flow states and the egui host window
//! - [`overlay`]: Full-screen region selection viewport
//! - [`rendering`]: Drawing helpers for the overlay
//! - [`preview_panel`] / [`answer_panel`]: The two main panels
//! - [`settings`]: Settings dialog
//! - [`widgets`]: Styled buttons
//!
//! # Usage
//!
//! ```ignore
//! use exam_shot_core::{ui, AppContext, KeyboardHook};
//!
//! ui::run(context, KeyboardHook::start())?;
//! ```

mod answer_panel;
mod app;
mod overlay;
mod preview_panel;
mod rendering;
mod settings;
mod state;
mod widgets;

// Public API exports
pub use answer_panel::AnswerPanel;
pub use app::{APP_NAME, ExamShotApp};
pub use settings::{SettingsDialog, SettingsResult, SettingsTab};
pub use state::EguiWindow;
pub use widgets::{ControlStyle, styled_button};

use crate::capture::ScreenCapturer;
use crate::context::AppContext;
use crate::error::{AppError, Result};
use crate::monitor::KeyProbe;
use eframe::egui;
use std::sync::Arc;

/// Opens the main window and blocks until it is closed.
///
/// # Errors
/// Returns an error if no screen can be captured or the window cannot be
/// created.
pub fn run(context: AppContext, probe: impl KeyProbe + 'static) -> Result<()> {
    let capturer = ScreenCapturer::new()?;
    for screen in capturer.list_screens() {
        tracing::info!("{}", screen);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    let probe: Arc<dyn KeyProbe> = Arc::new(probe);
    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(ExamShotApp::new(context, capturer, probe)) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| AppError::ui(format!("Failed to run UI: {}", e)))?;

    tracing::info!("Application closed");
    Ok(())
}
