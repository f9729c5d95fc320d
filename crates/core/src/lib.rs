//! Exam-Shot Core Library
//!
//! Core functionality for the Exam-Shot screenshot analyzer: capture the
//! screen or a dragged-out region, send the image to a remote analysis
//! endpoint, and show the returned questions with their correct answers.
//!
//! # Overview
//!
//! - **Screen Capture**: OS capture via [`capture`], orchestrated by the
//!   [`coordinator`] which hides the main window around every grab
//! - **Region Selection**: the [`selection`] state machine plus the
//!   [`monitor`] cancel-key watcher behind the overlay
//! - **Analysis**: the HTTP client and background dispatcher in [`analysis`]
//! - **Rendering**: [`payload`] parsing and the styled-segment [`render`]er
//! - **User Interface**: the egui main window in [`ui`]
//!
//! # Quick Start
//!
//! ```ignore
//! use exam_shot_core::{AppContext, AppPaths, ConfigStore, KeyboardHook, logging, ui};
//!
//! exam_shot_core::init();
//! let paths = AppPaths::resolve();
//! logging::init(&paths.log_settings());
//! let context = AppContext::new(ConfigStore::open_default(), paths);
//! ui::run(context, KeyboardHook::start())?;
//! ```
//!
//! # Module Structure
//!
//! - [`analysis`]: Remote analysis client and result dispatch
//! - [`capture`]: Screen capture backends
//! - [`config`]: Persistent JSON configuration
//! - [`context`]: Explicit application context
//! - [`coordinator`]: Hide, capture, restore sequencing
//! - [`error`]: Error types and result aliases
//! - [`image_processing`]: PNG/base64 encoding and file output
//! - [`logging`]: Tracing subscriber setup
//! - [`monitor`]: Cancel-key monitoring
//! - [`payload`]: Analysis response model
//! - [`render`]: Response to styled text segments
//! - [`selection`]: Region selection state machine
//! - [`theme`]: Closed set of colour themes
//! - [`ui`]: User interface
//! - [`window`]: Host window visibility guard

pub mod analysis;
pub mod capture;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod image_processing;
pub mod logging;
pub mod monitor;
pub mod payload;
pub mod render;
pub mod selection;
pub mod theme;
pub mod ui;
pub mod window;

// Re-export primary types for convenience
pub use analysis::{AnalysisClient, AnalysisDispatcher, AnalysisOutcome, AnalysisRequest};
pub use capture::{CaptureBackend, CapturedImage, ScreenCapturer};
pub use config::{Config, ConfigStore};
pub use context::{AppContext, AppPaths};
pub use coordinator::{CaptureKind, ScreenshotCoordinator};
pub use error::{AppError, Result};
pub use monitor::{CancelKeyMonitor, KeyProbe, KeyboardHook};
pub use render::{ResponseRenderer, SegmentStyle, StyledSegment};
pub use selection::{OverlayInput, RegionSelector, SelectionOutcome, SelectionRect, select_region};
pub use theme::Theme;

/// Loads variables from a `.env` file, if present, and returns its path.
///
/// Call this before building the [`AppContext`] so `EXAM_SHOT_CONFIG_DIR`
/// and `RUST_LOG` from the file are seen. Logging is not up yet at that
/// point, so the caller reports the path afterwards.
pub fn init() -> Option<std::path::PathBuf> {
    dotenvy::dotenv().ok()
}
