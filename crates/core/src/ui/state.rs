//! UI state types.

use super::overlay::RegionOverlay;
use crate::coordinator::CaptureKind;
use crate::selection::SelectionOutcome;
use crate::window::{HostWindow, VisibilityGuard};
use eframe::egui;
use std::time::Instant;

/// The main egui window seen through [`HostWindow`].
///
/// egui applies viewport commands after the current frame, so visibility is
/// tracked here rather than read back from the platform.
pub struct EguiWindow {
    ctx: egui::Context,
    visible: bool,
}

impl EguiWindow {
    pub fn new(ctx: &egui::Context, visible: bool) -> Self {
        Self {
            ctx: ctx.clone(),
            visible,
        }
    }
}

impl HostWindow for EguiWindow {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.ctx
            .send_viewport_cmd_to(egui::ViewportId::ROOT, egui::ViewportCommand::Visible(visible));
        if visible {
            self.ctx
                .send_viewport_cmd_to(egui::ViewportId::ROOT, egui::ViewportCommand::Focus);
        }
        self.ctx.request_repaint();
    }
}

/// Where a capture currently stands. Each step advances on a later frame
/// so window changes have been applied by the time pixels are read.
///
/// ```text
/// Idle -> Hiding -> (Full) capture -> Idle
///                -> (Region) Selecting -> Settling -> capture -> Idle
///                                      -> cancelled -> Idle
/// ```
pub(crate) enum CaptureFlow {
    Idle,
    /// Waiting for the main window to leave the screen.
    Hiding {
        kind: CaptureKind,
        guard: VisibilityGuard<EguiWindow>,
        ready_at: Instant,
    },
    /// The overlay is open.
    Selecting {
        guard: VisibilityGuard<EguiWindow>,
        overlay: RegionOverlay,
    },
    /// Waiting for the closed overlay to leave the screen.
    Settling {
        guard: VisibilityGuard<EguiWindow>,
        outcome: SelectionOutcome,
        ready_at: Instant,
    },
}

impl CaptureFlow {
    pub fn is_idle(&self) -> bool {
        matches!(self, CaptureFlow::Idle)
    }
}

/// Modal message box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}
