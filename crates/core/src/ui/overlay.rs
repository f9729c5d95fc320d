//! Full-screen region selection overlay.
//!
//! Runs as an immediate egui viewport on top of everything else. Pointer
//! input, the cancel button, Escape and the global cancel-key monitor all
//! feed the same [`RegionSelector`]; the overlay closes as soon as it has
//! an outcome.

use super::rendering::{
    OVERLAY_FILL, draw_selection_border, draw_selection_overlay, to_egui_rect, to_pixel,
};
use crate::monitor::{CancelKeyMonitor, KeyProbe};
use crate::selection::{OverlayInput, RegionSelector, SelectionOutcome};
use eframe::egui;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

const INSTRUCTIONS: &str = "Click and drag to select a region. Press ESC to cancel.";
const CANCEL_LABEL: &str = "CANCEL (ESC)";

pub(crate) struct RegionOverlay {
    selector: RegionSelector,
    monitor: CancelKeyMonitor,
    events: Receiver<OverlayInput>,
    viewport_id: egui::ViewportId,
}

impl RegionOverlay {
    /// Starts the cancel-key monitor; the overlay itself appears on the next
    /// [`show`](Self::show).
    pub fn open(ctx: &egui::Context, probe: Arc<dyn KeyProbe>) -> Self {
        let repaint = ctx.clone();
        let (monitor, events) =
            CancelKeyMonitor::with_channel(probe, Box::new(move || repaint.request_repaint()));
        tracing::info!("Region overlay opened");
        Self {
            selector: RegionSelector::new(),
            monitor,
            events,
            viewport_id: egui::ViewportId::from_hash_of("region_overlay"),
        }
    }

    /// Draws one overlay frame. Returns the outcome once decided; the
    /// viewport closes because the caller stops showing it.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<SelectionOutcome> {
        let builder = egui::ViewportBuilder::default()
            .with_title("Select Region")
            .with_fullscreen(true)
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top();

        ctx.show_viewport_immediate(self.viewport_id, builder, |ctx, class| {
            if class == egui::ViewportClass::Embedded {
                tracing::warn!("Platform cannot open an overlay window; cancelling selection");
                self.selector.handle(OverlayInput::Closed);
                return;
            }
            self.frame(ctx);
        });

        let outcome = self.selector.outcome();
        if outcome.is_some() {
            self.monitor.stop();
        }
        outcome
    }

    fn frame(&mut self, ctx: &egui::Context) {
        while let Ok(input) = self.events.try_recv() {
            self.selector.handle(input);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.selector.handle(OverlayInput::CancelKey);
        }
        if ctx.input(|i| i.viewport().close_requested()) {
            self.selector.handle(OverlayInput::Closed);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let screen_rect = ui.max_rect();
                let response =
                    ui.interact(screen_rect, ui.id().with("drag"), egui::Sense::click_and_drag());
                self.feed_pointer(ctx, &response);

                let selection = self.selector.current_rect().map(to_egui_rect);
                draw_selection_overlay(ui.painter(), screen_rect, selection, OVERLAY_FILL);
                if let Some(selection) = selection {
                    draw_selection_border(ui.painter(), selection);
                }

                self.controls(ctx);
            });
    }

    fn feed_pointer(&mut self, ctx: &egui::Context, response: &egui::Response) {
        // Hit-testing keeps presses on the controls out of the selection.
        let frame = PointerFrame::read(ctx, response.contains_pointer());
        for input in frame.inputs() {
            self.selector.handle(input);
        }
    }

    fn controls(&mut self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("overlay_controls"))
            .fixed_pos(egui::pos2(10.0, 10.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::BLACK)
                    .inner_margin(6.0)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(INSTRUCTIONS).color(egui::Color32::WHITE));
                    });
                ui.add_space(8.0);
                let cancel = egui::Button::new(
                    egui::RichText::new(CANCEL_LABEL)
                        .color(egui::Color32::WHITE)
                        .strong()
                        .size(16.0),
                )
                .fill(egui::Color32::RED)
                .min_size(egui::vec2(140.0, 34.0));
                if ui.add(cancel).clicked() {
                    self.selector.handle(OverlayInput::CancelButton);
                }
            });
    }
}

/// Primary-button activity seen during one overlay frame.
///
/// Read from raw pointer state rather than egui's drag detection, which only
/// fires past the click threshold and would swallow a press and release
/// that never moved.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct PointerFrame {
    /// Where a press started this frame, if it landed on the overlay.
    pressed_at: Option<egui::Pos2>,
    position: Option<egui::Pos2>,
    down: bool,
    released: bool,
}

impl PointerFrame {
    fn read(ctx: &egui::Context, on_overlay: bool) -> Self {
        ctx.input(|i| {
            let pointer = &i.pointer;
            let pressed_at = if pointer.primary_pressed() && on_overlay {
                pointer.press_origin().or(pointer.latest_pos())
            } else {
                None
            };
            Self {
                pressed_at,
                position: pointer.latest_pos(),
                down: pointer.primary_down(),
                released: pointer.primary_released(),
            }
        })
    }

    /// Selector inputs for this frame, in press, move, release order.
    fn inputs(&self) -> Vec<OverlayInput> {
        let mut inputs = Vec::with_capacity(3);
        if let Some(origin) = self.pressed_at {
            let (x, y) = to_pixel(origin);
            inputs.push(OverlayInput::PointerDown { x, y });
        }
        let Some(pos) = self.position.or(self.pressed_at) else {
            return inputs;
        };
        let (x, y) = to_pixel(pos);
        if self.down && !self.released {
            inputs.push(OverlayInput::PointerMove { x, y });
        }
        if self.released {
            inputs.push(OverlayInput::PointerUp { x, y });
        }
        inputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionRect;

    fn run(frames: &[PointerFrame]) -> Option<SelectionOutcome> {
        let mut selector = RegionSelector::new();
        for frame in frames {
            for input in frame.inputs() {
                selector.handle(input);
            }
        }
        selector.outcome()
    }

    #[test]
    fn click_without_move_cancels() {
        let at = Some(egui::pos2(50.0, 60.0));
        let press = PointerFrame { pressed_at: at, position: at, down: true, released: false };
        let release = PointerFrame { pressed_at: None, position: at, down: false, released: true };
        assert_eq!(run(&[press, release]), Some(SelectionOutcome::Cancelled));
    }

    #[test]
    fn press_and_release_in_one_frame_cancels() {
        let at = Some(egui::pos2(50.0, 60.0));
        let click = PointerFrame { pressed_at: at, position: at, down: false, released: true };
        assert_eq!(
            click.inputs(),
            vec![
                OverlayInput::PointerDown { x: 50, y: 60 },
                OverlayInput::PointerUp { x: 50, y: 60 },
            ]
        );
        assert_eq!(run(&[click]), Some(SelectionOutcome::Cancelled));
    }

    #[test]
    fn drag_confirms_from_press_origin() {
        let press = PointerFrame {
            pressed_at: Some(egui::pos2(10.0, 20.0)),
            position: Some(egui::pos2(12.0, 21.0)),
            down: true,
            released: false,
        };
        let drag = PointerFrame { position: Some(egui::pos2(150.4, 90.6)), down: true, ..Default::default() };
        let release = PointerFrame { position: Some(egui::pos2(200.0, 120.0)), released: true, ..Default::default() };
        assert_eq!(
            run(&[press, drag, release]),
            Some(SelectionOutcome::Confirmed(SelectionRect::from_corners(10, 20, 200, 120)))
        );
    }

    #[test]
    fn release_without_press_on_overlay_is_ignored() {
        // A click on the cancel control never reports a press here.
        let release = PointerFrame { position: Some(egui::pos2(20.0, 20.0)), released: true, ..Default::default() };
        assert_eq!(run(&[release]), None);
    }

    #[test]
    fn idle_frame_sends_nothing() {
        let hover = PointerFrame { position: Some(egui::pos2(5.0, 5.0)), ..Default::default() };
        assert!(hover.inputs().is_empty());
    }
}
