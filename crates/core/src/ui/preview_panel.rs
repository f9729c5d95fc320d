//! Preview panel: capture buttons and the current screenshot.

use super::widgets::{ControlStyle, styled_button_enabled};
use crate::capture::CapturedImage;
use crate::image_processing::ImageProcessor;
use eframe::egui;

const PREVIEW_PADDING: f32 = 20.0;

/// Button pressed in the preview panel this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewAction {
    FullScreen,
    SelectRegion,
    Analyze,
    Clear,
}

#[derive(Default)]
pub struct PreviewPanel {
    texture: Option<egui::TextureHandle>,
}

impl PreviewPanel {
    /// Uploads a copy of `image` for display.
    pub fn set_image(&mut self, ctx: &egui::Context, image: &CapturedImage) {
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        self.texture = Some(ctx.load_texture("preview", color_image, egui::TextureOptions::LINEAR));
    }

    pub fn clear(&mut self) {
        self.texture = None;
    }

    /// Draws the panel. Buttons are disabled while `capture_enabled` is false.
    pub fn show(&mut self, ui: &mut egui::Ui, capture_enabled: bool) -> Option<PreviewAction> {
        let mut action = None;
        ui.horizontal(|ui| {
            ui.heading("Preview");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // Right-to-left: last button first.
                let buttons = [
                    (ControlStyle::Info, "Clear", PreviewAction::Clear),
                    (ControlStyle::Warning, "Analyze", PreviewAction::Analyze),
                    (ControlStyle::Primary, "Select Region", PreviewAction::SelectRegion),
                    (ControlStyle::Success, "Full Screen", PreviewAction::FullScreen),
                ];
                for (style, label, pressed) in buttons {
                    if styled_button_enabled(ui, capture_enabled, style, label).clicked() {
                        action = Some(pressed);
                    }
                }
            });
        });
        ui.separator();

        let available = ui.available_size();
        ui.centered_and_justified(|ui| match &self.texture {
            Some(texture) => {
                let [w, h] = texture.size();
                let (w, h) = ImageProcessor::fit_within(
                    (w as f32, h as f32),
                    (available.x - PREVIEW_PADDING, available.y - PREVIEW_PADDING),
                );
                ui.add(egui::Image::new((texture.id(), egui::vec2(w, h))));
            }
            None => {
                ui.weak("No screenshot yet");
            }
        });

        action
    }
}
