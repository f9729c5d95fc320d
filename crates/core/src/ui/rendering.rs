//! Drawing helpers for the region overlay.

use crate::selection::SelectionRect;
use eframe::egui;

/// Fill painted over the screen while selecting.
pub const OVERLAY_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(38, 38, 38, 77);
pub const SELECTION_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 0, 0);
pub const SELECTION_STROKE: f32 = 2.0;

/// Dims everything except `selection`.
///
/// With no selection the whole screen is dimmed.
pub fn draw_selection_overlay(
    painter: &egui::Painter,
    screen_rect: egui::Rect,
    selection: Option<egui::Rect>,
    color: egui::Color32,
) {
    let Some(selection) = selection else {
        painter.rect_filled(screen_rect, 0.0, color);
        return;
    };

    let bands = [
        egui::Rect::from_min_max(screen_rect.min, egui::pos2(screen_rect.max.x, selection.min.y)),
        egui::Rect::from_min_max(egui::pos2(screen_rect.min.x, selection.max.y), screen_rect.max),
        egui::Rect::from_min_max(
            egui::pos2(screen_rect.min.x, selection.min.y),
            egui::pos2(selection.min.x, selection.max.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(selection.max.x, selection.min.y),
            egui::pos2(screen_rect.max.x, selection.max.y),
        ),
    ];
    for band in bands {
        if band.is_positive() {
            painter.rect_filled(band, 0.0, color);
        }
    }
}

/// Outlines the selection.
pub fn draw_selection_border(painter: &egui::Painter, selection: egui::Rect) {
    painter.rect_stroke(
        selection,
        0.0,
        egui::Stroke::new(SELECTION_STROKE, SELECTION_COLOR),
        egui::StrokeKind::Middle,
    );
}

/// Converts a selection in overlay pixels to an egui rectangle.
pub fn to_egui_rect(rect: SelectionRect) -> egui::Rect {
    egui::Rect::from_min_max(
        egui::pos2(rect.left as f32, rect.top as f32),
        egui::pos2(rect.right as f32, rect.bottom as f32),
    )
}

/// Rounds a pointer position to whole overlay pixels.
pub fn to_pixel(pos: egui::Pos2) -> (i32, i32) {
    (pos.x.round() as i32, pos.y.round() as i32)
}
