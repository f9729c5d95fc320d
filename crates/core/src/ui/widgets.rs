//! Styled controls.
//!
//! Buttons pick their look from a closed [`ControlStyle`] instead of a
//! style name, so every control kind is known at compile time.

use eframe::egui;

/// Visual role of a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlStyle {
    Primary,
    Secondary,
    Success,
    Info,
    Warning,
    Danger,
}

impl ControlStyle {
    pub const ALL: &'static [ControlStyle] = &[
        ControlStyle::Primary,
        ControlStyle::Secondary,
        ControlStyle::Success,
        ControlStyle::Info,
        ControlStyle::Warning,
        ControlStyle::Danger,
    ];

    pub fn fill(self) -> egui::Color32 {
        match self {
            ControlStyle::Primary => egui::Color32::from_rgb(0x0d, 0x6e, 0xfd),
            ControlStyle::Secondary => egui::Color32::from_rgb(0x6c, 0x75, 0x7d),
            ControlStyle::Success => egui::Color32::from_rgb(0x19, 0x87, 0x54),
            ControlStyle::Info => egui::Color32::from_rgb(0x0d, 0xca, 0xf0),
            ControlStyle::Warning => egui::Color32::from_rgb(0xff, 0xc1, 0x07),
            ControlStyle::Danger => egui::Color32::from_rgb(0xdc, 0x35, 0x45),
        }
    }

    /// Black on light fills, white otherwise.
    pub fn text_color(self) -> egui::Color32 {
        match self {
            ControlStyle::Info | ControlStyle::Warning => egui::Color32::BLACK,
            _ => egui::Color32::WHITE,
        }
    }
}

/// A filled button in the given style.
pub fn styled_button(ui: &mut egui::Ui, style: ControlStyle, text: &str) -> egui::Response {
    ui.add(
        egui::Button::new(egui::RichText::new(text).color(style.text_color()).strong())
            .fill(style.fill())
            .min_size(egui::vec2(72.0, 26.0)),
    )
}

/// Like [`styled_button`] but greyed out and inert when `enabled` is false.
pub fn styled_button_enabled(
    ui: &mut egui::Ui,
    enabled: bool,
    style: ControlStyle,
    text: &str,
) -> egui::Response {
    ui.add_enabled_ui(enabled, |ui| styled_button(ui, style, text))
        .inner
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_style_has_its_own_fill() {
        let fills: HashSet<_> = ControlStyle::ALL.iter().map(|s| s.fill()).collect();
        assert_eq!(fills.len(), ControlStyle::ALL.len());
    }

    #[test]
    fn light_fills_get_dark_text() {
        assert_eq!(ControlStyle::Warning.text_color(), egui::Color32::BLACK);
        assert_eq!(ControlStyle::Danger.text_color(), egui::Color32::WHITE);
    }
}
