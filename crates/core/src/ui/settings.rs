//! Settings dialog.
//!
//! Edits a draft copy of the configuration across three tabs. Nothing
//! reaches the [`ConfigStore`](crate::config::ConfigStore) until "Save"
//! passes validation; "Cancel" throws the draft away.

use super::widgets::{ControlStyle, styled_button};
use crate::config::Config;
use crate::theme::Theme;
use eframe::egui;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SettingsTab {
    #[default]
    Appearance,
    Api,
    User,
}

impl SettingsTab {
    const ALL: [SettingsTab; 3] = [SettingsTab::Appearance, SettingsTab::Api, SettingsTab::User];

    fn label(self) -> &'static str {
        match self {
            SettingsTab::Appearance => "Appearance",
            SettingsTab::Api => "API Settings",
            SettingsTab::User => "User Information",
        }
    }
}

/// How the dialog was closed.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingsResult {
    Saved(Config),
    Cancelled,
}

pub struct SettingsDialog {
    draft: Config,
    tab: SettingsTab,
    show_key: bool,
    error: Option<String>,
}

impl SettingsDialog {
    pub fn new(current: &Config) -> Self {
        Self {
            draft: current.clone(),
            tab: SettingsTab::default(),
            show_key: false,
            error: None,
        }
    }

    /// Validates the draft; on failure the message is shown in the dialog.
    fn try_save(&mut self) -> Option<Config> {
        self.draft.api_url = self.draft.api_url.trim().to_string();
        self.draft.api_key = self.draft.api_key.trim().to_string();
        match self.draft.validate() {
            Ok(()) => {
                self.error = None;
                Some(self.draft.clone())
            }
            Err(e) => {
                tracing::warn!("Settings not saved: {}", e);
                self.error = Some(match e {
                    crate::error::AppError::Config(msg) => msg,
                    other => other.to_string(),
                });
                None
            }
        }
    }

    /// Draws the dialog; returns a result once it should close.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<SettingsResult> {
        let mut result = None;
        let mut open = true;

        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(420.0)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for tab in SettingsTab::ALL {
                        ui.selectable_value(&mut self.tab, tab, tab.label());
                    }
                });
                ui.separator();

                match self.tab {
                    SettingsTab::Appearance => self.appearance_tab(ui),
                    SettingsTab::Api => self.api_tab(ui),
                    SettingsTab::User => self.user_tab(ui),
                }

                if let Some(error) = &self.error {
                    ui.add_space(6.0);
                    ui.colored_label(egui::Color32::from_rgb(0xdc, 0x35, 0x45), error);
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if styled_button(ui, ControlStyle::Success, "Save").clicked() {
                        if let Some(config) = self.try_save() {
                            result = Some(SettingsResult::Saved(config));
                        }
                    }
                    if styled_button(ui, ControlStyle::Secondary, "Cancel").clicked() {
                        result = Some(SettingsResult::Cancelled);
                    }
                });
            });

        if !open {
            result = Some(SettingsResult::Cancelled);
        }
        result
    }

    fn appearance_tab(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Theme:");
            egui::ComboBox::from_id_salt("settings_theme")
                .selected_text(self.draft.theme.as_str())
                .show_ui(ui, |ui| {
                    for theme in Theme::ALL {
                        ui.selectable_value(&mut self.draft.theme, *theme, theme.as_str());
                    }
                });
        });
    }

    fn api_tab(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("settings_api").num_columns(2).show(ui, |ui| {
            ui.label("API URL:");
            ui.add(egui::TextEdit::singleline(&mut self.draft.api_url).desired_width(280.0));
            ui.end_row();

            ui.label("API Key:");
            ui.add(
                egui::TextEdit::singleline(&mut self.draft.api_key)
                    .password(!self.show_key)
                    .desired_width(280.0),
            );
            ui.end_row();
        });
        ui.checkbox(&mut self.show_key, "Show API Key");
    }

    fn user_tab(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("settings_user").num_columns(2).show(ui, |ui| {
            ui.label("Username:");
            ui.add(egui::TextEdit::singleline(&mut self.draft.username).desired_width(280.0));
            ui.end_row();

            ui.label("User ID:");
            ui.add(egui::TextEdit::singleline(&mut self.draft.user_id).desired_width(280.0));
            ui.end_row();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_blocks_save() {
        let mut dialog = SettingsDialog::new(&Config::default());
        dialog.draft.api_url = "   ".into();
        assert_eq!(dialog.try_save(), None);
        assert_eq!(dialog.error.as_deref(), Some("API URL cannot be empty"));
    }

    #[test]
    fn empty_key_blocks_save() {
        let mut dialog = SettingsDialog::new(&Config::default());
        dialog.draft.api_key.clear();
        assert_eq!(dialog.try_save(), None);
        assert_eq!(dialog.error.as_deref(), Some("API Key cannot be empty"));
    }

    #[test]
    fn valid_draft_is_trimmed_and_returned() {
        let mut dialog = SettingsDialog::new(&Config::default());
        dialog.draft.api_url = " https://api.test/run ".into();
        dialog.draft.theme = Theme::Flatly;

        let saved = dialog.try_save().unwrap();
        assert_eq!(saved.api_url, "https://api.test/run");
        assert_eq!(saved.theme, Theme::Flatly);
        assert!(dialog.error.is_none());
    }

    #[test]
    fn draft_does_not_touch_the_original() {
        let original = Config::default();
        let mut dialog = SettingsDialog::new(&original);
        dialog.draft.username = "someone".into();
        assert_eq!(original.username, crate::config::DEFAULT_USERNAME);
    }
}
