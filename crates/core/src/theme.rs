//! Application colour themes.
//!
//! The set of themes is closed: every name maps at compile time to a base
//! (dark or light) egui palette plus an accent colour.

use crate::error::{AppError, Result};
use eframe::egui;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Cyborg,
    Darkly,
    Flatly,
    Journal,
    Litera,
    Lumen,
    Minty,
    Pulse,
    Sandstone,
    Simplex,
    Sketchy,
    Slate,
    Solar,
    Spacelab,
    Superhero,
    United,
    Yeti,
}

impl Theme {
    /// All themes, in the order they are offered to the user.
    pub const ALL: &'static [Theme] = &[
        Theme::Cyborg,
        Theme::Darkly,
        Theme::Flatly,
        Theme::Journal,
        Theme::Litera,
        Theme::Lumen,
        Theme::Minty,
        Theme::Pulse,
        Theme::Sandstone,
        Theme::Simplex,
        Theme::Sketchy,
        Theme::Slate,
        Theme::Solar,
        Theme::Spacelab,
        Theme::Superhero,
        Theme::United,
        Theme::Yeti,
    ];

    /// The persisted name of the theme.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Cyborg => "cyborg",
            Theme::Darkly => "darkly",
            Theme::Flatly => "flatly",
            Theme::Journal => "journal",
            Theme::Litera => "litera",
            Theme::Lumen => "lumen",
            Theme::Minty => "minty",
            Theme::Pulse => "pulse",
            Theme::Sandstone => "sandstone",
            Theme::Simplex => "simplex",
            Theme::Sketchy => "sketchy",
            Theme::Slate => "slate",
            Theme::Solar => "solar",
            Theme::Spacelab => "spacelab",
            Theme::Superhero => "superhero",
            Theme::United => "united",
            Theme::Yeti => "yeti",
        }
    }

    /// Whether the theme uses a dark base palette.
    pub fn is_dark(self) -> bool {
        matches!(
            self,
            Theme::Cyborg | Theme::Darkly | Theme::Slate | Theme::Solar | Theme::Superhero
        )
    }

    /// Accent colour used for selections and highlights.
    pub fn accent(self) -> egui::Color32 {
        let [r, g, b] = match self {
            Theme::Cyborg => [0x2a, 0x9f, 0xd6],
            Theme::Darkly => [0x37, 0x5a, 0x7f],
            Theme::Flatly => [0x2c, 0x3e, 0x50],
            Theme::Journal => [0xeb, 0x68, 0x64],
            Theme::Litera => [0x45, 0x82, 0xec],
            Theme::Lumen => [0x15, 0x8c, 0xba],
            Theme::Minty => [0x78, 0xc2, 0xad],
            Theme::Pulse => [0x59, 0x31, 0x96],
            Theme::Sandstone => [0x32, 0x5d, 0x88],
            Theme::Simplex => [0xd9, 0x23, 0x0f],
            Theme::Sketchy => [0x33, 0x33, 0x33],
            Theme::Slate => [0x3a, 0x3f, 0x44],
            Theme::Solar => [0xb5, 0x89, 0x00],
            Theme::Spacelab => [0x44, 0x6e, 0x9b],
            Theme::Superhero => [0xdf, 0x69, 0x19],
            Theme::United => [0xe9, 0x54, 0x20],
            Theme::Yeti => [0x00, 0x8c, 0xba],
        };
        egui::Color32::from_rgb(r, g, b)
    }

    /// Builds the egui visuals for this theme.
    pub fn visuals(self) -> egui::Visuals {
        let mut visuals = if self.is_dark() {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        let accent = self.accent();
        visuals.selection.bg_fill = accent;
        visuals.hyperlink_color = accent;
        visuals.widgets.active.bg_fill = accent;
        visuals
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Theme::ALL
            .iter()
            .copied()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::config(format!("Unknown theme: {}", wanted)))
    }
}

/// Deserializes a theme name, falling back to the default for unknown names
/// so a stale theme does not invalidate the rest of the configuration file.
pub(crate) fn lenient<'de, D>(deserializer: D) -> std::result::Result<Theme, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Ok(name.parse().unwrap_or_else(|_| {
        tracing::warn!("Unknown theme '{}' in configuration, using default", name);
        Theme::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_listed_name() {
        for theme in Theme::ALL {
            assert_eq!(theme.as_str().parse::<Theme>().unwrap(), *theme);
        }
    }

    #[test]
    fn parsing_ignores_case_and_whitespace() {
        assert_eq!(" Superhero ".parse::<Theme>().unwrap(), Theme::Superhero);
    }

    #[test]
    fn rejects_unknown_name() {
        assert!("vaporwave".parse::<Theme>().is_err());
    }

    #[test]
    fn dark_themes_get_dark_visuals() {
        assert!(Theme::Cyborg.visuals().dark_mode);
        assert!(!Theme::Flatly.visuals().dark_mode);
        assert_eq!(Theme::Flatly.visuals().selection.bg_fill, Theme::Flatly.accent());
    }
}
