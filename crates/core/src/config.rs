//! Persistent application configuration.
//!
//! The configuration lives in a single JSON file that is read once at
//! startup and rewritten wholesale whenever a setting changes. Failures on
//! either side are logged and never block the application: a missing or
//! corrupt file yields defaults, and a failed save leaves the in-memory
//! value authoritative.

use crate::error::{AppError, Result};
use crate::theme::{self, Theme};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE: &str = "app_config.json";

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "EXAM_SHOT_CONFIG_DIR";

pub const DEFAULT_API_URL: &str = "https://api.example.com";
pub const DEFAULT_API_KEY: &str = "your_api_key_here";
pub const DEFAULT_USERNAME: &str = "MinhPhan";
pub const DEFAULT_USER_ID: &str = "12345";

/// User-editable settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(deserialize_with = "theme::lenient")]
    pub theme: Theme,
    pub api_url: String,
    pub api_key: String,
    pub username: String,
    pub user_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

impl Config {
    /// Checks the fields the settings dialog refuses to save empty.
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(AppError::config("API URL cannot be empty"));
        }
        if self.api_key.trim().is_empty() {
            return Err(AppError::config("API Key cannot be empty"));
        }
        Ok(())
    }
}

/// Owns the configuration file and its current contents.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
}

impl ConfigStore {
    /// Resolves the default configuration directory.
    ///
    /// `EXAM_SHOT_CONFIG_DIR` wins over the platform config directory; if
    /// neither is available a `config` directory next to the working
    /// directory is used.
    pub fn default_dir() -> PathBuf {
        if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
            if !dir.trim().is_empty() {
                return PathBuf::from(dir);
            }
        }
        ProjectDirs::from("", "", "exam-shot")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("config"))
    }

    /// Opens the store at the default location.
    pub fn open_default() -> Self {
        Self::open(Self::default_dir().join(CONFIG_FILE))
    }

    /// Opens the store at `path`.
    ///
    /// A missing file is created with defaults. An unreadable or corrupt file
    /// is logged and replaced in memory by defaults; it is left on disk until
    /// the next setting change overwrites it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = if path.exists() {
            match Self::read(&path) {
                Ok(config) => {
                    tracing::info!("Configuration loaded from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::error!("Error loading configuration: {}", e);
                    Config::default()
                }
            }
        } else {
            Config::default()
        };

        let store = Self { path, config };
        if !store.path.exists() {
            store.save();
        }
        store
    }

    fn read(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Persists the current configuration, logging instead of failing.
    pub fn save(&self) {
        match self.write() {
            Ok(()) => tracing::info!("Configuration saved to {}", self.path.display()),
            Err(e) => tracing::error!("Error saving configuration: {}", e),
        }
    }

    /// The current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sets the theme by name. Unknown names are rejected and nothing is saved.
    pub fn set_theme(&mut self, name: &str) -> Result<Theme> {
        let theme: Theme = name.parse()?;
        self.config.theme = theme;
        self.save();
        Ok(theme)
    }

    pub fn set_api_url(&mut self, url: impl Into<String>) {
        self.config.api_url = url.into();
        self.save();
    }

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.config.api_key = key.into();
        self.save();
    }

    pub fn set_user_info(&mut self, username: impl Into<String>, user_id: impl Into<String>) {
        self.config.username = username.into();
        self.config.user_id = user_id.into();
        self.save();
    }

    /// Replaces every setting at once, as the settings dialog does on save.
    pub fn replace(&mut self, config: Config) {
        self.config = config;
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let store = ConfigStore::open(&path);

        assert_eq!(store.config(), &Config::default());
        let on_disk: Config = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, Config::default());
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();

        let store = ConfigStore::open(&path);

        assert_eq!(store.config(), &Config::default());
    }

    #[test]
    fn partial_file_keeps_known_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"api_url": "https://exam.test/hook", "theme": "nonsense"}"#).unwrap();

        let store = ConfigStore::open(&path);

        assert_eq!(store.config().api_url, "https://exam.test/hook");
        assert_eq!(store.config().api_key, DEFAULT_API_KEY);
        assert_eq!(store.config().theme, Theme::default());
    }

    #[test]
    fn setters_rewrite_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut store = ConfigStore::open(&path);

        store.set_theme("flatly").unwrap();
        store.set_api_url("https://exam.test");
        store.set_api_key("secret");
        store.set_user_info("alice", "42");

        let reopened = ConfigStore::open(&path);
        assert_eq!(
            reopened.config(),
            &Config {
                theme: Theme::Flatly,
                api_url: "https://exam.test".into(),
                api_key: "secret".into(),
                username: "alice".into(),
                user_id: "42".into(),
            }
        );
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let dir = tempdir().unwrap();
        let mut store = ConfigStore::open(dir.path().join(CONFIG_FILE));

        assert!(store.set_theme("neon").is_err());
        assert_eq!(store.config().theme, Theme::default());
    }

    #[test]
    fn validate_requires_url_and_key() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.api_key = "  ".into();
        assert!(config.validate().is_err());

        config.api_key = "k".into();
        config.api_url.clear();
        assert!(config.validate().is_err());
    }
}
