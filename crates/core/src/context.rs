//! Explicitly constructed application context.
//!
//! Configuration and the log and screenshot locations are owned here and
//! handed to the UI at launch. Nothing is looked up through globals.

use crate::config::ConfigStore;
use crate::logging::LogSettings;
use directories::ProjectDirs;
use std::path::PathBuf;

/// Filesystem locations used by the application.
#[derive(Clone, Debug)]
pub struct AppPaths {
    pub logs_dir: PathBuf,
    pub screenshots_dir: PathBuf,
}

impl AppPaths {
    /// Platform data directory, or the working directory when unavailable.
    pub fn resolve() -> Self {
        let base = ProjectDirs::from("", "", "exam-shot")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Self::under(base)
    }

    /// Places every directory under `base`.
    pub fn under(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            logs_dir: base.join("logs"),
            screenshots_dir: base.join("screenshots"),
        }
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings::new(&self.logs_dir)
    }
}

/// Configuration plus paths, built once in `main` and passed down.
#[derive(Debug)]
pub struct AppContext {
    pub config: ConfigStore,
    pub paths: AppPaths,
}

impl AppContext {
    pub fn new(config: ConfigStore, paths: AppPaths) -> Self {
        Self { config, paths }
    }
}
