//! Logging setup.
//!
//! Installs a global `tracing` subscriber with two outputs: a console layer
//! on stderr and a plain-text daily file (`app_<YYYY-MM-DD>.log`). The
//! filter honours `RUST_LOG` and falls back to the configured default.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Options for [`init`].
#[derive(Clone, Debug)]
pub struct LogSettings {
    /// Directory that receives the daily log file.
    pub dir: PathBuf,
    /// Filter used when `RUST_LOG` is not set.
    pub default_filter: String,
}

impl LogSettings {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            default_filter: "info".to_string(),
        }
    }
}

/// File name of the log for a given day.
pub fn log_file_name(date: chrono::NaiveDate) -> String {
    format!("app_{}.log", date.format("%Y-%m-%d"))
}

/// Opens today's log file, falling back to the temp dir when `dir` is not
/// writable.
fn open_log_file(dir: &Path) -> Option<(PathBuf, File)> {
    let name = log_file_name(chrono::Local::now().date_naive());
    [dir.to_path_buf(), std::env::temp_dir()]
        .into_iter()
        .find_map(|candidate| {
            fs::create_dir_all(&candidate).ok()?;
            let path = candidate.join(&name);
            let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;
            Some((path, file))
        })
}

/// Installs the global subscriber. Call once at startup.
///
/// Returns the path of the log file, or `None` when only console logging
/// could be set up.
pub fn init(settings: &LogSettings) -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.default_filter));

    let console = fmt::layer().with_target(true).with_thread_ids(false);

    match open_log_file(&settings.dir) {
        Some((path, file)) => {
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_line_number(true)
                .with_writer(Arc::new(file));
            let installed = tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file_layer)
                .try_init()
                .is_ok();
            installed.then_some(path)
        }
        None => {
            let _ = tracing_subscriber::registry().with(filter).with(console).try_init();
            tracing::warn!(
                "Failed to set up file logging in {}, logging to console only",
                settings.dir.display()
            );
            None
        }
    }
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
