use anyhow::{Context, Result};
use exam_shot_core::{AppContext, AppPaths, ConfigStore, KeyboardHook, init, logging, ui};

fn main() -> Result<()> {
    // Setup
    let env_file = init();
    let paths = AppPaths::resolve();
    let log_file = logging::init(&paths.log_settings());

    tracing::info!("Starting {} v{}", ui::APP_NAME, env!("CARGO_PKG_VERSION"));
    if let Some(path) = env_file {
        tracing::info!("Loaded environment from {}", path.display());
    }
    if let Some(path) = log_file {
        tracing::info!("Logging to {}", path.display());
    }

    let config = ConfigStore::open_default();
    let context = AppContext::new(config, paths);

    // The hook thread lives for the whole process
    let hook = KeyboardHook::start();

    ui::run(context, hook).context("Failed to run the main window")?;
    Ok(())
}
