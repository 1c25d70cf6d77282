//! Photo Gallery - browse a folder tree of images
//!
//! Main entry point.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use anyhow::Result;

fn main() -> Result<()> {
    // Logging and panic hook first; the guard flushes the log file on exit
    let _log_guard = app_log::init()?;

    tracing::info!("Photo Gallery {} starting", env!("CARGO_PKG_VERSION"));

    let config = match app_core::AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Invalid configuration, using defaults: {}", e);
            app_core::AppConfig::default()
        }
    };

    if let Err(e) = app_log::cleanup_old_logs(config.general.log_retention_days) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    app::run(config)
}
