//! Photo Gallery Logging & Observability
//!
//! Structured logging to a rolling file plus a panic hook that writes crash reports.

mod logging;
mod panic_hook;

pub use logging::{cleanup_logs_in, cleanup_old_logs, init_logging, LOG_FILE_PREFIX};
pub use panic_hook::{crash_report_name, init_panic_hook};

use directories::ProjectDirs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;

/// Get the application log directory
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "PhotoGallery", "PhotoGallery")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize all observability features.
///
/// The returned guard flushes the log file when dropped; keep it alive
/// until the application exits.
pub fn init() -> anyhow::Result<WorkerGuard> {
    let guard = init_logging()?;
    init_panic_hook();
    Ok(guard)
}
