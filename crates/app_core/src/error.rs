//! Application error types

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Recoverable Errors (surface to the user, keep running) =====
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ===== Fatal Errors (application termination) =====
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed: {0}")]
    Init(String),
}

impl AppError {
    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Io(_)
                | AppError::NotFound(_)
                | AppError::AccessDenied(_)
                | AppError::Gateway(_)
                | AppError::Settings(_)
                | AppError::Serialization(_)
        )
    }

    /// Is this a fatal error?
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(path) => format!("Folder not found: {}", path),
            AppError::AccessDenied(path) => format!("Cannot open folder: {}", path),
            AppError::Gateway(msg) => format!("Cannot read folder: {}", msg),
            AppError::Settings(_) | AppError::Serialization(_) => {
                "Could not save your settings".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl From<app_fs::FsError> for AppError {
    fn from(e: app_fs::FsError) -> Self {
        match e {
            app_fs::FsError::NotFound(p) => AppError::NotFound(p),
            app_fs::FsError::AccessDenied(p) => AppError::AccessDenied(p),
            app_fs::FsError::Io(e) => AppError::Io(e),
            other => AppError::Gateway(other.to_string()),
        }
    }
}
