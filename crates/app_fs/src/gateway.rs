//! Filesystem gateway trait

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One item of a raw directory listing, before classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub name: String,
    pub is_directory: bool,
}

impl RawEntry {
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
        }
    }
}

/// Privileged filesystem operations used by the gallery.
///
/// Every call is a single request/response; implementations keep no state
/// that the caller can observe between calls.
#[async_trait]
pub trait FsGateway: Send + Sync {
    /// Ask the user for a directory. `None` means the user cancelled.
    async fn pick_directory(&self) -> Option<PathBuf>;

    /// List the immediate entries of `path`.
    ///
    /// Entries whose metadata cannot be read are left out; the call only
    /// fails when the directory itself cannot be read.
    async fn list_directory(&self, path: &Path) -> Result<Vec<RawEntry>>;

    /// Show `path` in the OS file manager. Fire-and-forget.
    fn reveal_in_file_manager(&self, path: &Path);
}
