//! In-memory gateway for tests

use crate::{FsError, FsGateway, RawEntry, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Gateway over a fixed in-memory directory tree.
///
/// Records every listing and reveal request so callers can assert on the
/// traffic that crossed the gateway.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    dirs: Mutex<HashMap<PathBuf, Vec<RawEntry>>>,
    failures: Mutex<HashMap<PathBuf, String>>,
    picked: Mutex<Option<PathBuf>>,
    listed: Mutex<Vec<PathBuf>>,
    revealed: Mutex<Vec<PathBuf>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryGateway::insert_dir`]
    pub fn with_dir<P: Into<PathBuf>>(self, path: P, entries: Vec<RawEntry>) -> Self {
        self.insert_dir(path, entries);
        self
    }

    pub fn insert_dir<P: Into<PathBuf>>(&self, path: P, entries: Vec<RawEntry>) {
        let path = path.into();
        self.failures.lock().remove(&path);
        self.dirs.lock().insert(path, entries);
    }

    pub fn remove_dir<P: AsRef<Path>>(&self, path: P) {
        self.dirs.lock().remove(path.as_ref());
    }

    /// Make listings of `path` fail with `message`
    pub fn fail_dir<P: Into<PathBuf>>(&self, path: P, message: &str) {
        self.failures.lock().insert(path.into(), message.to_string());
    }

    /// Result of the next `pick_directory` call
    pub fn set_picked<P: Into<PathBuf>>(&self, path: Option<P>) {
        *self.picked.lock() = path.map(Into::into);
    }

    pub fn listed(&self) -> Vec<PathBuf> {
        self.listed.lock().clone()
    }

    pub fn revealed(&self) -> Vec<PathBuf> {
        self.revealed.lock().clone()
    }
}

#[async_trait]
impl FsGateway for MemoryGateway {
    async fn pick_directory(&self) -> Option<PathBuf> {
        self.picked.lock().take()
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<RawEntry>> {
        self.listed.lock().push(path.to_path_buf());

        if let Some(message) = self.failures.lock().get(path) {
            return Err(FsError::AccessDenied(message.clone()));
        }

        self.dirs
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.display().to_string()))
    }

    fn reveal_in_file_manager(&self, path: &Path) {
        self.revealed.lock().push(path.to_path_buf());
    }
}
