//! Local filesystem gateway - directory listing and OS file manager integration

use crate::{FsError, FsGateway, RawEntry, Result};
use async_trait::async_trait;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Gateway backed by the real filesystem
#[derive(Debug, Clone, Default)]
pub struct LocalGateway;

impl LocalGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FsGateway for LocalGateway {
    async fn pick_directory(&self) -> Option<PathBuf> {
        let picked = pick_with_dialog().await;
        match &picked {
            Some(path) => tracing::info!("Folder picked: {}", path.display()),
            None => tracing::debug!("Folder picker cancelled"),
        }
        picked
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<RawEntry>> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || read_entries(&path))
            .await
            .map_err(|e| FsError::Io(std::io::Error::other(e)))?
    }

    fn reveal_in_file_manager(&self, path: &Path) {
        if let Err(e) = open_in_file_manager(path) {
            tracing::warn!("Failed to reveal {}: {}", path.display(), e);
        }
    }
}

/// Read the immediate entries of a directory.
///
/// Each entry is stat'ed through symlinks; entries that fail (broken links,
/// races with deletion) are skipped.
pub fn read_entries<P: AsRef<Path>>(path: P) -> Result<Vec<RawEntry>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(FsError::NotFound(path.display().to_string()));
    }

    if !path.is_dir() {
        return Err(FsError::NotADirectory(path.display().to_string()));
    }

    let reader = fs::read_dir(path).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => FsError::AccessDenied(path.display().to_string()),
        _ => FsError::Io(e),
    })?;

    let mut entries = Vec::new();

    for entry in reader {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let metadata = match fs::metadata(entry.path()) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry {:?}: {}", entry.path(), e);
                continue;
            }
        };

        entries.push(RawEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            is_directory: metadata.is_dir(),
        });
    }

    tracing::debug!("Read {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Folder to open when the platform cannot select a single file
pub fn reveal_target(path: &Path) -> &Path {
    if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(path)
    }
}

#[cfg(feature = "dialog")]
async fn pick_with_dialog() -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Choose gallery folder")
        .pick_folder()
        .await
        .map(|handle| handle.path().to_path_buf())
}

#[cfg(not(feature = "dialog"))]
async fn pick_with_dialog() -> Option<PathBuf> {
    tracing::warn!("Folder picker unavailable: built without the `dialog` feature");
    None
}

#[cfg(target_os = "windows")]
fn open_in_file_manager(path: &Path) -> Result<()> {
    let mut cmd = std::process::Command::new("explorer");
    if path.is_dir() {
        cmd.arg(path.display().to_string());
    } else {
        cmd.arg("/select,").arg(path.display().to_string());
    }
    cmd.spawn()?;

    tracing::info!("Revealed in Explorer: {}", path.display());
    Ok(())
}

#[cfg(target_os = "macos")]
fn open_in_file_manager(path: &Path) -> Result<()> {
    std::process::Command::new("open")
        .arg("-R")
        .arg(path.display().to_string())
        .spawn()?;

    tracing::info!("Revealed in Finder: {}", path.display());
    Ok(())
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn open_in_file_manager(path: &Path) -> Result<()> {
    // No portable "select file" here, open the containing folder
    let folder = reveal_target(path);

    std::process::Command::new("xdg-open")
        .arg(folder.display().to_string())
        .spawn()?;

    tracing::info!("Revealed in file manager: {}", folder.display());
    Ok(())
}
