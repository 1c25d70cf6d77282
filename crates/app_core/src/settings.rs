//! Persisted key-value settings

use crate::AppError;
use directories::ProjectDirs;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key of the last chosen root directory (plain string)
pub const ROOT_KEY: &str = "gallery_root_path";

/// Key of the favorite path set (JSON array of strings)
pub const FAVORITES_KEY: &str = "gallery_favorites";

/// String key-value storage shared by the navigation model and favorites
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` and flush it before returning
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// Settings kept in memory only
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.values.lock().insert(key.to_string(), value.to_string());
        self
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.values.lock().remove(key);
        Ok(())
    }
}

/// Settings stored as one JSON object on disk, rewritten on every change
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileSettingsStore {
    /// Open the store at `path`.
    ///
    /// A missing or unreadable file starts an empty store; it is replaced on
    /// the next write.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => {
                    tracing::info!("Settings loaded from {:?}", path);
                    values
                }
                Err(e) => {
                    tracing::warn!("Ignoring corrupt settings file {:?}: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Cannot read settings file {:?}: {}", path, e);
                BTreeMap::new()
            }
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    /// Open the store at [`FileSettingsStore::default_path`]
    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        ProjectDirs::from("com", "PhotoGallery", "PhotoGallery")
            .map(|dirs| dirs.data_dir().join("settings.json"))
            .unwrap_or_else(|| PathBuf::from("./settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, content)
            .map_err(|e| AppError::Settings(format!("{}: {}", self.path.display(), e)))?;

        tracing::debug!("Settings saved to {:?}", self.path);
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut values = self.values.lock();
        if values.remove(key).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let store = FileSettingsStore::open(&path);
        assert_eq!(store.get(ROOT_KEY), None);
        store.set(ROOT_KEY, "/photos").unwrap();

        let reopened = FileSettingsStore::open(&path);
        assert_eq!(reopened.get(ROOT_KEY).as_deref(), Some("/photos"));

        reopened.remove(ROOT_KEY).unwrap();
        assert_eq!(FileSettingsStore::open(&path).get(ROOT_KEY), None);
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileSettingsStore::open(&path);
        assert_eq!(store.get(FAVORITES_KEY), None);

        store.set(FAVORITES_KEY, "[]").unwrap();
        assert_eq!(
            FileSettingsStore::open(&path).get(FAVORITES_KEY).as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySettingsStore::new().with(ROOT_KEY, "/x");
        assert_eq!(store.get(ROOT_KEY).as_deref(), Some("/x"));
        store.remove(ROOT_KEY).unwrap();
        assert_eq!(store.get(ROOT_KEY), None);
    }
}
