//! Application configuration

use crate::CommandId;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub viewer: ViewerConfig,
    pub grid: GridConfig,
    pub keybindings: HashMap<String, Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            viewer: ViewerConfig::default(),
            grid: GridConfig::default(),
            keybindings: default_keybindings(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub theme: String,
    /// Days to keep rolled log files
    pub log_retention_days: u32,
    /// Open the last chosen folder on startup
    pub restore_last_root: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            theme: "violet".to_string(),
            log_retention_days: 7,
            restore_last_root: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub background_color: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            background_color: "#0f0a15".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Edge length of a grid tile in points
    pub tile_size: f32,
    /// Thumbnail decodes running in the background at once
    pub thumbnails_per_frame: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tile_size: 160.0,
            thumbnails_per_frame: 4,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`; a missing file gives the defaults
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "PhotoGallery", "PhotoGallery")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }
}

fn default_keybindings() -> HashMap<String, Vec<String>> {
    let mut kb = HashMap::new();

    // Viewer
    kb.insert(CommandId::VIEW_CLOSE.into(), vec!["Escape".into()]);
    kb.insert(CommandId::VIEW_NEXT.into(), vec!["Right".into()]);
    kb.insert(CommandId::VIEW_PREV.into(), vec!["Left".into()]);
    kb.insert(CommandId::VIEW_ZOOM_IN.into(), vec!["Plus".into(), "=".into()]);
    kb.insert(CommandId::VIEW_ZOOM_OUT.into(), vec!["Minus".into()]);
    kb.insert(CommandId::VIEW_TOGGLE_FAVORITE.into(), vec!["f".into()]);
    kb.insert(CommandId::FILE_REVEAL.into(), vec!["Ctrl+e".into()]);

    // Navigation
    kb.insert(CommandId::NAV_GO_UP.into(), vec!["Backspace".into()]);
    kb.insert(CommandId::NAV_REFRESH.into(), vec!["F5".into()]);

    // App
    kb.insert(CommandId::APP_PICK_ROOT.into(), vec!["Ctrl+o".into()]);
    kb.insert(CommandId::APP_EXIT.into(), vec!["Ctrl+q".into()]);

    kb
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\ntheme = \"blue\"\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.general.theme, "blue");
        assert_eq!(config.general.log_retention_days, 7);
        assert_eq!(config.grid, GridConfig::default());
        assert!(config.keybindings.contains_key(CommandId::VIEW_NEXT));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf").join("config.toml");

        let mut config = AppConfig::default();
        config.general.restore_last_root = false;
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_and_corrupt_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(AppConfig::load_from(&path).unwrap(), AppConfig::default());

        std::fs::write(&path, "general = 3").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }
}
