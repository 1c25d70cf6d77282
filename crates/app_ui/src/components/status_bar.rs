//! Status bar component

use crate::theme::Theme;
use app_core::NavigationModel;
use egui::{RichText, Ui};

/// Status bar information
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusInfo {
    /// Folder being shown
    pub location: String,

    /// Favorites count
    pub favorites: usize,

    /// Error of the last listing, if it failed
    pub error: Option<String>,

    pub loading: bool,
}

impl StatusInfo {
    pub fn from_navigation(nav: &NavigationModel, favorites: usize) -> Self {
        Self {
            location: nav.current_dir().unwrap_or_default().to_string(),
            favorites,
            error: nav.error().map(str::to_string),
            loading: nav.is_loading(),
        }
    }
}

/// Status bar component
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar
    pub fn ui(ui: &mut Ui, info: &StatusInfo, theme: &Theme) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(&info.location).color(theme.text_secondary));

            if info.favorites > 0 {
                ui.separator();
                ui.label(RichText::new(format!("★ {}", info.favorites)).color(theme.favorite));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(error) = &info.error {
                    ui.label(RichText::new(error).color(theme.error));
                } else if info.loading {
                    ui.label("Loading…");
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::{ListingOutcome, MemorySettingsStore};
    use std::sync::Arc;

    #[test]
    fn test_from_navigation() {
        let mut nav = NavigationModel::new(Arc::new(MemorySettingsStore::new()));
        assert_eq!(StatusInfo::from_navigation(&nav, 0), StatusInfo::default());

        let request = nav.set_root("/photos").unwrap();
        let info = StatusInfo::from_navigation(&nav, 2);
        assert_eq!(info.location, "/photos");
        assert!(info.loading);

        nav.apply_listing(&request, ListingOutcome::Failed("Cannot open folder: /photos".into()));
        let info = StatusInfo::from_navigation(&nav, 2);
        assert!(!info.loading);
        assert_eq!(info.error.as_deref(), Some("Cannot open folder: /photos"));
    }
}
