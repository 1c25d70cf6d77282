//! Favorite images

use crate::settings::{SettingsStore, FAVORITES_KEY};
use std::collections::HashSet;
use std::sync::Arc;

/// Set of favorite paths, written back to settings after every change
pub struct FavoritesStore {
    paths: HashSet<String>,
    settings: Arc<dyn SettingsStore>,
}

impl FavoritesStore {
    /// Load the favorite set; missing or corrupt data gives an empty set
    pub fn load(settings: Arc<dyn SettingsStore>) -> Self {
        let paths = match settings.get(FAVORITES_KEY) {
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(list) => list.into_iter().collect(),
                Err(e) => {
                    tracing::warn!("Ignoring corrupt favorites: {}", e);
                    HashSet::new()
                }
            },
            None => HashSet::new(),
        };

        tracing::debug!("Loaded {} favorites", paths.len());
        Self { paths, settings }
    }

    pub fn is_favorite(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Flip membership of `path`, returning the new membership
    pub fn toggle(&mut self, path: &str) -> bool {
        let now_favorite = if self.paths.remove(path) {
            false
        } else {
            self.paths.insert(path.to_string());
            true
        };

        self.flush();
        now_favorite
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn flush(&self) {
        let mut list: Vec<&str> = self.paths.iter().map(String::as_str).collect();
        list.sort_unstable();

        let result = serde_json::to_string(&list)
            .map_err(Into::into)
            .and_then(|json| self.settings.set(FAVORITES_KEY, &json));

        if let Err(e) = result {
            tracing::warn!("Failed to save favorites: {}", e);
        }
    }
}
