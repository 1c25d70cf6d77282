//! Navigation state: root, breadcrumb history and the visible listing

use crate::entry::Entry;
use crate::listing::ListingOutcome;
use crate::settings::{SettingsStore, ROOT_KEY};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Label of the first breadcrumb
pub const ROOT_LABEL: &str = "Home";

/// One breadcrumb
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub label: String,
    pub path: String,
}

impl HistoryEntry {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// A listing the navigation model is waiting for.
///
/// Only the request with the latest generation is applied when it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub path: String,
    pub generation: u64,
}

/// Navigation state for the gallery
pub struct NavigationModel {
    /// Breadcrumbs, index 0 is the root
    history: Vec<HistoryEntry>,

    /// Directory whose listing should be visible
    current_dir: Option<String>,

    /// Last successfully applied listing
    entries: Vec<Entry>,

    /// Message of the last failed listing, cleared by the next success
    error: Option<String>,

    /// Generation of the most recent request
    generation: u64,
    loading: bool,

    settings: Arc<dyn SettingsStore>,
}

impl NavigationModel {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            history: Vec::new(),
            current_dir: None,
            entries: Vec::new(),
            error: None,
            generation: 0,
            loading: false,
            settings,
        }
    }

    /// Restore the root saved by a previous session
    pub fn restore(&mut self) -> Option<ListingRequest> {
        let root = self.settings.get(ROOT_KEY)?;
        if root.trim().is_empty() {
            return None;
        }

        tracing::info!("Restoring gallery root {}", root);
        self.reset_to_root(root)
    }

    /// Make `path` the new root and persist it.
    ///
    /// An empty path (cancelled picker) leaves everything unchanged.
    pub fn set_root(&mut self, path: &str) -> Option<ListingRequest> {
        if path.trim().is_empty() {
            return None;
        }

        if let Err(e) = self.settings.set(ROOT_KEY, path) {
            tracing::warn!("Failed to save gallery root: {}", e);
        }

        tracing::info!("Gallery root set to {}", path);
        self.reset_to_root(path.to_string())
    }

    fn reset_to_root(&mut self, path: String) -> Option<ListingRequest> {
        self.history = vec![HistoryEntry::new(ROOT_LABEL, path.clone())];
        Some(self.request(path))
    }

    /// Descend into a folder entry; anything else is ignored
    pub fn enter(&mut self, entry: &Entry) -> Option<ListingRequest> {
        if !entry.is_folder() || self.history.is_empty() {
            return None;
        }

        tracing::debug!("Entering {}", entry.path);
        self.history
            .push(HistoryEntry::new(entry.name.clone(), entry.path.clone()));
        Some(self.request(entry.path.clone()))
    }

    /// Jump to breadcrumb `index`, dropping everything after it
    pub fn navigate_to(&mut self, index: usize) -> Option<ListingRequest> {
        let target = self.history.get(index)?.path.clone();

        tracing::debug!("Navigating to breadcrumb {} ({})", index, target);
        self.history.truncate(index + 1);
        Some(self.request(target))
    }

    /// Go to the parent breadcrumb
    pub fn go_up(&mut self) -> Option<ListingRequest> {
        if self.history.len() <= 1 {
            return None;
        }
        self.navigate_to(self.history.len() - 2)
    }

    /// List the current directory again
    pub fn refresh(&mut self) -> Option<ListingRequest> {
        let current = self.current_dir.clone()?;
        Some(self.request(current))
    }

    fn request(&mut self, path: String) -> ListingRequest {
        self.generation += 1;
        self.current_dir = Some(path.clone());
        self.loading = true;

        ListingRequest {
            path,
            generation: self.generation,
        }
    }

    /// Apply a completed listing.
    ///
    /// Returns `false` when a newer request has been issued since, in which
    /// case the outcome is dropped. A failure keeps the previous entries.
    pub fn apply_listing(&mut self, request: &ListingRequest, outcome: ListingOutcome) -> bool {
        let is_latest = request.generation == self.generation
            && self.current_dir.as_deref() == Some(request.path.as_str());

        if !is_latest {
            tracing::debug!(
                "Discarding stale listing of {} (generation {}, latest {})",
                request.path,
                request.generation,
                self.generation
            );
            return false;
        }

        self.loading = false;
        match outcome {
            ListingOutcome::Listed(entries) => {
                self.entries = entries;
                self.error = None;
            }
            ListingOutcome::Failed(message) => {
                self.error = Some(message);
            }
        }
        true
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn current_dir(&self) -> Option<&str> {
        self.current_dir.as_deref()
    }

    pub fn root(&self) -> Option<&str> {
        self.history.first().map(|h| h.path.as_str())
    }

    pub fn is_configured(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Image entries of the visible listing, in listing order
    pub fn images(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.is_image())
    }

    /// Find a visible entry by path
    pub fn entry(&self, path: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettingsStore;

    fn model() -> (NavigationModel, Arc<MemorySettingsStore>) {
        let settings = Arc::new(MemorySettingsStore::new());
        (NavigationModel::new(settings.clone()), settings)
    }

    fn listed(names: &[&str]) -> ListingOutcome {
        ListingOutcome::Listed(
            names
                .iter()
                .map(|n| Entry::image(*n, format!("/x/{}", n)))
                .collect(),
        )
    }

    #[test]
    fn test_set_root_then_enter() {
        let (mut nav, settings) = model();

        let req = nav.set_root("/x").unwrap();
        assert_eq!(req.path, "/x");
        assert_eq!(settings.get(ROOT_KEY).as_deref(), Some("/x"));

        let req = nav.enter(&Entry::folder("Sub", "/x/Sub")).unwrap();
        assert_eq!(req.path, "/x/Sub");
        assert_eq!(
            nav.history(),
            &[HistoryEntry::new("Home", "/x"), HistoryEntry::new("Sub", "/x/Sub")]
        );
        assert_eq!(nav.current_dir(), Some("/x/Sub"));
        assert_eq!(nav.root(), Some("/x"));
    }

    #[test]
    fn test_set_root_ignores_empty() {
        let (mut nav, settings) = model();
        assert!(nav.set_root("").is_none());
        assert!(nav.set_root("   ").is_none());
        assert!(!nav.is_configured());
        assert_eq!(settings.get(ROOT_KEY), None);
    }

    #[test]
    fn test_enter_non_folder_is_noop() {
        let (mut nav, _) = model();
        nav.set_root("/x");

        assert!(nav.enter(&Entry::image("a.png", "/x/a.png")).is_none());
        assert!(nav.enter(&Entry::unknown("a.txt", "/x/a.txt")).is_none());
        assert_eq!(nav.history().len(), 1);
        assert_eq!(nav.current_dir(), Some("/x"));
    }

    #[test]
    fn test_enter_without_root_is_noop() {
        let (mut nav, _) = model();

        assert!(nav.enter(&Entry::folder("a", "/x/a")).is_none());
        assert!(nav.history().is_empty());
        assert!(!nav.is_configured());
    }

    #[test]
    fn test_navigate_to_truncates_and_is_idempotent() {
        let (mut nav, _) = model();
        nav.set_root("/x");
        nav.enter(&Entry::folder("a", "/x/a"));
        nav.enter(&Entry::folder("b", "/x/a/b"));

        nav.navigate_to(1).unwrap();
        let after_first = (nav.current_dir().map(String::from), nav.history().len());
        nav.navigate_to(1).unwrap();
        let after_second = (nav.current_dir().map(String::from), nav.history().len());

        assert_eq!(after_first, (Some("/x/a".to_string()), 2));
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_navigate_to_out_of_range() {
        let (mut nav, _) = model();
        assert!(nav.navigate_to(0).is_none());

        nav.set_root("/x");
        assert!(nav.navigate_to(1).is_none());
        assert_eq!(nav.history().len(), 1);
    }

    #[test]
    fn test_go_up() {
        let (mut nav, _) = model();
        assert!(nav.go_up().is_none());

        nav.set_root("/x");
        assert!(nav.go_up().is_none());
        assert_eq!(nav.history().len(), 1);
        assert_eq!(nav.current_dir(), Some("/x"));

        nav.enter(&Entry::folder("Sub", "/x/Sub"));
        let req = nav.go_up().unwrap();
        assert_eq!(req.path, "/x");
        assert_eq!(nav.history().len(), 1);
    }

    #[test]
    fn test_restore_uses_saved_root() {
        let settings = Arc::new(MemorySettingsStore::new().with(ROOT_KEY, "/saved"));
        let mut nav = NavigationModel::new(settings);

        let req = nav.restore().unwrap();
        assert_eq!(req.path, "/saved");
        assert_eq!(nav.history(), &[HistoryEntry::new(ROOT_LABEL, "/saved")]);

        let (mut empty, _) = model();
        assert!(empty.restore().is_none());
    }

    #[test]
    fn test_stale_listing_is_discarded() {
        let (mut nav, _) = model();
        let first = nav.set_root("/x").unwrap();
        let second = nav.enter(&Entry::folder("Sub", "/x/Sub")).unwrap();

        assert!(nav.apply_listing(&second, listed(&["sub.png"])));
        assert!(!nav.apply_listing(&first, listed(&["root.png"])));

        assert_eq!(nav.entries()[0].name, "sub.png");
        assert!(!nav.is_loading());
    }

    #[test]
    fn test_failure_keeps_previous_entries() {
        let (mut nav, _) = model();
        let req = nav.set_root("/x").unwrap();
        nav.apply_listing(&req, listed(&["a.png", "b.png"]));

        let req = nav.refresh().unwrap();
        assert!(nav.is_loading());
        assert!(nav.apply_listing(&req, ListingOutcome::Failed("gone".into())));

        assert_eq!(nav.entries().len(), 2);
        assert_eq!(nav.error(), Some("gone"));

        let req = nav.refresh().unwrap();
        nav.apply_listing(&req, listed(&["c.png"]));
        assert_eq!(nav.error(), None);
        assert_eq!(nav.images().count(), 1);
    }
}
