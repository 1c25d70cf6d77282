//! Gallery state: owns the core components and dispatches commands

use crate::favorites::FavoritesStore;
use crate::listing::{list_entries, ListingOutcome};
use crate::navigation::{ListingRequest, NavigationModel};
use crate::settings::SettingsStore;
use crate::viewer::{Viewer, ViewerEffect, ViewerEvent};
use crate::{Command, CommandId};
use app_fs::FsGateway;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Asynchronous work the host has to start after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing to do
    Idle,
    /// Run the listing and hand the result to [`GalleryState::apply_listing`]
    Load(ListingRequest),
    /// Show the folder picker and pass the choice to [`GalleryState::set_root`]
    PickRoot,
    Exit,
}

impl From<Option<ListingRequest>> for Dispatch {
    fn from(request: Option<ListingRequest>) -> Self {
        request.map_or(Dispatch::Idle, Dispatch::Load)
    }
}

/// Main gallery state
pub struct GalleryState {
    gateway: Arc<dyn FsGateway>,
    navigation: NavigationModel,
    favorites: FavoritesStore,
    viewer: Viewer,
}

impl GalleryState {
    /// Create the state, loading favorites from `settings`
    pub fn new(gateway: Arc<dyn FsGateway>, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            gateway,
            navigation: NavigationModel::new(settings.clone()),
            favorites: FavoritesStore::load(settings),
            viewer: Viewer::Closed,
        }
    }

    /// Reopen the root of the previous session
    pub fn restore(&mut self) -> Option<ListingRequest> {
        self.navigation.restore()
    }

    /// Run a command against the current state
    pub fn execute(&mut self, cmd: &Command) -> Dispatch {
        tracing::debug!("Executing {}", cmd.id.as_str());

        match cmd.id.as_str() {
            CommandId::APP_PICK_ROOT => Dispatch::PickRoot,
            CommandId::APP_EXIT => Dispatch::Exit,

            // The viewer is modal: the grid cannot be navigated underneath it
            CommandId::NAV_ENTER | CommandId::NAV_BREADCRUMB | CommandId::NAV_GO_UP
                if self.viewer.is_open() =>
            {
                Dispatch::Idle
            }
            CommandId::NAV_ENTER => {
                let entry = cmd
                    .params
                    .path_value
                    .as_deref()
                    .and_then(|path| self.navigation.entry(path))
                    .cloned();
                entry.and_then(|e| self.navigation.enter(&e)).into()
            }
            CommandId::NAV_BREADCRUMB => cmd
                .params
                .int_value
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| self.navigation.navigate_to(i))
                .into(),
            CommandId::NAV_GO_UP => self.navigation.go_up().into(),
            CommandId::NAV_REFRESH => self.navigation.refresh().into(),

            CommandId::VIEW_OPEN => {
                let entry = cmd
                    .params
                    .path_value
                    .as_deref()
                    .and_then(|path| self.navigation.entry(path))
                    .cloned();
                if let Some(entry) = entry {
                    self.viewer_event(ViewerEvent::Select(entry));
                }
                Dispatch::Idle
            }
            CommandId::VIEW_CLOSE => self.viewer_event(ViewerEvent::Close),
            CommandId::VIEW_NEXT => self.viewer_event(ViewerEvent::Next),
            CommandId::VIEW_PREV => self.viewer_event(ViewerEvent::Prev),
            CommandId::VIEW_ZOOM_IN => self.viewer_event(ViewerEvent::ZoomIn),
            CommandId::VIEW_ZOOM_OUT => self.viewer_event(ViewerEvent::ZoomOut),
            CommandId::VIEW_LOAD_FAILED => self.viewer_event(ViewerEvent::ImageLoadError),
            CommandId::VIEW_TOGGLE_FAVORITE => self.viewer_event(ViewerEvent::ToggleFavorite),

            CommandId::FILE_REVEAL => match cmd.params.path_value.as_deref() {
                Some(path) => {
                    self.gateway.reveal_in_file_manager(Path::new(path));
                    Dispatch::Idle
                }
                None => self.viewer_event(ViewerEvent::Reveal),
            },

            other => {
                tracing::warn!("Unknown command: {}", other);
                Dispatch::Idle
            }
        }
    }

    fn viewer_event(&mut self, event: ViewerEvent) -> Dispatch {
        match self.viewer.handle(event, self.navigation.entries()) {
            ViewerEffect::None => {}
            ViewerEffect::ToggleFavorite(path) => {
                let now = self.favorites.toggle(&path);
                tracing::info!("Favorite {} for {}", if now { "added" } else { "removed" }, path);
            }
            ViewerEffect::Reveal(path) => self.gateway.reveal_in_file_manager(Path::new(&path)),
        }
        Dispatch::Idle
    }

    /// Use a picked folder as the new root; `None` (cancelled) changes nothing
    pub fn set_root(&mut self, picked: Option<&Path>) -> Option<ListingRequest> {
        let path = picked?.to_string_lossy().to_string();
        let request = self.navigation.set_root(&path)?;
        self.viewer = Viewer::Closed;
        Some(request)
    }

    /// Future performing the listing for `request`.
    ///
    /// Owns everything it needs so it can run on another task while the
    /// state keeps handling input.
    pub fn listing_task(
        &self,
        request: ListingRequest,
    ) -> impl Future<Output = (ListingRequest, ListingOutcome)> + Send + 'static {
        let gateway = Arc::clone(&self.gateway);
        async move {
            let outcome = list_entries(gateway.as_ref(), &request.path).await;
            (request, outcome)
        }
    }

    /// Future asking the gateway for a new root folder
    pub fn pick_task(&self) -> impl Future<Output = Option<PathBuf>> + Send + 'static {
        let gateway = Arc::clone(&self.gateway);
        async move { gateway.pick_directory().await }
    }

    /// Apply a finished listing; stale results are dropped
    pub fn apply_listing(&mut self, request: &ListingRequest, outcome: ListingOutcome) -> bool {
        self.navigation.apply_listing(request, outcome)
    }

    /// Run a listing to completion and apply it
    pub async fn load(&mut self, request: ListingRequest) -> bool {
        let (request, outcome) = self.listing_task(request).await;
        self.apply_listing(&request, outcome)
    }

    /// Pick a root folder and list it
    pub async fn pick_root(&mut self) -> bool {
        let picked = self.pick_task().await;
        match self.set_root(picked.as_deref()) {
            Some(request) => self.load(request).await,
            None => false,
        }
    }

    pub fn navigation(&self) -> &NavigationModel {
        &self.navigation
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn is_favorite(&self, path: &str) -> bool {
        self.favorites.is_favorite(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{MemorySettingsStore, FAVORITES_KEY, ROOT_KEY};
    use app_fs::{MemoryGateway, RawEntry};

    fn photo_tree() -> MemoryGateway {
        MemoryGateway::new()
            .with_dir(
                "/x",
                vec![
                    RawEntry::file("b.png"),
                    RawEntry::dir("Sub"),
                    RawEntry::file("a.jpg"),
                    RawEntry::file("notes.txt"),
                    RawEntry::file("c.gif"),
                ],
            )
            .with_dir("/x/Sub", vec![RawEntry::file("deep.webp")])
    }

    fn gallery(gateway: &Arc<MemoryGateway>) -> (GalleryState, Arc<MemorySettingsStore>) {
        let settings = Arc::new(MemorySettingsStore::new());
        let state = GalleryState::new(gateway.clone(), settings.clone());
        (state, settings)
    }

    fn names(state: &GalleryState) -> Vec<String> {
        state
            .navigation()
            .entries()
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    async fn run(state: &mut GalleryState, cmd: Command) {
        if let Dispatch::Load(request) = state.execute(&cmd) {
            state.load(request).await;
        }
    }

    #[tokio::test]
    async fn test_pick_root_lists_sorted() {
        let gateway = Arc::new(photo_tree());
        gateway.set_picked(Some("/x"));
        let (mut state, settings) = gallery(&gateway);

        assert!(state.pick_root().await);
        assert_eq!(names(&state), vec!["Sub", "a.jpg", "b.png", "c.gif", "notes.txt"]);
        assert_eq!(settings.get(ROOT_KEY).as_deref(), Some("/x"));
    }

    #[tokio::test]
    async fn test_cancelled_pick_changes_nothing() {
        let gateway = Arc::new(photo_tree());
        let (mut state, settings) = gallery(&gateway);

        assert!(!state.pick_root().await);
        assert!(!state.navigation().is_configured());
        assert_eq!(settings.get(ROOT_KEY), None);
        assert!(gateway.listed().is_empty());
    }

    #[tokio::test]
    async fn test_restore_enter_and_breadcrumb() {
        let gateway = Arc::new(photo_tree());
        let settings = Arc::new(MemorySettingsStore::new().with(ROOT_KEY, "/x"));
        let mut state = GalleryState::new(gateway.clone(), settings);

        let request = state.restore().unwrap();
        state.load(request).await;

        let sub = Path::new("/x").join("Sub").to_string_lossy().to_string();
        run(&mut state, Command::new(CommandId::NAV_ENTER).with_path(&sub)).await;
        assert_eq!(names(&state), vec!["deep.webp"]);
        assert_eq!(state.navigation().history().len(), 2);

        run(&mut state, Command::new(CommandId::NAV_BREADCRUMB).with_int(0)).await;
        assert_eq!(state.navigation().current_dir(), Some("/x"));
        assert_eq!(state.navigation().history().len(), 1);

        assert_eq!(
            state.execute(&Command::new(CommandId::NAV_BREADCRUMB).with_int(-1)),
            Dispatch::Idle
        );
    }

    #[tokio::test]
    async fn test_failed_listing_keeps_entries() {
        let gateway = Arc::new(photo_tree());
        gateway.set_picked(Some("/x"));
        let (mut state, _) = gallery(&gateway);
        state.pick_root().await;

        gateway.fail_dir("/x", "/x");
        run(&mut state, Command::new(CommandId::NAV_REFRESH)).await;

        assert_eq!(names(&state).len(), 5);
        assert_eq!(state.navigation().error(), Some("Cannot open folder: /x"));
    }

    #[tokio::test]
    async fn test_out_of_order_completion() {
        let gateway = Arc::new(photo_tree());
        gateway.set_picked(Some("/x"));
        let (mut state, _) = gallery(&gateway);
        state.pick_root().await;

        let sub = Path::new("/x").join("Sub").to_string_lossy().to_string();
        let Dispatch::Load(into_sub) =
            state.execute(&Command::new(CommandId::NAV_ENTER).with_path(&sub))
        else {
            panic!("expected a listing request");
        };
        let Dispatch::Load(back_up) = state.execute(&Command::new(CommandId::NAV_GO_UP)) else {
            panic!("expected a listing request");
        };

        let slow = state.listing_task(into_sub);
        let fast = state.listing_task(back_up);

        let (request, outcome) = fast.await;
        assert!(state.apply_listing(&request, outcome));
        let (request, outcome) = slow.await;
        assert!(!state.apply_listing(&request, outcome));

        assert_eq!(state.navigation().current_dir(), Some("/x"));
        assert_eq!(names(&state).len(), 5);
    }

    #[tokio::test]
    async fn test_viewer_flow() {
        let gateway = Arc::new(photo_tree());
        gateway.set_picked(Some("/x"));
        let (mut state, settings) = gallery(&gateway);
        state.pick_root().await;

        let first = state.navigation().images().next().unwrap().path.clone();
        state.execute(&Command::new(CommandId::VIEW_OPEN).with_path(&first));
        assert_eq!(state.viewer().current_image().unwrap().name, "a.jpg");

        state.execute(&Command::new(CommandId::VIEW_PREV));
        assert_eq!(state.viewer().current_image().unwrap().name, "c.gif");

        state.execute(&Command::new(CommandId::VIEW_TOGGLE_FAVORITE));
        let current = state.viewer().current_image().unwrap().path.clone();
        assert!(state.is_favorite(&current));
        assert!(settings.get(FAVORITES_KEY).unwrap().contains("c.gif"));

        state.execute(&Command::new(CommandId::FILE_REVEAL));
        assert_eq!(gateway.revealed(), vec![PathBuf::from(&current)]);

        // Grid navigation is blocked while the viewer is up
        assert_eq!(state.execute(&Command::new(CommandId::NAV_GO_UP)), Dispatch::Idle);

        state.execute(&Command::new(CommandId::VIEW_CLOSE));
        assert!(!state.viewer().is_open());
    }

    #[tokio::test]
    async fn test_open_ignores_folders_and_unknown_paths() {
        let gateway = Arc::new(photo_tree());
        gateway.set_picked(Some("/x"));
        let (mut state, _) = gallery(&gateway);
        state.pick_root().await;

        let sub = Path::new("/x").join("Sub").to_string_lossy().to_string();
        state.execute(&Command::new(CommandId::VIEW_OPEN).with_path(&sub));
        state.execute(&Command::new(CommandId::VIEW_OPEN).with_path("/elsewhere/a.png"));
        assert!(!state.viewer().is_open());
    }

    #[test]
    fn test_host_dispatches() {
        let gateway = Arc::new(MemoryGateway::new());
        let (mut state, _) = gallery(&gateway);

        assert_eq!(state.execute(&Command::new(CommandId::APP_PICK_ROOT)), Dispatch::PickRoot);
        assert_eq!(state.execute(&Command::new(CommandId::APP_EXIT)), Dispatch::Exit);
        assert_eq!(state.execute(&Command::new("nav.sideways")), Dispatch::Idle);
    }
}
