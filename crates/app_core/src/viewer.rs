//! Image viewer state machine

use crate::entry::Entry;

pub const DEFAULT_ZOOM: f32 = 1.0;
pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 3.0;
pub const ZOOM_STEP: f32 = 0.25;

/// State of an open viewer
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub current_image: Entry,
    pub zoom: f32,
    pub load_failed: bool,
}

impl ViewerState {
    fn showing(image: &Entry) -> Self {
        Self {
            current_image: image.clone(),
            zoom: DEFAULT_ZOOM,
            load_failed: false,
        }
    }
}

/// Viewer input
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    Select(Entry),
    Close,
    Next,
    Prev,
    ZoomIn,
    ZoomOut,
    ImageLoadError,
    ToggleFavorite,
    Reveal,
}

/// Work the viewer hands to its owner; the viewer never touches
/// favorites or the filesystem itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEffect {
    None,
    ToggleFavorite(String),
    Reveal(String),
}

/// Full-screen image viewer
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Viewer {
    #[default]
    Closed,
    Open(ViewerState),
}

impl Viewer {
    /// Apply `event`. `listing` is the visible directory listing and is only
    /// read, to find neighbours for `Next` and `Prev`.
    pub fn handle(&mut self, event: ViewerEvent, listing: &[Entry]) -> ViewerEffect {
        if let ViewerEvent::Select(image) = &event {
            if image.is_image() {
                *self = Viewer::Open(ViewerState::showing(image));
            }
            return ViewerEffect::None;
        }

        let Viewer::Open(state) = self else {
            return ViewerEffect::None;
        };

        match event {
            ViewerEvent::Select(_) => {}
            ViewerEvent::Close => *self = Viewer::Closed,
            ViewerEvent::Next => {
                if let Some(next) = neighbour(listing, &state.current_image.path, 1) {
                    *state = ViewerState::showing(next);
                }
            }
            ViewerEvent::Prev => {
                if let Some(prev) = neighbour(listing, &state.current_image.path, -1) {
                    *state = ViewerState::showing(prev);
                }
            }
            ViewerEvent::ZoomIn if !state.load_failed => {
                state.zoom = (state.zoom + ZOOM_STEP).min(MAX_ZOOM);
            }
            ViewerEvent::ZoomOut if !state.load_failed => {
                state.zoom = (state.zoom - ZOOM_STEP).max(MIN_ZOOM);
            }
            ViewerEvent::ZoomIn | ViewerEvent::ZoomOut => {}
            ViewerEvent::ImageLoadError => state.load_failed = true,
            ViewerEvent::ToggleFavorite => {
                return ViewerEffect::ToggleFavorite(state.current_image.path.clone());
            }
            ViewerEvent::Reveal => {
                return ViewerEffect::Reveal(state.current_image.path.clone());
            }
        }

        ViewerEffect::None
    }

    pub fn state(&self) -> Option<&ViewerState> {
        match self {
            Viewer::Open(state) => Some(state),
            Viewer::Closed => None,
        }
    }

    pub fn current_image(&self) -> Option<&Entry> {
        self.state().map(|s| &s.current_image)
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Viewer::Open(_))
    }
}

/// Image `offset` steps away from `path` among the listing's images,
/// wrapping at both ends. `None` if `path` is not one of them.
fn neighbour<'a>(listing: &'a [Entry], path: &str, offset: isize) -> Option<&'a Entry> {
    let images: Vec<&Entry> = listing.iter().filter(|e| e.is_image()).collect();
    let count = images.len() as isize;
    let index = images.iter().position(|e| e.path == path)? as isize;

    let target = (index + offset).rem_euclid(count);
    images.get(target as usize).copied()
}
