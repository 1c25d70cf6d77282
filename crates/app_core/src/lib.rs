//! Photo Gallery Core Domain Logic
//!
//! This crate contains:
//! - Entry classification and ordering
//! - Navigation history and listing requests
//! - Image viewer state machine
//! - Favorites and persisted settings
//! - Command system and gallery state
//! - Configuration
//! - Error types

pub mod command;
pub mod config;
pub mod entry;
pub mod error;
pub mod favorites;
pub mod listing;
pub mod navigation;
pub mod settings;
pub mod state;
pub mod viewer;

pub use command::{Command, CommandId, CommandParams};
pub use config::{AppConfig, GeneralConfig, GridConfig, ViewerConfig};
pub use entry::{compare_entries, resolve_display_source, sort_entries, Entry, EntryKind};
pub use error::AppError;
pub use favorites::FavoritesStore;
pub use listing::{list_entries, ListingOutcome};
pub use navigation::{HistoryEntry, ListingRequest, NavigationModel, ROOT_LABEL};
pub use settings::{FileSettingsStore, MemorySettingsStore, SettingsStore};
pub use state::{Dispatch, GalleryState};
pub use viewer::{Viewer, ViewerEffect, ViewerEvent, ViewerState};
