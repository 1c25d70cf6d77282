//! Directory listing adapter

use crate::entry::{sort_entries, Entry};
use crate::AppError;
use app_fs::FsGateway;
use std::path::Path;

/// Result of one listing request
#[derive(Debug, Clone, PartialEq)]
pub enum ListingOutcome {
    /// Classified entries in display order
    Listed(Vec<Entry>),
    /// The directory could not be read
    Failed(String),
}

impl ListingOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ListingOutcome::Failed(_))
    }
}

/// List `dir` through the gateway and turn the raw items into sorted entries
pub async fn list_entries<G: FsGateway + ?Sized>(gateway: &G, dir: &str) -> ListingOutcome {
    let dir_path = Path::new(dir);

    match gateway.list_directory(dir_path).await {
        Ok(raw) => {
            let mut entries: Vec<Entry> = raw
                .iter()
                .map(|item| Entry::classify(dir_path, item))
                .collect();
            sort_entries(&mut entries);
            tracing::debug!("Listed {} entries in {}", entries.len(), dir);
            ListingOutcome::Listed(entries)
        }
        Err(e) => {
            let err = AppError::from(e);
            tracing::warn!("Listing {} failed: {}", dir, err);
            ListingOutcome::Failed(err.user_message())
        }
    }
}
