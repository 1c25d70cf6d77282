//! Photo Gallery File System Access Layer
//!
//! Provides the narrow capability interface the gallery core depends on:
//! - FsGateway: pick a directory, list a directory, reveal a path
//! - LocalGateway: the real filesystem and OS file manager
//! - MemoryGateway: an in-memory tree for tests

mod gateway;
mod local;
mod memory;

pub use gateway::{FsGateway, RawEntry};
pub use local::{read_entries, reveal_target, LocalGateway};
pub use memory::MemoryGateway;

use thiserror::Error;

/// File system errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

pub type Result<T> = std::result::Result<T, FsError>;
