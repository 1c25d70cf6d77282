//! UI Components

pub mod file_grid;
pub mod header;
pub mod status_bar;
pub mod viewer;
pub mod welcome;

pub use file_grid::{columns_for, FileGrid};
pub use header::Header;
pub use status_bar::{StatusBar, StatusInfo};
pub use viewer::{fit_size, ImageViewer};
pub use welcome::Welcome;
