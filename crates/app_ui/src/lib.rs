//! Photo Gallery UI Layer
//!
//! Provides:
//! - egui-based GUI components
//! - wgpu rendering pipeline
//! - Input handling
//! - Image decoding into textures

pub mod components;
pub mod input;
pub mod renderer;
pub mod textures;
pub mod theme;

pub use input::InputHandler;
pub use renderer::Renderer;
pub use textures::{TextureCache, TextureSlot};
pub use theme::Theme;
