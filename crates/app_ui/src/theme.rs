//! Application theming

use egui::{Color32, Visuals};

/// Application theme
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub surface: Color32,
    pub tile: Color32,
    pub text: Color32,
    pub text_secondary: Color32,
    pub accent: Color32,
    pub error: Color32,
    pub favorite: Color32,
    /// Fill behind the image in the viewer
    pub viewer_background: Color32,
}

impl Theme {
    /// Violet theme (default)
    pub fn violet() -> Self {
        Self {
            name: "violet".to_string(),
            background: Color32::from_rgb(15, 10, 21),
            surface: Color32::from_rgb(28, 20, 38),
            tile: Color32::from_rgb(44, 32, 58),
            text: Color32::from_rgb(240, 236, 245),
            text_secondary: Color32::from_rgb(165, 150, 180),
            accent: Color32::from_rgb(185, 115, 250),
            error: Color32::from_rgb(239, 68, 68),
            favorite: Color32::from_rgb(250, 204, 21),
            viewer_background: Color32::from_rgb(15, 10, 21),
        }
    }

    /// Blue theme
    pub fn blue() -> Self {
        Self {
            name: "blue".to_string(),
            background: Color32::from_rgb(12, 16, 24),
            surface: Color32::from_rgb(22, 30, 44),
            tile: Color32::from_rgb(34, 46, 66),
            text: Color32::from_rgb(236, 240, 246),
            text_secondary: Color32::from_rgb(148, 163, 184),
            accent: Color32::from_rgb(59, 130, 246),
            error: Color32::from_rgb(239, 68, 68),
            favorite: Color32::from_rgb(250, 204, 21),
            viewer_background: Color32::from_rgb(12, 16, 24),
        }
    }

    /// Override the viewer fill from a hex string; invalid values are ignored
    pub fn with_viewer_background(mut self, hex: &str) -> Self {
        match Self::parse_color(hex) {
            Some(color) => self.viewer_background = color,
            None => tracing::warn!("Invalid viewer background color: {}", hex),
        }
        self
    }

    /// Apply theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let mut visuals = Visuals::dark();

        visuals.panel_fill = self.surface;
        visuals.window_fill = self.surface;
        visuals.extreme_bg_color = self.background;
        visuals.faint_bg_color = self.tile;
        visuals.override_text_color = Some(self.text);

        visuals.widgets.noninteractive.bg_fill = self.surface;
        visuals.widgets.noninteractive.fg_stroke.color = self.text;

        visuals.widgets.inactive.bg_fill = self.tile;
        visuals.widgets.inactive.weak_bg_fill = self.tile;
        visuals.widgets.inactive.fg_stroke.color = self.text;

        visuals.widgets.hovered.bg_fill = self.accent.linear_multiply(0.3);
        visuals.widgets.hovered.weak_bg_fill = self.accent.linear_multiply(0.3);
        visuals.widgets.hovered.fg_stroke.color = self.text;

        visuals.widgets.active.bg_fill = self.accent.linear_multiply(0.5);
        visuals.widgets.active.fg_stroke.color = self.text;

        visuals.selection.bg_fill = self.accent.linear_multiply(0.3);
        visuals.selection.stroke.color = self.accent;
        visuals.hyperlink_color = self.accent;

        style.visuals = visuals;
        ctx.set_style(style);
    }

    /// Get theme by name, falling back to violet
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "blue" => Self::blue(),
            "violet" => Self::violet(),
            other => {
                tracing::warn!("Unknown theme {}, using violet", other);
                Self::violet()
            }
        }
    }

    /// Parse a hex color string (`#rrggbb` or `#aarrggbb`)
    pub fn parse_color(hex: &str) -> Option<Color32> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

        match hex.len() {
            6 => Some(Color32::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color32::from_rgba_unmultiplied(
                byte(2)?,
                byte(4)?,
                byte(6)?,
                byte(0)?,
            )),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::violet()
    }
}
