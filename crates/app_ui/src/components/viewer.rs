//! Full-window image viewer

use crate::textures::TextureSlot;
use crate::theme::Theme;
use app_core::{Command, CommandId, ViewerState};
use egui::{Align2, FontId, Pos2, Rect, RichText, Ui, Vec2};

/// Image viewer component.
///
/// Zoom lives in the core viewer state; panning is purely visual and is
/// reset whenever a different image is shown.
pub struct ImageViewer {
    /// Pan offset
    pan: Vec2,

    /// Path the pan offset belongs to
    shown: Option<String>,

    /// Is dragging (panning)
    drag_start: Option<Pos2>,
    pan_start: Vec2,
}

impl ImageViewer {
    pub fn new() -> Self {
        Self {
            pan: Vec2::ZERO,
            shown: None,
            drag_start: None,
            pan_start: Vec2::ZERO,
        }
    }

    /// Render the viewer; returns the command for whatever was clicked
    pub fn ui(
        &mut self,
        ui: &mut Ui,
        state: &ViewerState,
        slot: Option<&TextureSlot>,
        is_favorite: bool,
        position: Option<(usize, usize)>,
        theme: &Theme,
    ) -> Option<Command> {
        if self.shown.as_deref() != Some(state.current_image.path.as_str()) {
            self.shown = Some(state.current_image.path.clone());
            self.pan = Vec2::ZERO;
        }

        let mut action = None;

        ui.horizontal(|ui| {
            if ui.button("◀").on_hover_text("Previous (←)").clicked() {
                action = Some(Command::new(CommandId::VIEW_PREV));
            }
            if ui.button("▶").on_hover_text("Next (→)").clicked() {
                action = Some(Command::new(CommandId::VIEW_NEXT));
            }

            ui.separator();
            ui.label(RichText::new(&state.current_image.name).strong());
            if let Some((index, total)) = position {
                ui.label(RichText::new(format!("{} / {}", index + 1, total)).color(theme.text_secondary));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("✕").on_hover_text("Close (Esc)").clicked() {
                    action = Some(Command::new(CommandId::VIEW_CLOSE));
                }
                if ui.button("📂").on_hover_text("Show in folder").clicked() {
                    action = Some(Command::new(CommandId::FILE_REVEAL));
                }

                let star = if is_favorite {
                    RichText::new("★").color(theme.favorite)
                } else {
                    RichText::new("☆")
                };
                if ui.button(star).on_hover_text("Favorite (F)").clicked() {
                    action = Some(Command::new(CommandId::VIEW_TOGGLE_FAVORITE));
                }

                ui.separator();

                // Zoom controls do nothing once the image failed to load
                ui.add_enabled_ui(!state.load_failed, |ui| {
                    if ui.button("+").on_hover_text("Zoom in").clicked() {
                        action = Some(Command::new(CommandId::VIEW_ZOOM_IN));
                    }
                    ui.label(format!("{:.0}%", state.zoom * 100.0));
                    if ui.button("−").on_hover_text("Zoom out").clicked() {
                        action = Some(Command::new(CommandId::VIEW_ZOOM_OUT));
                    }
                });
            });
        });

        let available = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(available, egui::Sense::click_and_drag());
        let painter = ui.painter_at(available);
        painter.rect_filled(available, 0.0, theme.viewer_background);

        match slot {
            Some(TextureSlot::Ready(texture)) if !state.load_failed => {
                self.handle_pan(ui, &response);

                let size = fit_size(texture.size_vec2(), available.size(), true) * state.zoom;
                let image_rect = Rect::from_center_size(available.center() + self.pan, size);
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.image(texture.id(), image_rect, uv, egui::Color32::WHITE);

                if response.hovered() {
                    let scroll = ui.input(|i| i.raw_scroll_delta.y);
                    if scroll > 0.0 {
                        action = Some(Command::new(CommandId::VIEW_ZOOM_IN));
                    } else if scroll < 0.0 {
                        action = Some(Command::new(CommandId::VIEW_ZOOM_OUT));
                    }
                }
            }
            Some(TextureSlot::Failed) | Some(TextureSlot::Ready(_)) => {
                painter.text(
                    available.center(),
                    Align2::CENTER_CENTER,
                    "⚠ Cannot display this image",
                    FontId::proportional(22.0),
                    theme.error,
                );
            }
            None => {
                painter.text(
                    available.center(),
                    Align2::CENTER_CENTER,
                    "Loading…",
                    FontId::proportional(22.0),
                    theme.text_secondary,
                );
            }
        }

        action
    }

    fn handle_pan(&mut self, ui: &Ui, response: &egui::Response) {
        if response.drag_started() {
            self.drag_start = ui.input(|i| i.pointer.hover_pos());
            self.pan_start = self.pan;
        }

        if response.dragged() {
            if let (Some(start), Some(current)) = (self.drag_start, ui.input(|i| i.pointer.hover_pos())) {
                self.pan = self.pan_start + (current - start);
            }
        }

        if response.drag_stopped() {
            self.drag_start = None;
        }

        if response.double_clicked() {
            self.pan = Vec2::ZERO;
        }
    }
}

impl Default for ImageViewer {
    fn default() -> Self {
        Self::new()
    }
}

/// Scale `image` to fit inside `available`, keeping its aspect ratio.
/// With `no_upscale` small images keep their natural size.
pub fn fit_size(image: Vec2, available: Vec2, no_upscale: bool) -> Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 {
        return Vec2::ZERO;
    }

    let mut scale = (available.x / image.x).min(available.y / image.y);
    if no_upscale {
        scale = scale.min(1.0);
    }
    image * scale.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_size() {
        let available = Vec2::new(800.0, 600.0);

        assert_eq!(fit_size(Vec2::new(1600.0, 600.0), available, true), Vec2::new(800.0, 300.0));
        assert_eq!(fit_size(Vec2::new(400.0, 1200.0), available, true), Vec2::new(200.0, 600.0));
        assert_eq!(fit_size(Vec2::new(100.0, 50.0), available, true), Vec2::new(100.0, 50.0));
        assert_eq!(fit_size(Vec2::new(100.0, 50.0), available, false), Vec2::new(800.0, 400.0));
        assert_eq!(fit_size(Vec2::ZERO, available, true), Vec2::ZERO);
    }
}
