//! File grid: folder tiles, image thumbnails and unknown files

use super::viewer::fit_size;
use crate::textures::{TextureCache, TextureSlot};
use crate::theme::Theme;
use app_core::{resolve_display_source, Command, CommandId, Entry, EntryKind, FavoritesStore};
use egui::{Align2, FontId, Rect, Response, RichText, Sense, Stroke, Ui, Vec2};

const SPACING: f32 = 8.0;

/// File grid component
pub struct FileGrid {
    /// Edge length of a tile
    pub tile_size: f32,
}

impl FileGrid {
    pub fn new(tile_size: f32) -> Self {
        Self {
            tile_size: tile_size.clamp(64.0, 512.0),
        }
    }

    /// Render the listing; returns the command for whatever was clicked
    pub fn ui(
        &self,
        ui: &mut Ui,
        entries: &[Entry],
        thumbnails: &mut TextureCache,
        favorites: &FavoritesStore,
        theme: &Theme,
    ) -> Option<Command> {
        if entries.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("This folder is empty").color(theme.text_secondary));
            });
            return None;
        }

        let mut action = None;
        let columns = columns_for(ui.available_width(), self.tile_size);

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("file_grid")
                .num_columns(columns)
                .spacing(Vec2::splat(SPACING))
                .show(ui, |ui| {
                    for (idx, entry) in entries.iter().enumerate() {
                        if let Some(cmd) = self.tile(ui, entry, thumbnails, favorites, theme) {
                            action = Some(cmd);
                        }
                        if (idx + 1) % columns == 0 {
                            ui.end_row();
                        }
                    }
                });
        });

        action
    }

    fn tile(
        &self,
        ui: &mut Ui,
        entry: &Entry,
        thumbnails: &mut TextureCache,
        favorites: &FavoritesStore,
        theme: &Theme,
    ) -> Option<Command> {
        let sense = match entry.kind {
            EntryKind::Unknown => Sense::hover(),
            EntryKind::Folder | EntryKind::Image => Sense::click(),
        };

        let response = ui
            .vertical(|ui| {
                ui.set_width(self.tile_size);
                let (rect, response) = ui.allocate_exact_size(Vec2::splat(self.tile_size), sense);
                self.paint_tile(ui, rect, &response, entry, thumbnails, favorites, theme);

                ui.add(
                    egui::Label::new(RichText::new(&entry.name).small())
                        .wrap_mode(egui::TextWrapMode::Truncate),
                );
                response
            })
            .inner
            .on_hover_text(&entry.name);

        let mut action = None;
        if response.clicked() {
            action = match entry.kind {
                EntryKind::Folder => Some(Command::new(CommandId::NAV_ENTER).with_path(&entry.path)),
                EntryKind::Image => Some(Command::new(CommandId::VIEW_OPEN).with_path(&entry.path)),
                EntryKind::Unknown => None,
            };
        }

        if entry.kind != EntryKind::Unknown {
            response.context_menu(|ui| {
                if ui.button("Show in folder").clicked() {
                    action = Some(Command::new(CommandId::FILE_REVEAL).with_path(&entry.path));
                    ui.close_menu();
                }
            });
        }

        action
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_tile(
        &self,
        ui: &Ui,
        rect: Rect,
        response: &Response,
        entry: &Entry,
        thumbnails: &mut TextureCache,
        favorites: &FavoritesStore,
        theme: &Theme,
    ) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 6.0, theme.tile);

        let glyph = |text: &str, color: egui::Color32| {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                text,
                FontId::proportional(self.tile_size * 0.3),
                color,
            );
        };

        match entry.kind {
            EntryKind::Folder => glyph("📁", theme.accent),
            EntryKind::Unknown => glyph("📄", theme.text_secondary),
            EntryKind::Image => {
                match thumbnail(entry, thumbnails, ui.is_rect_visible(rect)) {
                    Some(TextureSlot::Ready(texture)) => {
                        let inner = rect.shrink(4.0);
                        let size = fit_size(texture.size_vec2(), inner.size(), true);
                        let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                        painter.image(
                            texture.id(),
                            Rect::from_center_size(inner.center(), size),
                            uv,
                            egui::Color32::WHITE,
                        );
                    }
                    Some(TextureSlot::Failed) => glyph("⚠", theme.error),
                    None => glyph("…", theme.text_secondary),
                }

                if favorites.is_favorite(&entry.path) {
                    painter.text(
                        rect.right_top() + Vec2::new(-8.0, 6.0),
                        Align2::RIGHT_TOP,
                        "★",
                        FontId::proportional(18.0),
                        theme.favorite,
                    );
                }
            }
        }

        if response.hovered() && entry.kind != EntryKind::Unknown {
            painter.rect_stroke(rect.shrink(1.0), 6.0, Stroke::new(2.0, theme.accent));
        }
    }
}

impl Default for FileGrid {
    fn default() -> Self {
        Self::new(160.0)
    }
}

/// Thumbnail slot for an image tile; only tiles on screen queue a decode
fn thumbnail<'a>(
    entry: &Entry,
    thumbnails: &'a mut TextureCache,
    visible: bool,
) -> Option<&'a TextureSlot> {
    if !visible {
        return thumbnails.get(&entry.path);
    }
    let file = entry.display_source().and_then(resolve_display_source)?;
    thumbnails.request(&entry.path, &file)
}

/// Number of tiles that fit in `width`
pub fn columns_for(width: f32, tile_size: f32) -> usize {
    (((width + SPACING) / (tile_size + SPACING)).floor() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_for() {
        assert_eq!(columns_for(100.0, 160.0), 1);
        assert_eq!(columns_for(0.0, 160.0), 1);
        assert_eq!(columns_for(328.0, 160.0), 2);
        assert_eq!(columns_for(327.0, 160.0), 1);
        assert_eq!(columns_for(1000.0, 160.0), 5);
    }

    #[test]
    fn test_tile_size_is_clamped() {
        assert_eq!(FileGrid::new(10.0).tile_size, 64.0);
        assert_eq!(FileGrid::new(4000.0).tile_size, 512.0);
        assert_eq!(FileGrid::default().tile_size, 160.0);
    }

    #[test]
    fn test_offscreen_tiles_queue_nothing() {
        let entry = Entry::image("a.png", "/photos/a.png");
        let mut cache = TextureCache::thumbnails(4);

        assert!(thumbnail(&entry, &mut cache, false).is_none());
        assert_eq!(cache.pending(), 0);

        assert!(thumbnail(&entry, &mut cache, true).is_none());
        assert_eq!(cache.pending(), 1);
    }
}
