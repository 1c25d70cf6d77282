//! Header with folder picker, breadcrumbs and item count

use crate::theme::Theme;
use app_core::{Command, CommandId, NavigationModel};
use egui::{RichText, Ui};

/// Header component
pub struct Header;

impl Header {
    /// Render the header; returns the command for whatever was clicked
    pub fn ui(ui: &mut Ui, nav: &NavigationModel, theme: &Theme) -> Option<Command> {
        let mut action = None;

        ui.horizontal(|ui| {
            if ui
                .button("📁 Choose folder")
                .on_hover_text("Pick the gallery root (Ctrl+O)")
                .clicked()
            {
                action = Some(Command::new(CommandId::APP_PICK_ROOT));
            }

            let can_go_up = nav.history().len() > 1;
            ui.add_enabled_ui(can_go_up, |ui| {
                if ui.button("⬆").on_hover_text("Up (Backspace)").clicked() {
                    action = Some(Command::new(CommandId::NAV_GO_UP));
                }
            });

            ui.add_enabled_ui(nav.current_dir().is_some(), |ui| {
                if ui.button("🔄").on_hover_text("Refresh (F5)").clicked() {
                    action = Some(Command::new(CommandId::NAV_REFRESH));
                }
            });

            ui.separator();

            // Breadcrumbs; the last one is the current folder
            let last = nav.history().len().saturating_sub(1);
            for (index, crumb) in nav.history().iter().enumerate() {
                if index > 0 {
                    ui.label(RichText::new("›").color(theme.text_secondary));
                }

                let label = if index == last {
                    RichText::new(&crumb.label).strong().color(theme.accent)
                } else {
                    RichText::new(&crumb.label)
                };

                if ui.link(label).on_hover_text(&crumb.path).clicked() {
                    action = Some(Command::new(CommandId::NAV_BREADCRUMB).with_int(index as i64));
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if nav.is_configured() {
                    ui.label(
                        RichText::new(item_count(nav.entries().len())).color(theme.text_secondary),
                    );
                }
                if nav.is_loading() {
                    ui.spinner();
                }
            });
        });

        action
    }
}

fn item_count(n: usize) -> String {
    match n {
        1 => "1 item".to_string(),
        n => format!("{} items", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_count() {
        assert_eq!(item_count(0), "0 items");
        assert_eq!(item_count(1), "1 item");
        assert_eq!(item_count(42), "42 items");
    }
}
