//! Panel shown before a gallery root is chosen

use crate::theme::Theme;
use app_core::{Command, CommandId};
use egui::{RichText, Ui};

pub struct Welcome;

impl Welcome {
    pub fn ui(ui: &mut Ui, theme: &Theme) -> Option<Command> {
        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.label(RichText::new("📷").size(48.0));
            ui.heading("No gallery folder yet");
            ui.label(
                RichText::new("Choose a folder to browse its photos").color(theme.text_secondary),
            );
            ui.add_space(12.0);

            if ui.button(RichText::new("Choose folder").size(16.0)).clicked() {
                action = Some(Command::new(CommandId::APP_PICK_ROOT));
            }
        });

        action
    }
}
