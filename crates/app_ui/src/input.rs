//! Input handling and keybinding resolution

use app_core::{Command, CommandId};
use std::collections::HashMap;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// Input handler that maps keys/mouse to commands
pub struct InputHandler {
    /// Key bindings: lowercase key string -> command ID
    bindings: HashMap<String, String>,

    /// Current modifier state
    modifiers: ModifiersState,
}

impl InputHandler {
    /// Create a new input handler from `command -> keys` bindings
    pub fn new(bindings: HashMap<String, Vec<String>>) -> Self {
        let mut key_to_command = HashMap::new();

        for (command, keys) in bindings {
            for key in keys {
                if let Some(previous) = key_to_command.insert(key.to_lowercase(), command.clone()) {
                    tracing::warn!("Key {} bound to both {} and {}", key, previous, command);
                }
            }
        }

        Self {
            bindings: key_to_command,
            modifiers: ModifiersState::empty(),
        }
    }

    /// Update modifier state
    pub fn update_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Handle a key event and return the corresponding command
    pub fn handle_key(&self, event: &KeyEvent) -> Option<Command> {
        if event.state != ElementState::Pressed {
            return None;
        }
        self.resolve(&event.logical_key)
    }

    /// Look up the command bound to `key` under the current modifiers
    pub fn resolve(&self, key: &Key) -> Option<Command> {
        let name = key_to_string(key)?;
        let full_key = self.build_key_string(&name, matches!(key, Key::Character(_)));

        tracing::debug!("Key pressed: {}", full_key);

        self.bindings
            .get(&full_key.to_lowercase())
            .map(|cmd_id| Command::new(cmd_id))
    }

    /// Build a key string with modifiers.
    ///
    /// Shift is left out for characters: it already shaped the character.
    fn build_key_string(&self, key: &str, is_character: bool) -> String {
        let mut parts = Vec::new();

        if self.modifiers.control_key() {
            parts.push("Ctrl");
        }
        if self.modifiers.alt_key() {
            parts.push("Alt");
        }
        if self.modifiers.shift_key() && !is_character {
            parts.push("Shift");
        }
        if self.modifiers.super_key() {
            parts.push("Super");
        }

        parts.push(key);
        parts.join("+")
    }

    /// Handle a mouse button; runs before egui sees the event
    pub fn handle_mouse_button(&self, button: MouseButton, state: ElementState) -> Option<Command> {
        if state != ElementState::Pressed {
            return None;
        }
        match button {
            MouseButton::Back => Some(Command::new(CommandId::NAV_GO_UP)),
            _ => None,
        }
    }
}

/// Convert a logical key to its binding name
fn key_to_string(key: &Key) -> Option<String> {
    let name = match key {
        Key::Named(named) => match named {
            NamedKey::Space => "Space".to_string(),
            NamedKey::Enter => "Return".to_string(),
            NamedKey::Escape => "Escape".to_string(),
            NamedKey::Backspace => "Backspace".to_string(),
            NamedKey::Delete => "Delete".to_string(),
            NamedKey::Home => "Home".to_string(),
            NamedKey::End => "End".to_string(),
            NamedKey::ArrowUp => "Up".to_string(),
            NamedKey::ArrowDown => "Down".to_string(),
            NamedKey::ArrowLeft => "Left".to_string(),
            NamedKey::ArrowRight => "Right".to_string(),
            NamedKey::F5 => "F5".to_string(),
            NamedKey::F11 => "F11".to_string(),
            _ => format!("{:?}", named),
        },
        Key::Character(c) => match c.as_str() {
            "+" => "Plus".to_string(),
            "-" => "Minus".to_string(),
            other => other.to_string(),
        },
        _ => return None,
    };
    Some(name)
}
