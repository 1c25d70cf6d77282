//! Command system for user actions

use serde::{Deserialize, Serialize};

/// Command identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandId(pub String);

impl CommandId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    // App commands
    pub const APP_PICK_ROOT: &'static str = "app.pick_root";
    pub const APP_EXIT: &'static str = "app.exit";

    // Navigation commands
    pub const NAV_ENTER: &'static str = "nav.enter";
    pub const NAV_BREADCRUMB: &'static str = "nav.breadcrumb";
    pub const NAV_GO_UP: &'static str = "nav.go_up";
    pub const NAV_REFRESH: &'static str = "nav.refresh";

    // Viewer commands
    pub const VIEW_OPEN: &'static str = "view.open";
    pub const VIEW_CLOSE: &'static str = "view.close";
    pub const VIEW_NEXT: &'static str = "view.next";
    pub const VIEW_PREV: &'static str = "view.prev";
    pub const VIEW_ZOOM_IN: &'static str = "view.zoom_in";
    pub const VIEW_ZOOM_OUT: &'static str = "view.zoom_out";
    pub const VIEW_LOAD_FAILED: &'static str = "view.load_failed";
    pub const VIEW_TOGGLE_FAVORITE: &'static str = "view.toggle_favorite";

    // File commands
    pub const FILE_REVEAL: &'static str = "file.reveal";
}

/// Command with optional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub id: CommandId,
    pub params: CommandParams,
}

/// Command parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandParams {
    pub int_value: Option<i64>,
    pub path_value: Option<String>,
}

impl Command {
    pub fn new(id: &str) -> Self {
        Self {
            id: CommandId::new(id),
            params: CommandParams::default(),
        }
    }

    pub fn with_int(mut self, value: i64) -> Self {
        self.params.int_value = Some(value);
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.params.path_value = Some(path.to_string());
        self
    }

    pub fn is(&self, id: &str) -> bool {
        self.id.as_str() == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let cmd = Command::new(CommandId::NAV_BREADCRUMB).with_int(2);
        assert!(cmd.is(CommandId::NAV_BREADCRUMB));
        assert_eq!(cmd.params.int_value, Some(2));
        assert_eq!(cmd.params.path_value, None);

        let cmd = Command::new(CommandId::VIEW_OPEN).with_path("/x/a.png");
        assert_eq!(cmd.params.path_value.as_deref(), Some("/x/a.png"));
    }
}
