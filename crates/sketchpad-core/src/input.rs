//! Host input events and keyboard shortcuts.

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// An event delivered by the host window. Positions are in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    PointerDown {
        position: Point,
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        position: Point,
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// The pointer left the canvas element.
    PointerLeave,
    Wheel {
        position: Point,
        delta: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyDown {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Resize { size: Size },
}

/// Editing commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditCommand {
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    SelectAll,
    Delete,
    /// Abort the active drag, or clear the selection.
    Cancel,
    ZoomIn,
    ZoomOut,
    ResetZoom,
}

impl EditCommand {
    /// Map a key press to a command. Key names follow the DOM `key` values.
    pub fn from_key(key: &str, modifiers: Modifiers) -> Option<Self> {
        if modifiers.command() {
            let command = match key.to_ascii_lowercase().as_str() {
                "c" => EditCommand::Copy,
                "x" => EditCommand::Cut,
                "v" => EditCommand::Paste,
                "z" if modifiers.shift => EditCommand::Redo,
                "z" => EditCommand::Undo,
                "y" => EditCommand::Redo,
                "a" => EditCommand::SelectAll,
                "=" | "+" => EditCommand::ZoomIn,
                "-" => EditCommand::ZoomOut,
                "0" => EditCommand::ResetZoom,
                _ => return None,
            };
            return Some(command);
        }

        match key {
            "Delete" | "Backspace" => Some(EditCommand::Delete),
            "Escape" => Some(EditCommand::Cancel),
            _ => None,
        }
    }

    /// Human-readable shortcut, e.g. "Ctrl+Shift+Z".
    pub fn shortcut(&self) -> &'static str {
        match self {
            EditCommand::Copy => "Ctrl+C",
            EditCommand::Cut => "Ctrl+X",
            EditCommand::Paste => "Ctrl+V",
            EditCommand::Undo => "Ctrl+Z",
            EditCommand::Redo => "Ctrl+Shift+Z",
            EditCommand::SelectAll => "Ctrl+A",
            EditCommand::Delete => "Delete",
            EditCommand::Cancel => "Escape",
            EditCommand::ZoomIn => "Ctrl+=",
            EditCommand::ZoomOut => "Ctrl+-",
            EditCommand::ResetZoom => "Ctrl+0",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_shortcuts() {
        assert_eq!(EditCommand::from_key("c", Modifiers::ctrl()), Some(EditCommand::Copy));
        assert_eq!(EditCommand::from_key("X", Modifiers::ctrl()), Some(EditCommand::Cut));
        assert_eq!(EditCommand::from_key("v", Modifiers::ctrl()), Some(EditCommand::Paste));
        assert_eq!(EditCommand::from_key("c", Modifiers::NONE), None);
    }

    #[test]
    fn test_undo_redo_shortcuts() {
        let ctrl_shift = Modifiers {
            shift: true,
            ..Modifiers::ctrl()
        };
        assert_eq!(EditCommand::from_key("z", Modifiers::ctrl()), Some(EditCommand::Undo));
        assert_eq!(EditCommand::from_key("Z", ctrl_shift), Some(EditCommand::Redo));
        assert_eq!(EditCommand::from_key("y", Modifiers::ctrl()), Some(EditCommand::Redo));

        let cmd = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(EditCommand::from_key("z", cmd), Some(EditCommand::Undo));
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(EditCommand::from_key("Delete", Modifiers::NONE), Some(EditCommand::Delete));
        assert_eq!(EditCommand::from_key("Backspace", Modifiers::NONE), Some(EditCommand::Delete));
        assert_eq!(EditCommand::from_key("Escape", Modifiers::shift()), Some(EditCommand::Cancel));
        assert_eq!(EditCommand::from_key("q", Modifiers::NONE), None);
    }

    #[test]
    fn test_host_event_json() {
        let json = r#"{
            "type": "pointer_down",
            "position": { "x": 1.0, "y": 2.0 },
            "modifiers": { "shift": true }
        }"#;
        let event: HostEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            HostEvent::PointerDown {
                position: Point::new(1.0, 2.0),
                button: PointerButton::Primary,
                modifiers: Modifiers::shift(),
            }
        );

        let leave: HostEvent = serde_json::from_str(r#"{ "type": "pointer_leave" }"#).unwrap();
        assert_eq!(leave, HostEvent::PointerLeave);
    }
}
