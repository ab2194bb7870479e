//! Keyboard command surface.
//!
//! A thin shortcut-to-command mapping; the hard work happens in the
//! session. Commands the session cannot satisfy alone (playback toggle,
//! save) are deferred to the host.

use flowcut_timeline::EditorSession;

use crate::trim::split_selected_at_playhead;

/// Keyboard modifiers. `primary` means Ctrl on Linux/Windows and ⌘ on
/// macOS; callers normalize before resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub primary: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        primary: false,
        shift: false,
        alt: false,
    };
    pub const PRIMARY: Self = Self {
        primary: true,
        shift: false,
        alt: false,
    };
    pub const PRIMARY_SHIFT: Self = Self {
        primary: true,
        shift: true,
        alt: false,
    };
}

/// A key press as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// Key name: single characters ("s", "+") or names ("Space",
    /// "Delete", "Backspace", "Home", "End").
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// Editor-level commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    TogglePlayback,
    RemoveSelection,
    Undo,
    Redo,
    Save,
    DuplicateSelection,
    SplitAtPlayhead,
    ZoomIn,
    ZoomOut,
    SeekStart,
    SeekEnd,
}

/// Resolve a key press to a command, or `None` for an unbound key.
pub fn resolve(press: &KeyPress) -> Option<EditorCommand> {
    let key = press.key.as_str();
    let mods = press.modifiers;

    if mods.primary {
        return match (key.to_ascii_lowercase().as_str(), mods.shift) {
            ("z", false) => Some(EditorCommand::Undo),
            ("z", true) => Some(EditorCommand::Redo),
            ("s", false) => Some(EditorCommand::Save),
            ("d", false) => Some(EditorCommand::DuplicateSelection),
            _ => None,
        };
    }

    match key {
        "Space" | " " => Some(EditorCommand::TogglePlayback),
        "Delete" | "Backspace" => Some(EditorCommand::RemoveSelection),
        "s" | "S" => Some(EditorCommand::SplitAtPlayhead),
        "+" | "=" => Some(EditorCommand::ZoomIn),
        "-" => Some(EditorCommand::ZoomOut),
        "Home" => Some(EditorCommand::SeekStart),
        "End" => Some(EditorCommand::SeekEnd),
        _ => None,
    }
}

/// Result of dispatching a command against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// Fully handled by the session.
    Done,
    /// Needs a collaborator the session does not own (playback engine,
    /// persistence); the host must complete it.
    Deferred(EditorCommand),
}

/// Execute a command against the session where possible.
pub fn dispatch(command: EditorCommand, session: &mut EditorSession) -> DispatchResult {
    match command {
        EditorCommand::RemoveSelection => {
            session.remove_selected_clips();
        }
        EditorCommand::Undo => {
            session.undo();
        }
        EditorCommand::Redo => {
            session.redo();
        }
        EditorCommand::DuplicateSelection => {
            // Duplicate applies to a single selection only.
            if let [only] = session.selection() {
                let only = *only;
                session.duplicate_clip(only);
            }
        }
        EditorCommand::SplitAtPlayhead => {
            split_selected_at_playhead(session);
        }
        EditorCommand::ZoomIn => session.zoom_in(),
        EditorCommand::ZoomOut => session.zoom_out(),
        EditorCommand::SeekStart => session.seek(0.0),
        EditorCommand::SeekEnd => {
            let end = session.timeline_duration();
            session.seek(end);
        }
        EditorCommand::TogglePlayback | EditorCommand::Save => {
            return DispatchResult::Deferred(command);
        }
    }
    DispatchResult::Done
}
