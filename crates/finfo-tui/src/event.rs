//! Event handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Navigation
    MoveUp,
    MoveDown,
    JumpToTop,
    JumpToBottom,
    NextPage,
    PrevPage,

    // Directory navigation
    /// Open the focused file or enter the focused directory (Enter).
    Activate,
    /// Enter the focused directory; inert on files.
    EnterDirectory,
    NavigateBack,

    // Selection
    ToggleSelect,
    SelectPage,

    // Actions
    OpenPalette,
    Open,
    Reveal,
    CopyPath,
    Trash,
    ClearQuarantine,
    Chmod,
    OpenWith,
    MoveToDir,
    RenamePattern,
    Undo,

    // UI toggles
    TogglePreview,
    ToggleDetail,
    ToggleJobLog,
    ToggleHelp,

    Refresh,
    Cancel,

    // Application
    Quit,
    ForceQuit,

    // No action
    None,
}

/// Modifier sets under which a printable key counts as unmodified.
///
/// Terminals disagree on whether uppercase letters and shifted symbols
/// report SHIFT.
fn plain(modifiers: KeyModifiers) -> bool {
    modifiers == KeyModifiers::NONE || modifiers == KeyModifiers::SHIFT
}

impl KeyAction {
    /// Convert a key event to an action.
    pub fn from_key_event(event: KeyEvent) -> Self {
        if event.modifiers == KeyModifiers::CONTROL {
            return match event.code {
                KeyCode::Char('c') => KeyAction::ForceQuit,
                KeyCode::Char('d') => KeyAction::NextPage,
                KeyCode::Char('u') => KeyAction::PrevPage,
                _ => KeyAction::None,
            };
        }

        match event.code {
            KeyCode::Esc => KeyAction::Cancel,

            // Arrow and paging keys ignore modifiers
            KeyCode::Down => KeyAction::MoveDown,
            KeyCode::Up => KeyAction::MoveUp,
            KeyCode::Left => KeyAction::NavigateBack,
            KeyCode::Right => KeyAction::EnterDirectory,
            KeyCode::Home => KeyAction::JumpToTop,
            KeyCode::End => KeyAction::JumpToBottom,
            KeyCode::PageDown => KeyAction::NextPage,
            KeyCode::PageUp => KeyAction::PrevPage,
            KeyCode::Enter => KeyAction::Activate,
            KeyCode::Backspace => KeyAction::NavigateBack,

            KeyCode::Char(c) if plain(event.modifiers) => match c {
                'q' => KeyAction::Quit,

                // Navigation - vim style
                'j' => KeyAction::MoveDown,
                'k' => KeyAction::MoveUp,
                'h' | '-' => KeyAction::NavigateBack,
                'l' => KeyAction::EnterDirectory,
                'g' => KeyAction::JumpToTop,
                'G' => KeyAction::JumpToBottom,
                'n' => KeyAction::NextPage,
                'p' => KeyAction::PrevPage,

                // Selection
                ' ' => KeyAction::ToggleSelect,
                'a' => KeyAction::SelectPage,

                // Actions
                ':' | '.' => KeyAction::OpenPalette,
                'o' => KeyAction::Open,
                'O' => KeyAction::Reveal,
                'y' => KeyAction::CopyPath,
                'd' => KeyAction::Trash,
                'Q' => KeyAction::ClearQuarantine,
                'c' => KeyAction::Chmod,
                'w' => KeyAction::OpenWith,
                'm' => KeyAction::MoveToDir,
                'r' => KeyAction::RenamePattern,
                'u' => KeyAction::Undo,

                // UI toggles
                'P' => KeyAction::TogglePreview,
                'i' => KeyAction::ToggleDetail,
                'L' => KeyAction::ToggleJobLog,
                '?' => KeyAction::ToggleHelp,
                'R' => KeyAction::Refresh,

                _ => KeyAction::None,
            },

            _ => KeyAction::None,
        }
    }
}

/// A section of key bindings for the help display.
pub struct HelpSection {
    pub title: &'static str,
    pub bindings: Vec<KeyBinding>,
}

/// Key binding for display in help.
pub struct KeyBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

/// Get all key bindings organized by section for help display.
pub fn get_help_sections() -> Vec<HelpSection> {
    vec![
        HelpSection {
            title: "Navigation",
            bindings: vec![
                KeyBinding { keys: "j/k ↑/↓", description: "Move down/up" },
                KeyBinding { keys: "g/G", description: "Jump to top/bottom" },
                KeyBinding { keys: "n/p PgDn/PgUp", description: "Next/previous page" },
                KeyBinding { keys: "Enter", description: "Open file or enter directory" },
                KeyBinding { keys: "l/→", description: "Enter directory" },
                KeyBinding { keys: "h/←/Bksp/-", description: "Go back" },
            ],
        },
        HelpSection {
            title: "Selection",
            bindings: vec![
                KeyBinding { keys: "Space", description: "Toggle selection" },
                KeyBinding { keys: "a", description: "Select page" },
                KeyBinding { keys: "Esc", description: "Clear selection" },
            ],
        },
        HelpSection {
            title: "Actions",
            bindings: vec![
                KeyBinding { keys: ": or .", description: "Action palette" },
                KeyBinding { keys: "o / O", description: "Open / reveal" },
                KeyBinding { keys: "y", description: "Copy path(s)" },
                KeyBinding { keys: "d", description: "Move to trash" },
                KeyBinding { keys: "Q", description: "Clear quarantine" },
                KeyBinding { keys: "c / w", description: "Chmod / open with" },
                KeyBinding { keys: "m / r", description: "Move / rename by pattern" },
                KeyBinding { keys: "u", description: "Undo last move/rename" },
            ],
        },
        HelpSection {
            title: "Display",
            bindings: vec![
                KeyBinding { keys: "P", description: "Toggle preview pane" },
                KeyBinding { keys: "i", description: "Toggle brief/long detail" },
                KeyBinding { keys: "L", description: "Toggle job log" },
                KeyBinding { keys: "R", description: "Refresh listing" },
                KeyBinding { keys: "?", description: "Show this help" },
                KeyBinding { keys: "q", description: "Quit" },
            ],
        },
    ]
}

/// Placeholders accepted by rename patterns, for the help display.
pub fn get_pattern_help() -> Vec<(&'static str, &'static str)> {
    vec![
        ("{name}", "Base name without extension"),
        ("{ext}", "Extension including the dot"),
        ("{n}", "Position in the target set, from 1"),
    ]
}
