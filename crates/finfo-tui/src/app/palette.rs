//! Entries of the action palette.

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::event::KeyAction;

/// An action the palette offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum PaletteEntry {
    #[strum(to_string = "Open")]
    Open,
    #[strum(to_string = "Reveal in file manager")]
    Reveal,
    #[strum(to_string = "Copy path")]
    CopyPath,
    #[strum(to_string = "Move to trash")]
    Trash,
    #[strum(to_string = "Clear quarantine")]
    ClearQuarantine,
    #[strum(to_string = "Change permissions")]
    Chmod,
    #[strum(to_string = "Open with…")]
    OpenWith,
    #[strum(to_string = "Move to directory…")]
    MoveToDir,
    #[strum(to_string = "Rename by pattern…")]
    RenamePattern,
    #[strum(to_string = "Undo")]
    Undo,
}

impl PaletteEntry {
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Direct key for the entry, usable from the list as well.
    pub fn shortcut(self) -> &'static str {
        match self {
            Self::Open => "o",
            Self::Reveal => "O",
            Self::CopyPath => "y",
            Self::Trash => "d",
            Self::ClearQuarantine => "Q",
            Self::Chmod => "c",
            Self::OpenWith => "w",
            Self::MoveToDir => "m",
            Self::RenamePattern => "r",
            Self::Undo => "u",
        }
    }

    /// The entry a shortcut action selects.
    pub fn from_action(action: KeyAction) -> Option<Self> {
        Some(match action {
            KeyAction::Open => Self::Open,
            KeyAction::Reveal => Self::Reveal,
            KeyAction::CopyPath => Self::CopyPath,
            KeyAction::Trash => Self::Trash,
            KeyAction::ClearQuarantine => Self::ClearQuarantine,
            KeyAction::Chmod => Self::Chmod,
            KeyAction::OpenWith => Self::OpenWith,
            KeyAction::MoveToDir => Self::MoveToDir,
            KeyAction::RenamePattern => Self::RenamePattern,
            KeyAction::Undo => Self::Undo,
            _ => return None,
        })
    }
}
