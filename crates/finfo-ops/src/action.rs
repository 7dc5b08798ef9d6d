//! Action kinds and errors.

use std::path::PathBuf;

use thiserror::Error;

/// An action the session can dispatch against one or more targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Open with the default handler.
    Open,
    /// Reveal in the platform file manager.
    Reveal,
    /// Copy path(s) to the clipboard as one payload.
    CopyPath,
    /// Remove the download quarantine flag.
    ClearQuarantine,
    /// Change permissions to an octal mode.
    Chmod(String),
    /// Move to the trash.
    Trash,
    /// Open with a named application.
    OpenWith(String),
    /// Move into another directory.
    Move,
    /// Rename in place.
    Rename,
    /// Reverse a previous move or rename.
    Undo,
}

impl ActionKind {
    /// Actions that must pass the confirmation gate before dispatch.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Trash | Self::ClearQuarantine)
    }

    /// Actions with a well-defined inverse.
    pub fn is_reversible(&self) -> bool {
        matches!(self, Self::Move | Self::Rename)
    }

    /// Actions after which the catalog should be re-read.
    pub fn changes_listing(&self) -> bool {
        matches!(self, Self::Move | Self::Rename | Self::Trash | Self::Undo)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Reveal => write!(f, "Reveal"),
            Self::CopyPath => write!(f, "Copy path"),
            Self::ClearQuarantine => write!(f, "Clear quarantine"),
            Self::Chmod(mode) => write!(f, "Chmod {mode}"),
            Self::Trash => write!(f, "Trash"),
            Self::OpenWith(app) => write!(f, "Open with {app}"),
            Self::Move => write!(f, "Move"),
            Self::Rename => write!(f, "Rename"),
            Self::Undo => write!(f, "Undo"),
        }
    }
}

/// An error from a single OS action.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Filesystem or process I/O failed.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The permission string is not an octal mode.
    #[error("Invalid mode '{0}' (expected octal like 644 or 0755)")]
    InvalidMode(String),

    /// Refusing to replace an existing path.
    #[error("'{}' already exists", .0.display())]
    DestinationExists(PathBuf),

    /// The action has no implementation on this platform.
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    /// The clipboard could not be written.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// An external helper exited unsuccessfully.
    #[error("{program} failed: {detail}")]
    CommandFailed { program: String, detail: String },
}

impl ActionError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
