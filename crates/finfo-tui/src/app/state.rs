//! Application state types and enums.

use std::collections::HashSet;
use std::path::PathBuf;

use finfo_core::{Item, ListSource, SessionConfig};
use finfo_ops::{ActionKind, JobComplete, OperationPlan};

use crate::preview::{PreviewError, PreviewFormat};

/// Application mode representing the current UI state.
///
/// The job log is an overlay flag on the app, not a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    List,
    /// Action palette open.
    Actions,
    /// Yes/no gate before a destructive action or a conflicting plan.
    Confirm,
    /// Single-line input for an octal mode.
    Chmod,
    /// Single-line input for an application name.
    OpenWith,
    /// Single-line input for a destination directory.
    MoveToDir,
    /// Single-line input for a rename pattern.
    RenamePattern,
    /// Dry-run plan awaiting confirmation.
    OpsPreview,
    Help,
    Quit,
}

impl Mode {
    /// Modes that read a line of text.
    pub fn is_input(self) -> bool {
        matches!(
            self,
            Self::Chmod | Self::OpenWith | Self::MoveToDir | Self::RenamePattern
        )
    }

    /// Title and prompt for input modes.
    pub fn input_labels(self) -> (&'static str, &'static str) {
        match self {
            Self::Chmod => (" Chmod ", "Octal mode (e.g. 644):"),
            Self::OpenWith => (" Open With ", "Application:"),
            Self::MoveToDir => (" Move To ", "Destination directory:"),
            Self::RenamePattern => (" Rename ", "Pattern ({name} {ext} {n}):"),
            _ => (" Input ", ""),
        }
    }
}

/// Messages from background tasks back into the event loop.
///
/// These are the only way asynchronous work re-enters the session.
#[derive(Debug)]
pub enum SessionMessage {
    /// The debounce timer for preview dispatch `seq` fired.
    DebounceElapsed { seq: u64 },
    /// The metadata tool finished (or timed out) for dispatch `seq`.
    PreviewReady {
        seq: u64,
        format: PreviewFormat,
        output: Result<String, PreviewError>,
    },
    /// One job from a batch finished.
    JobDone(JobComplete),
    /// A background reload of `source` finished.
    CatalogLoaded {
        source: ListSource,
        result: Result<(Vec<Item>, usize), String>,
    },
}

/// What the confirmation gate will run when affirmed.
#[derive(Debug, Clone)]
pub enum PendingConfirm {
    /// A destructive action over a captured target set.
    Action {
        kind: ActionKind,
        targets: Vec<PathBuf>,
    },
    /// A plan whose destinations conflict.
    Plan(OperationPlan),
}

impl PendingConfirm {
    /// Question shown in the confirmation dialog.
    pub fn prompt(&self) -> String {
        match self {
            Self::Action { kind, targets } => match targets.as_slice() {
                [single] => format!(
                    "{kind} '{}'?",
                    single
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| single.display().to_string())
                ),
                many => format!("{kind} {} items?", many.len()),
            },
            Self::Plan(plan) => format!(
                "{} of {} destinations conflict. {} anyway?",
                plan.conflicts().len(),
                plan.len(),
                plan.kind
            ),
        }
    }
}

/// Saved state for returning from a directory.
#[derive(Debug, Clone)]
pub struct BackFrame {
    pub source: ListSource,
    pub focus: usize,
    pub selected: HashSet<PathBuf>,
}

/// Get the config file path.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("finfo").join("tui.toml"))
}

/// Load settings from disk, or return defaults.
pub fn load_config() -> SessionConfig {
    config_path()
        .and_then(|path| std::fs::read_to_string(&path).ok())
        .map(|content| parse_config(&content))
        .unwrap_or_default()
}

fn parse_config(content: &str) -> SessionConfig {
    match toml::from_str(content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring invalid settings file");
            SessionConfig::default()
        }
    }
}
