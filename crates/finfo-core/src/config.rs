//! Session configuration types.

use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_PAGE_SIZE;

/// Detail level requested from the metadata tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detail {
    /// Short rendering (`--brief`).
    #[default]
    Brief,
    /// Full rendering (`--long`).
    Long,
}

impl Detail {
    /// Command-line flag understood by the metadata tool.
    pub fn flag(self) -> &'static str {
        match self {
            Self::Brief => "--brief",
            Self::Long => "--long",
        }
    }

    /// Switch between brief and long.
    pub fn toggle(self) -> Self {
        match self {
            Self::Brief => Self::Long,
            Self::Long => Self::Brief,
        }
    }
}

/// Configuration for an interactive session.
///
/// Durations are stored in milliseconds so the struct maps directly onto
/// the settings file.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct SessionConfig {
    /// Name or path of the external metadata tool.
    #[builder(default = "\"finfo\".to_string()")]
    pub tool: String,

    /// Delay between a focus change and the preview request.
    #[builder(default = "120")]
    pub debounce_ms: u64,

    /// Upper bound on a single metadata tool invocation.
    #[builder(default = "1500")]
    pub preview_timeout_ms: u64,

    /// Number of items per catalog page.
    #[builder(default = "DEFAULT_PAGE_SIZE")]
    pub page_size: usize,

    /// Whether the preview pane starts visible.
    #[builder(default = "true")]
    pub show_preview: bool,

    /// Initial detail level for previews.
    #[builder(default)]
    pub detail: Detail,

    /// Maximum number of undo records kept.
    #[builder(default = "100")]
    pub undo_capacity: usize,

    /// Maximum number of job log entries kept.
    #[builder(default = "50")]
    pub job_log_capacity: usize,
}

impl SessionConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref tool) = self.tool {
            if tool.trim().is_empty() {
                return Err("Tool name cannot be empty".to_string());
            }
        }
        if self.page_size == Some(0) {
            return Err("Page size must be at least 1".to_string());
        }
        if self.undo_capacity == Some(0) {
            return Err("Undo capacity must be at least 1".to_string());
        }
        Ok(())
    }
}

impl SessionConfig {
    /// Create a new session config builder.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Debounce delay as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Preview timeout as a duration.
    pub fn preview_timeout(&self) -> Duration {
        Duration::from_millis(self.preview_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tool: "finfo".to_string(),
            debounce_ms: 120,
            preview_timeout_ms: 1500,
            page_size: DEFAULT_PAGE_SIZE,
            show_preview: true,
            detail: Detail::Brief,
            undo_capacity: 100,
            job_log_capacity: 50,
        }
    }
}
