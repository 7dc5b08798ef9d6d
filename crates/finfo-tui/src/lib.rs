//! Interactive terminal session for finfo.
//!
//! This crate drives a single-threaded session loop over a list of files:
//! a paged catalog on the left, a metadata preview produced by the external
//! `finfo` tool on the right, and a batch action engine underneath.
//!
//! # Overview
//!
//! - **Browse** - move focus, page, select, enter and leave directories
//! - **Preview** - debounced, sequence-tagged metadata requests with a
//!   JSON-then-plain fallback
//! - **Act** - open, reveal, copy paths, trash, chmod, clear quarantine,
//!   open with, move to a directory, rename by pattern
//! - **Undo** - reverse moves and renames, most recent first
//!
//! # Usage
//!
//! ```rust,no_run
//! use finfo_core::{ListSource, SessionConfig};
//!
//! let source = ListSource::from_args(vec![]);
//! finfo_tui::run(source, SessionConfig::default()).unwrap();
//! ```
//!
//! # Keyboard
//!
//! - `j`/`k` - Move down/up
//! - `Enter` - Open file or enter directory
//! - `Backspace` - Navigate back
//! - `Space` - Toggle selection
//! - `:` - Action palette
//! - `u` - Undo
//! - `?` - Help
//! - `q` - Quit

pub mod app;
mod event;
pub mod preview;
mod theme;
mod ui;

pub use app::state::{config_path, load_config};
pub use app::{App, AppResult};
pub use theme::Theme;

use finfo_core::{ListSource, SessionConfig};

/// Run an interactive session over `source`.
pub fn run(source: ListSource, config: SessionConfig) -> AppResult<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let app = App::new(source, config);
    let terminal = ratatui::init();
    let result = rt.block_on(app.run(terminal));
    ratatui::restore();

    // Drop outstanding previews and jobs instead of waiting on them
    rt.shutdown_timeout(std::time::Duration::from_millis(100));

    result
}
