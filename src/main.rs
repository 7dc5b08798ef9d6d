//! finfo-tui - browse files, preview their metadata and act on them in batches.
//!
//! Usage:
//!   finfo-tui                 Browse the current directory
//!   finfo-tui DIR             Browse DIR
//!   finfo-tui FILE...         Browse an explicit list of paths
//!   finfo-tui --help          Show help

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use finfo_core::{Detail, ListSource, SessionConfig};

/// Default log file name inside the cache directory.
const LOG_FILE_NAME: &str = "finfo-tui.log";

#[derive(Parser)]
#[command(
    name = "finfo-tui",
    version,
    about = "Interactive file browser with finfo metadata previews",
    long_about = "finfo-tui lists files, previews their metadata using the external \
                  `finfo` tool and runs batch actions (open, trash, chmod, move, \
                  rename by pattern) with a dry run and multi-level undo.\n\n\
                  Settings are read from ~/.config/finfo/tui.toml; flags override them."
)]
struct Cli {
    /// A directory to browse, or several paths to list (defaults to the
    /// current directory)
    paths: Vec<PathBuf>,

    /// Name or path of the metadata tool
    #[arg(long, value_name = "NAME")]
    tool: Option<String>,

    /// Delay before a focused item is previewed
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Upper bound on a single metadata tool run
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Items per page
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Start with long previews
    #[arg(short, long)]
    long: bool,

    /// Start with the preview pane hidden
    #[arg(long)]
    no_preview: bool,

    /// Write logs here instead of the cache directory
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Layer flags over the settings file.
    fn apply(&self, base: SessionConfig) -> Result<SessionConfig> {
        let mut builder = SessionConfig::builder();
        builder
            .tool(self.tool.clone().unwrap_or(base.tool))
            .debounce_ms(self.debounce_ms.unwrap_or(base.debounce_ms))
            .preview_timeout_ms(self.timeout_ms.unwrap_or(base.preview_timeout_ms))
            .page_size(self.page_size.unwrap_or(base.page_size))
            .show_preview(base.show_preview && !self.no_preview)
            .detail(if self.long { Detail::Long } else { base.detail })
            .undo_capacity(base.undo_capacity)
            .job_log_capacity(base.job_log_capacity);

        builder.build().map_err(|e| eyre!("Invalid settings: {e}"))
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let _log_guard = init_logging(cli.log_file.as_deref());

    let config = cli.apply(finfo_tui::load_config())?;
    tracing::info!(?config, "starting session");

    let source = ListSource::from_args(cli.paths);
    finfo_tui::run(source, config)
}

/// Log to a file, since the terminal belongs to the session.
///
/// Logging is best effort; the session runs without it.
fn init_logging(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => dirs::cache_dir()?.join("finfo").join(LOG_FILE_NAME),
    };
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty())?;
    let name = path.file_name()?;

    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("Warning: cannot create log directory {}: {e}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("FINFO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    match installed {
        Ok(()) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e}");
            None
        }
    }
}
