//! Client for the external metadata tool.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use futures::future::BoxFuture;
use finfo_core::Detail;
use thiserror::Error;
use tokio::process::Command;

/// Output format requested from the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewFormat {
    /// Structured document (`--json`).
    Json,
    /// Human-readable rendering.
    Plain,
}

/// Why a preview request produced no output.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("metadata tool '{0}' not found")]
    ToolNotFound(String),

    #[error("metadata tool timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("metadata tool exited with {}: {stderr}", exit_label(.code))]
    Exit { code: Option<i32>, stderr: String },

    #[error("failed to run metadata tool: {0}")]
    Spawn(#[source] std::io::Error),
}

impl PreviewError {
    /// Whether a plain-text request might still succeed after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Exit { .. } | Self::Spawn(_))
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// One invocation of the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub path: PathBuf,
    pub detail: Detail,
    pub format: PreviewFormat,
}

impl PreviewRequest {
    /// Arguments in the order the tool expects:
    /// `[--long|--brief] [--json] -- <path>`.
    pub fn args(&self) -> Vec<OsString> {
        let mut args = vec![OsString::from(self.detail.flag())];
        if self.format == PreviewFormat::Json {
            args.push("--json".into());
        }
        args.push("--".into());
        args.push(self.path.clone().into_os_string());
        args
    }
}

/// Something that can describe a path.
///
/// The session treats the tool as a black box; tests substitute a scripted
/// implementation.
pub trait MetadataTool: Send + Sync {
    fn describe(&self, request: PreviewRequest) -> BoxFuture<'static, Result<String, PreviewError>>;
}

/// Runs the tool as a child process.
#[derive(Debug)]
pub struct ProcessTool {
    name: String,
    resolved: OnceLock<Option<PathBuf>>,
}

impl ProcessTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolved: OnceLock::new(),
        }
    }

    /// The tool's location, resolved once per session.
    pub fn program(&self) -> Option<&Path> {
        self.resolved
            .get_or_init(|| {
                let found = resolve_tool(&self.name);
                match &found {
                    Some(path) => tracing::info!(tool = %path.display(), "metadata tool resolved"),
                    None => tracing::warn!(tool = %self.name, "metadata tool not found"),
                }
                found
            })
            .as_deref()
    }
}

impl MetadataTool for ProcessTool {
    fn describe(&self, request: PreviewRequest) -> BoxFuture<'static, Result<String, PreviewError>> {
        let program = self.program().map(Path::to_path_buf);
        let name = self.name.clone();

        Box::pin(async move {
            let program = program.ok_or(PreviewError::ToolNotFound(name))?;

            let output = Command::new(&program)
                .args(request.args())
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output()
                .await
                .map_err(PreviewError::Spawn)?;

            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            } else {
                Err(PreviewError::Exit {
                    code: output.status.code(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                })
            }
        })
    }
}

/// Locate the tool: the search path, then the working directory, then next
/// to the running executable.
pub fn resolve_tool(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    if let Ok(found) = which::which(name) {
        return Some(found);
    }

    let local = Path::new(".").join(name);
    if local.is_file() {
        return Some(std::path::absolute(&local).unwrap_or(local));
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(name)))
        .filter(|adjacent| adjacent.is_file())
}
