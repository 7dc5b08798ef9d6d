//! OS action gateway.
//!
//! Every method performs exactly one system call or helper invocation for
//! one target and reports success or failure. Methods are synchronous and
//! are driven from blocking tasks by the executor.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::conflict::unique_destination;
use crate::ActionError;

/// Abstraction over the OS calls the session can trigger.
///
/// The session only ever needs success or failure back, so implementations
/// are free to be thin wrappers. Tests substitute a recording gateway.
pub trait ActionGateway: Send + Sync {
    /// Open with the default handler.
    fn open(&self, path: &Path) -> Result<(), ActionError>;

    /// Show the path in the platform file manager.
    fn reveal(&self, path: &Path) -> Result<(), ActionError>;

    /// Copy all paths to the clipboard as one newline-joined payload.
    fn copy_paths(&self, paths: &[PathBuf]) -> Result<(), ActionError>;

    /// Remove the download quarantine attribute.
    fn clear_quarantine(&self, path: &Path) -> Result<(), ActionError>;

    /// Set permissions from an octal string such as `644` or `0755`.
    fn chmod(&self, path: &Path, mode: &str) -> Result<(), ActionError>;

    /// Move to the trash, falling back as far as permanent removal.
    fn trash(&self, path: &Path) -> Result<(), ActionError>;

    /// Open with a named application.
    fn open_with(&self, path: &Path, app: &str) -> Result<(), ActionError>;

    /// Rename without replacing an existing destination.
    fn rename(&self, from: &Path, to: &Path) -> Result<(), ActionError>;

    /// Create a directory and its parents.
    fn make_dir(&self, path: &Path) -> Result<(), ActionError>;
}

/// Gateway backed by the real filesystem and desktop helpers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGateway;

impl ActionGateway for SystemGateway {
    fn open(&self, path: &Path) -> Result<(), ActionError> {
        open::that_detached(path).map_err(|e| ActionError::io(path, e))
    }

    fn reveal(&self, path: &Path) -> Result<(), ActionError> {
        if cfg!(target_os = "macos") {
            run_helper(Command::new("open").arg("-R").arg(path))
        } else if cfg!(windows) {
            let mut arg = std::ffi::OsString::from("/select,");
            arg.push(path);
            // explorer exits non-zero even on success
            Command::new("explorer")
                .arg(arg)
                .spawn()
                .map(drop)
                .map_err(|e| ActionError::io(path, e))
        } else {
            let folder = if path.is_dir() {
                path
            } else {
                path.parent().unwrap_or(path)
            };
            open::that_detached(folder).map_err(|e| ActionError::io(folder, e))
        }
    }

    fn copy_paths(&self, paths: &[PathBuf]) -> Result<(), ActionError> {
        let payload = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");

        clipboard_anywhere::set_clipboard(&payload)
            .map_err(|e| ActionError::Clipboard(e.to_string()))
    }

    fn clear_quarantine(&self, path: &Path) -> Result<(), ActionError> {
        if !cfg!(target_os = "macos") {
            return Err(ActionError::Unsupported("Clearing quarantine"));
        }

        let output = Command::new("xattr")
            .args(["-d", "com.apple.quarantine"])
            .arg(path)
            .output()
            .map_err(|e| ActionError::io(path, e))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        // Nothing to clear counts as cleared
        if output.status.success() || stderr.contains("No such xattr") {
            Ok(())
        } else {
            Err(ActionError::CommandFailed {
                program: "xattr".into(),
                detail: stderr.trim().to_string(),
            })
        }
    }

    fn chmod(&self, path: &Path, mode: &str) -> Result<(), ActionError> {
        let bits = parse_mode(mode)?;
        set_mode(path, bits)
    }

    fn trash(&self, path: &Path) -> Result<(), ActionError> {
        match trash::delete(path) {
            Ok(()) => return Ok(()),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "native trash failed"),
        }

        if let Some(bin) = fallback_trash_dir() {
            match relocate(path, &bin) {
                Ok(dest) => {
                    tracing::info!(from = %path.display(), to = %dest.display(), "relocated to trash");
                    return Ok(());
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "trash relocation failed"),
            }
        }

        tracing::warn!(path = %path.display(), "removing permanently");
        let meta = path
            .symlink_metadata()
            .map_err(|e| ActionError::io(path, e))?;
        let result = if meta.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        result.map_err(|e| ActionError::io(path, e))
    }

    fn open_with(&self, path: &Path, app: &str) -> Result<(), ActionError> {
        open::with_detached(path, app).map_err(|e| ActionError::io(path, e))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), ActionError> {
        if to.symlink_metadata().is_ok() {
            return Err(ActionError::DestinationExists(to.to_path_buf()));
        }
        fs::rename(from, to).map_err(|e| ActionError::io(from, e))
    }

    fn make_dir(&self, path: &Path) -> Result<(), ActionError> {
        fs::create_dir_all(path).map_err(|e| ActionError::io(path, e))
    }
}

/// Parse an octal permission string.
pub fn parse_mode(mode: &str) -> Result<u32, ActionError> {
    let trimmed = mode.trim();
    let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);

    match u32::from_str_radix(digits, 8) {
        Ok(bits) if !digits.is_empty() && bits <= 0o7777 => Ok(bits),
        _ => Err(ActionError::InvalidMode(mode.to_string())),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, bits: u32) -> Result<(), ActionError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(bits))
        .map_err(|e| ActionError::io(path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _bits: u32) -> Result<(), ActionError> {
    Err(ActionError::Unsupported("Changing permissions"))
}

fn run_helper(cmd: &mut Command) -> Result<(), ActionError> {
    let program = cmd.get_program().to_string_lossy().to_string();
    let output = cmd.output().map_err(|e| ActionError::CommandFailed {
        program: program.clone(),
        detail: e.to_string(),
    })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(ActionError::CommandFailed {
            program,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

fn fallback_trash_dir() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|home| home.join(".Trash"))
    } else {
        dirs::data_local_dir().map(|data| data.join("Trash").join("files"))
    }
}

fn relocate(path: &Path, bin: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(bin)?;
    let name = path.file_name().unwrap_or(path.as_os_str());
    let dest = unique_destination(&bin.join(name), &Default::default());
    fs::rename(path, &dest)?;
    Ok(dest)
}
