//! Destination disambiguation for planned moves.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Return `path` itself if it is free, else the first free auto-renamed path.
///
/// A path is free when nothing exists there on disk and it has not already
/// been claimed by an earlier entry of the same plan.
pub fn unique_destination(path: &Path, claimed: &HashSet<PathBuf>) -> PathBuf {
    if is_free(path, claimed) {
        path.to_path_buf()
    } else {
        auto_rename_path(path, claimed)
    }
}

/// Generate an auto-renamed path to avoid conflicts.
///
/// For "file.txt", tries "file (1).txt", "file (2).txt", etc.
pub fn auto_rename_path(path: &Path, claimed: &HashSet<PathBuf>) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().to_string());

    for i in 1..10_000 {
        let new_name = match &extension {
            Some(ext) => format!("{stem} ({i}).{ext}"),
            None => format!("{stem} ({i})"),
        };

        let new_path = parent.join(&new_name);
        if is_free(&new_path, claimed) {
            return new_path;
        }
    }

    // Fallback: use timestamp
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    let new_name = match &extension {
        Some(ext) => format!("{stem}_{timestamp}.{ext}"),
        None => format!("{stem}_{timestamp}"),
    };

    parent.join(&new_name)
}

fn is_free(path: &Path, claimed: &HashSet<PathBuf>) -> bool {
    // symlink_metadata so dangling links still count as taken
    path.symlink_metadata().is_err() && !claimed.contains(path)
}
