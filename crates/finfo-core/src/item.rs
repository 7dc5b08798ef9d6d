//! A single browsable filesystem entry.

use std::path::{Path, PathBuf};

/// A filesystem entry in the catalog.
///
/// Identity is the path: two items with the same path are the same item
/// regardless of their other fields.
#[derive(Debug, Clone)]
pub struct Item {
    /// Path of the entry (absolute for directory listings).
    pub path: PathBuf,
    /// Whether the entry is a directory.
    pub is_dir: bool,
    /// Whether the entry is part of the current selection.
    pub selected: bool,
}

impl Item {
    /// Create an unselected item.
    pub fn new(path: impl Into<PathBuf>, is_dir: bool) -> Self {
        Self {
            path: path.into(),
            is_dir,
            selected: false,
        }
    }

    /// Base name for display, falling back to the whole path for roots.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }

    /// The item's path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Item {}
