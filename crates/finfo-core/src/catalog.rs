//! The item catalog: ordering, selection and pagination.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::{CatalogError, Item};

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// Where the catalog's items come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListSource {
    /// Explicit paths, shown in argument order.
    Arguments(Vec<PathBuf>),
    /// Immediate children of a directory.
    Directory(PathBuf),
}

impl ListSource {
    /// Build a source from command-line paths.
    ///
    /// No paths browses the current directory, a single directory browses
    /// that directory, anything else lists the paths themselves.
    pub fn from_args(paths: Vec<PathBuf>) -> Self {
        match paths.as_slice() {
            [] => Self::Directory(absolutize(Path::new("."))),
            [single] if single.is_dir() => Self::Directory(absolutize(single)),
            _ => Self::Arguments(paths.iter().map(|p| absolutize(p)).collect()),
        }
    }

    /// The browsed directory, if this is a directory listing.
    pub fn cwd(&self) -> Option<&Path> {
        match self {
            Self::Directory(dir) => Some(dir),
            Self::Arguments(_) => None,
        }
    }

    /// Read the items for this source from the filesystem.
    ///
    /// Argument paths that cannot be read are skipped and returned alongside
    /// the items; a directory that cannot be listed is an error.
    pub fn load(&self) -> Result<(Vec<Item>, Vec<CatalogError>), CatalogError> {
        match self {
            Self::Directory(dir) => scan_directory(dir).map(|items| (items, Vec::new())),
            Self::Arguments(paths) => Ok(stat_arguments(paths)),
        }
    }

    /// Point an argument listing at a path's new location.
    ///
    /// Returns false when `from` is not one of the listed paths; directory
    /// listings never change.
    pub fn replace_path(&mut self, from: &Path, to: &Path) -> bool {
        let Self::Arguments(paths) = self else {
            return false;
        };
        match paths.iter_mut().find(|path| path.as_path() == from) {
            Some(path) => {
                *path = to.to_path_buf();
                true
            }
            None => false,
        }
    }

    /// Short label for the header line.
    pub fn label(&self) -> String {
        match self {
            Self::Directory(dir) => dir.display().to_string(),
            Self::Arguments(paths) => format!("{} paths", paths.len()),
        }
    }
}

fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// List the immediate children of a directory.
///
/// Directories come first, then files, each case-insensitively by base name;
/// ties fall back to the full path so the order is deterministic.
pub fn scan_directory(dir: &Path) -> Result<Vec<Item>, CatalogError> {
    if !dir.is_dir() {
        if dir.exists() {
            return Err(CatalogError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        return Err(CatalogError::NotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = fs::read_dir(dir).map_err(|e| CatalogError::io(dir, e))?;

    let mut items: Vec<Item> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => {
                let path = entry.path();
                let is_dir = path.is_dir();
                Some(Item::new(path, is_dir))
            }
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .collect();

    items.sort_by(compare_items);
    Ok(items)
}

fn compare_items(a: &Item, b: &Item) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        .then_with(|| a.path.cmp(&b.path))
}

/// Stat explicit paths, keeping argument order.
pub fn stat_arguments(paths: &[PathBuf]) -> (Vec<Item>, Vec<CatalogError>) {
    paths
        .iter()
        .map(|path| {
            fs::metadata(path)
                .map(|meta| Item::new(path.clone(), meta.is_dir()))
                .map_err(|e| CatalogError::io(path, e))
        })
        .partition_result()
}

/// The authoritative ordered view of items plus the visible window into it.
///
/// Focus is an index into the full item list and always lies inside the
/// current page when the catalog is non-empty.
#[derive(Debug, Clone)]
pub struct Catalog {
    source: ListSource,
    items: Vec<Item>,
    /// Selected paths in the order they were selected.
    selection: Vec<PathBuf>,
    page: usize,
    page_size: usize,
    focus: usize,
}

impl Catalog {
    /// Create an empty catalog for a source.
    pub fn new(source: ListSource, page_size: usize) -> Self {
        Self {
            source,
            items: Vec::new(),
            selection: Vec::new(),
            page: 0,
            page_size: page_size.max(1),
            focus: 0,
        }
    }

    /// Create a catalog and populate it from the filesystem.
    pub fn load(
        source: ListSource,
        page_size: usize,
    ) -> Result<(Self, Vec<CatalogError>), CatalogError> {
        let (items, skipped) = source.load()?;
        let mut catalog = Self::new(source, page_size);
        catalog.replace(items);
        Ok((catalog, skipped))
    }

    /// The source the items were loaded from.
    pub fn source(&self) -> &ListSource {
        &self.source
    }

    /// All items, unpaginated.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items in the catalog.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the item set, keeping selection and focus by path.
    pub fn replace(&mut self, items: Vec<Item>) {
        let selected: HashSet<PathBuf> = self.selection.iter().cloned().collect();
        let focused = self.focused().map(|item| item.path.clone());

        self.items = items;
        self.apply_selection(&selected);

        let focus = focused
            .and_then(|path| self.position(&path))
            .unwrap_or(self.focus);
        self.set_focus(focus);
    }

    /// Follow an item that moved on disk so the next reload still finds it.
    pub fn follow_rename(&mut self, from: &Path, to: &Path) -> bool {
        self.source.replace_path(from, to)
    }

    /// Switch to a new source with a fresh item set.
    ///
    /// Selection and focus start over unless restored afterwards.
    pub fn switch_source(&mut self, source: ListSource, items: Vec<Item>) {
        self.source = source;
        self.items = items;
        self.selection.clear();
        self.page = 0;
        self.focus = 0;
    }

    /// Re-apply a captured selection to the current items.
    ///
    /// Paths that are no longer present contribute nothing.
    pub fn restore_selection(&mut self, paths: &HashSet<PathBuf>) {
        self.selection.clear();
        self.apply_selection(paths);
    }

    fn apply_selection(&mut self, selected: &HashSet<PathBuf>) {
        for item in &mut self.items {
            item.selected = selected.contains(&item.path);
        }
        let present: HashSet<&PathBuf> = self
            .items
            .iter()
            .filter(|item| item.selected)
            .map(|item| &item.path)
            .collect();
        let mut kept: Vec<PathBuf> = self
            .selection
            .iter()
            .filter(|path| present.contains(path))
            .cloned()
            .collect();
        // Paths restored from an unordered set follow catalog order
        for item in &self.items {
            if item.selected && !kept.contains(&item.path) {
                kept.push(item.path.clone());
            }
        }
        self.selection = kept;
    }

    fn position(&self, path: &Path) -> Option<usize> {
        self.items.iter().position(|item| item.path == path)
    }

    // --- pagination -------------------------------------------------------

    /// Number of pages (at least one, even when empty).
    pub fn page_count(&self) -> usize {
        self.items.len().div_ceil(self.page_size).max(1)
    }

    /// Current page index.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Current page capacity.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change the page capacity, keeping the focused item visible.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        let focus = self.focus;
        self.set_focus(focus);
    }

    /// Jump to a page, saturating at the bounds.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
        if !self.visible_range().contains(&self.focus) {
            self.focus = self.visible_range().start;
        }
    }

    /// Advance one page. Returns whether the page changed.
    pub fn next_page(&mut self) -> bool {
        let before = self.page;
        self.set_page(self.page.saturating_add(1));
        before != self.page
    }

    /// Go back one page. Returns whether the page changed.
    pub fn prev_page(&mut self) -> bool {
        let before = self.page;
        self.set_page(self.page.saturating_sub(1));
        before != self.page
    }

    /// Index range of the visible window into `items()`.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let start = (self.page * self.page_size).min(self.items.len());
        let end = (start + self.page_size).min(self.items.len());
        start..end
    }

    /// Items on the current page.
    pub fn visible(&self) -> &[Item] {
        &self.items[self.visible_range()]
    }

    // --- focus ------------------------------------------------------------

    /// Focus as an index into `items()`.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Focus relative to the visible window.
    pub fn focus_in_page(&self) -> usize {
        self.focus - self.visible_range().start
    }

    /// The focused item, if any.
    pub fn focused(&self) -> Option<&Item> {
        self.items.get(self.focus)
    }

    /// Focus an index, clamped, and move the page to contain it.
    pub fn set_focus(&mut self, index: usize) {
        self.focus = index.min(self.items.len().saturating_sub(1));
        self.page = (self.focus / self.page_size).min(self.page_count() - 1);
    }

    /// Focus the item with the given path. Returns whether it was found.
    pub fn focus_path(&mut self, path: &Path) -> bool {
        match self.position(path) {
            Some(index) => {
                self.set_focus(index);
                true
            }
            None => false,
        }
    }

    /// Move focus by `delta` items. Returns whether the focus changed.
    pub fn move_focus(&mut self, delta: isize) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let before = self.focus;
        self.set_focus(self.focus.saturating_add_signed(delta));
        before != self.focus
    }

    /// Focus the first item. Returns whether the focus changed.
    pub fn focus_first(&mut self) -> bool {
        let before = self.focus;
        self.set_focus(0);
        before != self.focus
    }

    /// Focus the last item. Returns whether the focus changed.
    pub fn focus_last(&mut self) -> bool {
        let before = self.focus;
        self.set_focus(self.items.len().saturating_sub(1));
        before != self.focus
    }

    // --- selection --------------------------------------------------------

    /// Toggle selection of the focused item.
    pub fn toggle_focused(&mut self) {
        let Some(item) = self.items.get_mut(self.focus) else {
            return;
        };
        item.selected = !item.selected;
        if item.selected {
            self.selection.push(item.path.clone());
        } else {
            let path = item.path.clone();
            self.selection.retain(|p| *p != path);
        }
    }

    /// Select every item on the current page.
    pub fn select_visible(&mut self) {
        let range = self.visible_range();
        for item in &mut self.items[range] {
            if !item.selected {
                item.selected = true;
                self.selection.push(item.path.clone());
            }
        }
    }

    /// Clear the selection. Returns whether anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        let had = !self.selection.is_empty();
        for item in &mut self.items {
            item.selected = false;
        }
        self.selection.clear();
        had
    }

    /// Selected paths in selection order.
    pub fn selected_paths(&self) -> &[PathBuf] {
        &self.selection
    }

    /// Selected paths as a set, for saving and restoring.
    pub fn selected_set(&self) -> HashSet<PathBuf> {
        self.selection.iter().cloned().collect()
    }

    /// The selected items if any, else the focused item alone.
    pub fn target_set(&self) -> Vec<PathBuf> {
        if !self.selection.is_empty() {
            self.selection.clone()
        } else {
            self.focused()
                .map(|item| vec![item.path.clone()])
                .unwrap_or_default()
        }
    }
}
