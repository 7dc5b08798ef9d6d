//! Directory navigation and catalog reloads.

use std::path::Path;

use finfo_core::{Item, ListSource};
use finfo_ops::ActionKind;

use super::state::{BackFrame, SessionMessage};
use super::App;

impl App {
    /// Move focus by `delta` items.
    pub(super) fn move_focus(&mut self, delta: isize) {
        if self.catalog.move_focus(delta) {
            self.focus_changed();
        }
    }

    /// Enter on a directory navigates; on a file it opens.
    pub(super) fn activate(&mut self) {
        let Some(item) = self.catalog.focused() else {
            return;
        };
        if item.is_dir {
            self.enter_focused_directory();
        } else {
            let target = vec![item.path.clone()];
            self.dispatch_action(ActionKind::Open, &target);
        }
    }

    /// Push the current listing and browse the focused directory.
    pub(super) fn enter_focused_directory(&mut self) {
        let Some(dir) = self
            .catalog
            .focused()
            .filter(|item| item.is_dir)
            .map(|item| item.path.clone())
        else {
            return;
        };

        let frame = BackFrame {
            source: self.catalog.source().clone(),
            focus: self.catalog.focus(),
            selected: self.catalog.selected_set(),
        };

        if self.switch_to(ListSource::Directory(dir)) {
            self.history.push(frame);
            self.focus_changed();
        }
    }

    /// Return to the previous listing, or to the parent directory when the
    /// stack is empty.
    pub(super) fn navigate_back(&mut self) {
        if let Some(frame) = self.history.pop() {
            if self.switch_to(frame.source) {
                self.catalog.restore_selection(&frame.selected);
                self.catalog.set_focus(frame.focus);
                self.focus_changed();
            }
            return;
        }

        let Some(cwd) = self.catalog.source().cwd().map(Path::to_path_buf) else {
            return;
        };
        let Some(parent) = cwd.parent() else {
            return;
        };
        if self.switch_to(ListSource::Directory(parent.to_path_buf())) {
            self.catalog.focus_path(&cwd);
            self.focus_changed();
        }
    }

    /// Read `source` synchronously and make it current.
    ///
    /// On failure the current listing stays and the error is shown.
    pub(super) fn switch_to(&mut self, source: ListSource) -> bool {
        match source.load() {
            Ok((items, skipped)) => {
                tracing::debug!(source = %source.label(), items = items.len(), "listing loaded");
                self.catalog.switch_source(source, items);
                self.report_skipped(skipped.len());
                if let Some(first) = skipped.first() {
                    tracing::warn!(error = %first, count = skipped.len(), "skipped unreadable paths");
                }
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot list source");
                self.set_status(false, e.to_string());
                false
            }
        }
    }

    /// Re-read the current source off the loop.
    pub(super) fn request_reload(&mut self) {
        let source = self.catalog.source().clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let to_load = source.clone();
            let result = tokio::task::spawn_blocking(move || to_load.load())
                .await
                .map_err(|e| format!("Reload task failed: {e}"))
                .and_then(|loaded| {
                    loaded
                        .map(|(items, skipped)| (items, skipped.len()))
                        .map_err(|e| e.to_string())
                });
            let _ = tx.send(SessionMessage::CatalogLoaded { source, result }).await;
        });
    }

    /// Apply a background reload if it is for the current source.
    pub(super) fn catalog_loaded(
        &mut self,
        source: ListSource,
        result: Result<(Vec<Item>, usize), String>,
    ) {
        if &source != self.catalog.source() {
            tracing::debug!(source = %source.label(), "dropping reload for previous source");
            return;
        }

        match result {
            Ok((items, skipped)) => {
                self.catalog.replace(items);
                self.report_skipped(skipped);
                self.focus_changed();
            }
            Err(e) => self.set_status(false, format!("Reload failed: {e}")),
        }
    }

    fn report_skipped(&mut self, skipped: usize) {
        if skipped > 0 {
            self.set_status(false, format!("Skipped {skipped} unreadable path(s)"));
        }
    }
}
