//! Debounced preview dispatch.

use crate::preview::{PreviewError, PreviewFormat, PreviewRequest, PreviewStep};

use super::state::SessionMessage;
use super::App;

impl App {
    /// Invalidate the preview for the newly focused item.
    pub(super) fn focus_changed(&mut self) {
        let target = self.catalog.focused().map(|item| item.path.clone());
        if let Some(seq) = self.preview.invalidate(target) {
            self.schedule_preview(seq);
        }
    }

    /// Arm the debounce timer for dispatch `seq`.
    fn schedule_preview(&self, seq: u64) {
        let tx = self.tx.clone();
        let delay = self.config.debounce();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(SessionMessage::DebounceElapsed { seq }).await;
        });
    }

    /// Issue the structured request for `seq` without waiting for the
    /// debounce.
    pub(super) fn dispatch_preview(&mut self, seq: u64) {
        self.debounce_elapsed(seq);
    }

    pub(super) fn debounce_elapsed(&mut self, seq: u64) {
        if let Some(request) = self.preview.debounce_elapsed(seq) {
            self.spawn_preview(seq, request);
        }
    }

    /// Run the tool off-loop under the configured timeout.
    fn spawn_preview(&self, seq: u64, request: PreviewRequest) {
        let tx = self.tx.clone();
        let timeout = self.config.preview_timeout();
        let format = request.format;
        tracing::debug!(seq, path = %request.path.display(), ?format, "preview dispatch");
        let describe = self.tool.describe(request);

        tokio::spawn(async move {
            let output = tokio::time::timeout(timeout, describe)
                .await
                .unwrap_or(Err(PreviewError::Timeout(timeout)));
            let _ = tx
                .send(SessionMessage::PreviewReady {
                    seq,
                    format,
                    output,
                })
                .await;
        });
    }

    pub(super) fn preview_ready(
        &mut self,
        seq: u64,
        format: PreviewFormat,
        output: Result<String, PreviewError>,
    ) {
        match self.preview.apply(seq, format, output) {
            PreviewStep::Stale => {}
            PreviewStep::Fallback(request) => self.spawn_preview(seq, request),
            PreviewStep::Shown => {
                if let Some(error) = self.preview.error() {
                    let message = format!("Preview: {error}");
                    self.set_status(false, message);
                }
            }
        }
    }
}
