//! Sequenced preview state.
//!
//! Every focus change bumps a counter. Debounce ticks and tool results carry
//! the counter value that was current when they were scheduled, and anything
//! older than the current value is dropped on arrival.

use std::path::{Path, PathBuf};

use finfo_core::Detail;

use super::report::FileReport;
use super::tool::{PreviewError, PreviewFormat, PreviewRequest};

/// What the preview pane currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreviewContent {
    /// Nothing focused, or the pane is hidden.
    #[default]
    Empty,
    /// A request for the focused item is scheduled or in flight.
    Pending,
    /// Parsed structured output.
    Report(FileReport),
    /// Plain-text output (or the raw structured output when parsing failed).
    Text(String),
    /// The tool could not describe the item.
    Error(String),
}

/// What the session should do after a result was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewStep {
    /// The result belonged to an older dispatch and was ignored.
    Stale,
    /// The pane was updated.
    Shown,
    /// Structured output was unusable; issue this plain request under the
    /// same sequence number.
    Fallback(PreviewRequest),
}

#[derive(Debug)]
pub struct PreviewState {
    seq: u64,
    visible: bool,
    detail: Detail,
    target: Option<PathBuf>,
    /// Unparseable structured output, kept for when the plain request
    /// yields nothing.
    last_raw: Option<String>,
    last_error: Option<String>,
    content: PreviewContent,
}

impl PreviewState {
    pub fn new(visible: bool, detail: Detail) -> Self {
        Self {
            seq: 0,
            visible,
            detail,
            target: None,
            last_raw: None,
            last_error: None,
            content: PreviewContent::Empty,
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn detail(&self) -> Detail {
        self.detail
    }

    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    pub fn content(&self) -> &PreviewContent {
        &self.content
    }

    /// Whether `seq` is the latest dispatch.
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.seq
    }

    /// Start a new dispatch for `target`.
    ///
    /// Always advances the counter so that anything in flight becomes stale.
    /// Returns the new sequence number when a request should be scheduled.
    pub fn invalidate(&mut self, target: Option<PathBuf>) -> Option<u64> {
        self.seq += 1;
        self.target = target;
        self.last_raw = None;
        self.last_error = None;

        if self.visible && self.target.is_some() {
            self.content = PreviewContent::Pending;
            Some(self.seq)
        } else {
            self.content = PreviewContent::Empty;
            None
        }
    }

    /// Show or hide the pane. Showing it schedules a dispatch for the
    /// current target; hiding it makes in-flight results stale.
    pub fn toggle_visible(&mut self) -> Option<u64> {
        self.visible = !self.visible;
        let target = self.target.take();
        self.invalidate(target)
    }

    /// Switch between brief and long output and re-dispatch.
    pub fn toggle_detail(&mut self) -> Option<u64> {
        self.detail = self.detail.toggle();
        let target = self.target.take();
        self.invalidate(target)
    }

    /// Request for the current target in `format`, if the pane is showing
    /// anything.
    pub fn request(&self, format: PreviewFormat) -> Option<PreviewRequest> {
        if !self.visible {
            return None;
        }
        self.target.as_ref().map(|path| PreviewRequest {
            path: path.clone(),
            detail: self.detail,
            format,
        })
    }

    /// The structured request to issue once the debounce for `seq` elapsed.
    pub fn debounce_elapsed(&self, seq: u64) -> Option<PreviewRequest> {
        if !self.is_current(seq) {
            tracing::trace!(seq, current = self.seq, "debounce superseded");
            return None;
        }
        self.request(PreviewFormat::Json)
    }

    /// Apply a tool result tagged with `seq`.
    pub fn apply(
        &mut self,
        seq: u64,
        format: PreviewFormat,
        output: Result<String, PreviewError>,
    ) -> PreviewStep {
        if !self.is_current(seq) {
            tracing::debug!(seq, current = self.seq, "dropping stale preview");
            return PreviewStep::Stale;
        }

        match format {
            PreviewFormat::Json => match output {
                Ok(raw) => match FileReport::parse(&raw) {
                    Ok(report) => {
                        self.content = PreviewContent::Report(report);
                        PreviewStep::Shown
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "structured preview unusable");
                        if !raw.trim().is_empty() {
                            self.last_raw = Some(raw);
                        }
                        self.fallback()
                    }
                },
                Err(err) if err.is_retryable() => {
                    self.last_error = Some(err.to_string());
                    self.fallback()
                }
                Err(err) => {
                    self.content = PreviewContent::Error(err.to_string());
                    PreviewStep::Shown
                }
            },
            PreviewFormat::Plain => {
                let error = match output {
                    Ok(text) if !text.trim().is_empty() => {
                        self.content = PreviewContent::Text(text);
                        return PreviewStep::Shown;
                    }
                    Ok(_) => None,
                    Err(err) => Some(err.to_string()),
                };

                self.content = match (self.last_raw.take(), error.or(self.last_error.take())) {
                    (Some(raw), _) => PreviewContent::Text(raw),
                    (None, Some(error)) => PreviewContent::Error(error),
                    (None, None) => PreviewContent::Error("No metadata available".to_string()),
                };
                PreviewStep::Shown
            }
        }
    }

    /// The error currently shown, if any.
    pub fn error(&self) -> Option<&str> {
        match &self.content {
            PreviewContent::Error(message) => Some(message),
            _ => None,
        }
    }

    fn fallback(&mut self) -> PreviewStep {
        match self.request(PreviewFormat::Plain) {
            Some(request) => PreviewStep::Fallback(request),
            None => {
                self.content = PreviewContent::Empty;
                PreviewStep::Shown
            }
        }
    }
}
