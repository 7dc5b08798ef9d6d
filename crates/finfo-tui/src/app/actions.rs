//! Action dispatch, confirmation, dry-run plans and undo.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;

use finfo_ops::{
    parse_mode, start_jobs, ActionKind, Job, JobComplete, JobLogEntry, OperationPlan,
};

use super::constants::PLAN_SCROLL_PAGE;
use super::input::InputState;
use super::palette::PaletteEntry;
use super::state::{Mode, PendingConfirm, SessionMessage};
use super::App;

impl App {
    /// Run a palette entry against the current target set.
    pub(super) fn choose(&mut self, entry: PaletteEntry) {
        self.mode = Mode::List;

        if entry == PaletteEntry::Undo {
            self.undo_last();
            return;
        }

        let targets = self.catalog.target_set();
        if targets.is_empty() {
            self.set_status(false, "Nothing to act on");
            return;
        }

        match entry {
            PaletteEntry::Open => self.dispatch_action(ActionKind::Open, &targets),
            PaletteEntry::Reveal => self.dispatch_action(ActionKind::Reveal, &targets),
            PaletteEntry::CopyPath => self.dispatch_action(ActionKind::CopyPath, &targets),
            PaletteEntry::Trash => self.ask_confirm(PendingConfirm::Action {
                kind: ActionKind::Trash,
                targets,
            }),
            PaletteEntry::ClearQuarantine => self.ask_confirm(PendingConfirm::Action {
                kind: ActionKind::ClearQuarantine,
                targets,
            }),
            PaletteEntry::Chmod => self.begin_input(Mode::Chmod, InputState::new()),
            PaletteEntry::OpenWith => self.begin_input(Mode::OpenWith, InputState::new()),
            PaletteEntry::MoveToDir => self.begin_input(Mode::MoveToDir, InputState::new()),
            PaletteEntry::RenamePattern => {
                self.begin_input(Mode::RenamePattern, InputState::with_initial("{name}{ext}"))
            }
            PaletteEntry::Undo => {}
        }
    }

    fn begin_input(&mut self, mode: Mode, input: InputState) {
        self.input_state = input;
        self.mode = mode;
    }

    fn ask_confirm(&mut self, pending: PendingConfirm) {
        self.pending_confirm = Some(pending);
        self.mode = Mode::Confirm;
    }

    /// Handle a submitted line in one of the input modes.
    pub(super) fn submit_input(&mut self, value: String) {
        let value = value.trim().to_string();
        if value.is_empty() {
            self.mode = Mode::List;
            self.set_status(false, "Cancelled: empty input");
            return;
        }

        let targets = self.catalog.target_set();
        if targets.is_empty() {
            self.mode = Mode::List;
            self.set_status(false, "Nothing to act on");
            return;
        }

        match self.mode {
            Mode::Chmod => {
                if let Err(e) = parse_mode(&value) {
                    self.input_state.set_error(e.to_string());
                    return;
                }
                self.mode = Mode::List;
                self.dispatch_action(ActionKind::Chmod(value), &targets);
            }
            Mode::OpenWith => {
                self.mode = Mode::List;
                self.dispatch_action(ActionKind::OpenWith(value), &targets);
            }
            Mode::MoveToDir => {
                let dir = self.resolve_destination(&value);
                if dir.exists() && !dir.is_dir() {
                    self.input_state
                        .set_error(format!("'{}' is not a directory", dir.display()));
                    return;
                }
                let plan = OperationPlan::move_to_dir(&targets, &dir);
                if plan.is_empty() {
                    self.mode = Mode::List;
                    self.set_status(false, format!("Already in {}", dir.display()));
                    return;
                }
                self.show_plan(plan);
            }
            Mode::RenamePattern => {
                if value.contains('/') || value.contains('\\') {
                    self.input_state.set_error("Pattern cannot contain path separators");
                    return;
                }
                self.show_plan(OperationPlan::rename_by_pattern(&targets, &value));
            }
            _ => {}
        }
    }

    /// Expand `~` and resolve relative paths against the browsed directory.
    fn resolve_destination(&self, value: &str) -> PathBuf {
        let expanded = match value.strip_prefix('~') {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => dirs::home_dir()
                .map(|home| home.join(rest.trim_start_matches('/')))
                .unwrap_or_else(|| PathBuf::from(value)),
            _ => PathBuf::from(value),
        };

        if expanded.is_absolute() {
            return expanded;
        }
        let base = self
            .catalog
            .source()
            .cwd()
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_default();
        base.join(expanded)
    }

    fn show_plan(&mut self, plan: OperationPlan) {
        tracing::debug!(kind = %plan.kind, pairs = plan.len(), "plan computed");
        self.pending_plan = Some(plan);
        self.plan_scroll = 0;
        self.mode = Mode::OpsPreview;
    }

    /// Keys in the dry-run view.
    pub(super) fn handle_plan_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let Some(plan) = self.pending_plan.take() else {
                    self.mode = Mode::List;
                    return;
                };
                if plan.conflicts().is_empty() {
                    self.execute_plan(plan);
                } else {
                    self.ask_confirm(PendingConfirm::Plan(plan));
                }
            }
            KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => {
                self.pending_plan = None;
                self.mode = Mode::List;
                self.set_status(false, "Cancelled");
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.plan_scroll = self.plan_scroll.saturating_add(1).min(self.plan_scroll_max());
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.plan_scroll = self.plan_scroll.saturating_sub(1);
            }
            KeyCode::PageDown => {
                self.plan_scroll = (self.plan_scroll + PLAN_SCROLL_PAGE).min(self.plan_scroll_max());
            }
            KeyCode::PageUp => {
                self.plan_scroll = self.plan_scroll.saturating_sub(PLAN_SCROLL_PAGE);
            }
            KeyCode::Char('?') => self.open_help(),
            _ => {}
        }
    }

    fn plan_scroll_max(&self) -> usize {
        self.pending_plan
            .as_ref()
            .map(|plan| plan.len().saturating_sub(1))
            .unwrap_or(0)
    }

    /// Keys in the confirmation gate.
    pub(super) fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.mode = Mode::List;
                match self.pending_confirm.take() {
                    Some(PendingConfirm::Action { kind, targets }) => {
                        self.dispatch_action(kind, &targets)
                    }
                    Some(PendingConfirm::Plan(plan)) => self.execute_plan(plan),
                    None => {}
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') | KeyCode::Esc => {
                self.pending_confirm = None;
                self.mode = Mode::List;
                self.set_status(false, "Cancelled");
            }
            KeyCode::Char('?') => self.open_help(),
            _ => {}
        }
    }

    fn execute_plan(&mut self, plan: OperationPlan) {
        tracing::info!(kind = %plan.kind, pairs = plan.len(), argument = %plan.argument, "executing plan");
        self.mode = Mode::List;
        self.dispatch_jobs(plan.jobs());
    }

    /// Dispatch one action over `targets`.
    pub(super) fn dispatch_action(&mut self, kind: ActionKind, targets: &[PathBuf]) {
        self.dispatch_jobs(Job::for_targets(&kind, targets));
    }

    /// Count, start and forward a batch of jobs.
    ///
    /// Counters move before any job can complete so `running` never reads
    /// zero while work is in flight.
    fn dispatch_jobs(&mut self, jobs: Vec<Job>) {
        let Some(kind) = jobs.first().map(Job::kind) else {
            return;
        };
        let count = jobs.len();

        self.counters.dispatch(count);
        if jobs.iter().any(|job| job.kind().changes_listing()) {
            self.reload_after_jobs = true;
        }

        tracing::info!(action = %kind, count, "dispatching jobs");
        let rx = start_jobs(Arc::clone(&self.gateway), jobs);
        adapt_job_rx(rx, self.tx.clone());

        self.set_status(true, format!("{kind}: {count} job(s) started"));
    }

    /// Account for one finished job.
    pub(super) fn job_done(&mut self, done: JobComplete) {
        self.counters.complete(done.is_success());
        self.job_log.push(JobLogEntry::from(&done));
        if let Some(record) = done.undo_record() {
            self.undo.push(record);
        }
        if let (None, Some(to)) = (&done.error, &done.destination) {
            self.catalog.follow_rename(&done.target, to);
        }
        if done.kind == ActionKind::Undo {
            self.settle_undo(&done);
        }

        let name = done
            .target
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| done.target.display().to_string());
        match &done.error {
            None => self.set_status(true, format!("{}: {name}", done.kind)),
            Some(error) => self.set_status(false, format!("{} failed: {error}", done.kind)),
        }

        if self.counters.is_idle() && self.reload_after_jobs {
            self.reload_after_jobs = false;
            self.request_reload();
        }
    }

    /// Reverse the most recent move or rename.
    pub(super) fn undo_last(&mut self) {
        let Some(record) = self.undo.pop() else {
            self.set_status(false, "Nothing to undo");
            return;
        };

        match record.inverse_job() {
            Some(job) => {
                tracing::info!(id = record.id, "undo: {}", record.undo_description());
                let description = record.undo_description();
                self.undo_in_flight.push(record);
                self.dispatch_jobs(vec![job]);
                self.set_status(true, format!("Undo: {description}"));
            }
            None => {
                self.set_status(false, format!("{} cannot be undone", record.kind));
            }
        }
    }

    /// Retire the record behind a finished undo; a failed undo goes back on
    /// the stack so it can be retried.
    fn settle_undo(&mut self, done: &JobComplete) {
        let Some(index) = self.undo_in_flight.iter().position(|record| {
            record.to == done.target && done.destination.as_ref() == Some(&record.from)
        }) else {
            return;
        };
        let record = self.undo_in_flight.remove(index);
        if done.error.is_some() {
            tracing::warn!(id = record.id, "undo failed, record kept");
            self.undo.push(record);
        }
    }
}

/// Forward job completions into the session channel.
fn adapt_job_rx(mut rx: mpsc::Receiver<JobComplete>, tx: mpsc::Sender<SessionMessage>) {
    tokio::spawn(async move {
        while let Some(done) = rx.recv().await {
            if tx.send(SessionMessage::JobDone(done)).await.is_err() {
                break;
            }
        }
    });
}
