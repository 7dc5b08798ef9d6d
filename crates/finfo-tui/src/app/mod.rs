//! Session state machine and event loop.

mod actions;
mod constants;
pub mod input;
mod navigation;
mod palette;
mod previewing;
mod render;
pub mod state;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;

use finfo_core::{Catalog, ListSource, SessionConfig};
use finfo_ops::{
    ActionGateway, ExecutedOperation, JobCounters, JobLog, OperationPlan, SystemGateway,
    UndoStack,
};

use crate::event::KeyAction;
use crate::preview::{MetadataTool, PreviewState, ProcessTool};
use crate::theme::Theme;

use self::constants::{MESSAGE_CHANNEL_SIZE, TICK_INTERVAL_MS};
use self::input::{InputResult, InputState};
use self::palette::PaletteEntry;
use self::render::{render_app, RenderContext};
use self::state::{BackFrame, Mode, PendingConfirm, SessionMessage};

/// Application result type.
pub type AppResult<T> = color_eyre::Result<T>;

/// The interactive session.
///
/// All state lives here and is mutated only by the event loop; background
/// work reports back through `SessionMessage`s.
pub struct App {
    config: SessionConfig,
    /// Current mode.
    mode: Mode,
    /// Mode to return to when help closes.
    help_return: Mode,
    catalog: Catalog,
    /// Directories to return to, most recent last.
    history: Vec<BackFrame>,
    preview: PreviewState,
    tool: Arc<dyn MetadataTool>,
    gateway: Arc<dyn ActionGateway>,
    counters: JobCounters,
    job_log: JobLog,
    undo: UndoStack,
    /// Undo records whose inverse job is still running.
    undo_in_flight: Vec<ExecutedOperation>,
    /// Job log overlay, independent of mode.
    show_job_log: bool,
    /// Line editor for the input modes.
    input_state: InputState,
    palette_index: usize,
    pending_confirm: Option<PendingConfirm>,
    /// Plan shown in the dry-run view.
    pending_plan: Option<OperationPlan>,
    plan_scroll: usize,
    /// Reload the catalog once the running batch drains.
    reload_after_jobs: bool,
    /// Last status message and whether it reports success.
    operation_message: Option<(bool, String)>,
    theme: Theme,
    tx: mpsc::Sender<SessionMessage>,
    rx: mpsc::Receiver<SessionMessage>,
    needs_redraw: bool,
}

impl App {
    /// Create a session that runs the configured metadata tool and real OS
    /// actions.
    pub fn new(source: ListSource, config: SessionConfig) -> Self {
        let tool = Arc::new(ProcessTool::new(config.tool.clone()));
        Self::with_collaborators(source, config, tool, Arc::new(SystemGateway))
    }

    /// Create a session with explicit collaborators.
    ///
    /// The initial listing is read synchronously; no background work starts
    /// until [`App::run`].
    pub fn with_collaborators(
        source: ListSource,
        config: SessionConfig,
        tool: Arc<dyn MetadataTool>,
        gateway: Arc<dyn ActionGateway>,
    ) -> Self {
        let (tx, rx) = mpsc::channel(MESSAGE_CHANNEL_SIZE);

        let mut app = Self {
            mode: Mode::List,
            help_return: Mode::List,
            catalog: Catalog::new(source.clone(), config.page_size),
            history: Vec::new(),
            preview: PreviewState::new(config.show_preview, config.detail),
            tool,
            gateway,
            counters: JobCounters::default(),
            job_log: JobLog::new(config.job_log_capacity),
            undo: UndoStack::new(config.undo_capacity),
            undo_in_flight: Vec::new(),
            show_job_log: false,
            input_state: InputState::new(),
            palette_index: 0,
            pending_confirm: None,
            pending_plan: None,
            plan_scroll: 0,
            reload_after_jobs: false,
            operation_message: None,
            theme: Theme::default(),
            tx,
            rx,
            needs_redraw: true,
            config,
        };

        app.switch_to(source);
        app
    }

    /// Run the application main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> AppResult<()> {
        self.focus_changed();

        let period = Duration::from_millis(TICK_INTERVAL_MS);
        let mut interval = tokio::time::interval(period);
        let mut events = EventStream::new();

        while self.mode != Mode::Quit {
            if self.needs_redraw {
                terminal.draw(|frame| self.render(frame))?;
                self.needs_redraw = false;
            }

            tokio::select! {
                biased;

                Some(Ok(event)) = events.next() => {
                    if let Event::Key(key_event) = event {
                        if key_event.kind == KeyEventKind::Press {
                            self.handle_key(key_event);
                        }
                    }
                    self.needs_redraw = true;
                }

                Some(message) = self.rx.recv() => {
                    self.handle_message(message);
                    self.needs_redraw = true;
                }

                _ = interval.tick() => {
                    // Periodic tick keeps the loop responsive to resizes
                }
            }
        }

        tracing::info!(
            done = self.counters.done,
            failed = self.counters.failed,
            "session ended"
        );
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn set_status(&mut self, success: bool, message: impl Into<String>) {
        self.operation_message = Some((success, message.into()));
    }

    /// Route a key press according to the current mode.
    fn handle_key(&mut self, key: KeyEvent) {
        if self.mode != Mode::Help
            && key.code == KeyCode::Char('c')
            && key.modifiers == KeyModifiers::CONTROL
        {
            self.mode = Mode::Quit;
            return;
        }

        match self.mode {
            Mode::List => self.handle_action(KeyAction::from_key_event(key)),
            Mode::Help => self.handle_help_action(KeyAction::from_key_event(key)),
            Mode::Actions => self.handle_palette_action(KeyAction::from_key_event(key)),
            Mode::Confirm => self.handle_confirm_key(key),
            Mode::OpsPreview => self.handle_plan_key(key),
            Mode::Chmod | Mode::OpenWith | Mode::MoveToDir | Mode::RenamePattern => {
                match self.input_state.handle_key(key) {
                    InputResult::Continue => {}
                    InputResult::Cancel => {
                        self.mode = Mode::List;
                        self.set_status(false, "Cancelled");
                    }
                    InputResult::Submit(value) => self.submit_input(value),
                }
            }
            Mode::Quit => {}
        }
    }

    fn open_help(&mut self) {
        self.help_return = self.mode;
        self.mode = Mode::Help;
    }

    /// Help swallows everything except its close keys.
    fn handle_help_action(&mut self, action: KeyAction) {
        if matches!(
            action,
            KeyAction::ToggleHelp | KeyAction::Quit | KeyAction::Cancel
        ) {
            self.mode = self.help_return;
        }
    }

    /// Handle a key action in list mode.
    fn handle_action(&mut self, action: KeyAction) {
        if let Some(entry) = PaletteEntry::from_action(action) {
            self.choose(entry);
            return;
        }

        match action {
            KeyAction::Quit | KeyAction::ForceQuit => {
                self.mode = Mode::Quit;
            }
            KeyAction::MoveDown => self.move_focus(1),
            KeyAction::MoveUp => self.move_focus(-1),
            KeyAction::JumpToTop => {
                if self.catalog.focus_first() {
                    self.focus_changed();
                }
            }
            KeyAction::JumpToBottom => {
                if self.catalog.focus_last() {
                    self.focus_changed();
                }
            }
            KeyAction::NextPage => {
                if self.catalog.next_page() {
                    self.focus_changed();
                }
            }
            KeyAction::PrevPage => {
                if self.catalog.prev_page() {
                    self.focus_changed();
                }
            }
            KeyAction::Activate => self.activate(),
            KeyAction::EnterDirectory => self.enter_focused_directory(),
            KeyAction::NavigateBack => self.navigate_back(),
            KeyAction::ToggleSelect => self.catalog.toggle_focused(),
            KeyAction::SelectPage => {
                self.catalog.select_visible();
                let count = self.catalog.selected_paths().len();
                self.set_status(true, format!("{count} selected"));
            }
            KeyAction::Cancel => {
                // Esc closes the job log first, then clears the selection
                if self.show_job_log {
                    self.show_job_log = false;
                } else if self.catalog.clear_selection() {
                    self.set_status(true, "Selection cleared");
                }
            }
            KeyAction::OpenPalette => {
                self.palette_index = 0;
                self.mode = Mode::Actions;
            }
            KeyAction::TogglePreview => {
                if let Some(seq) = self.preview.toggle_visible() {
                    self.dispatch_preview(seq);
                }
            }
            KeyAction::ToggleDetail => {
                if let Some(seq) = self.preview.toggle_detail() {
                    self.dispatch_preview(seq);
                }
            }
            KeyAction::ToggleJobLog => {
                self.show_job_log = !self.show_job_log;
            }
            KeyAction::ToggleHelp => self.open_help(),
            KeyAction::Refresh => {
                self.request_reload();
                self.set_status(true, "Refreshing…");
            }
            _ => {}
        }
    }

    /// Handle a key action while the palette is open.
    fn handle_palette_action(&mut self, action: KeyAction) {
        let entries = PaletteEntry::all();
        let last = entries.len().saturating_sub(1);

        match action {
            KeyAction::MoveDown => {
                self.palette_index = (self.palette_index + 1).min(last);
            }
            KeyAction::MoveUp => {
                self.palette_index = self.palette_index.saturating_sub(1);
            }
            KeyAction::JumpToTop => self.palette_index = 0,
            KeyAction::JumpToBottom => self.palette_index = last,
            KeyAction::Activate => {
                if let Some(&entry) = entries.get(self.palette_index) {
                    self.choose(entry);
                }
            }
            KeyAction::Cancel | KeyAction::Quit | KeyAction::OpenPalette => {
                self.mode = Mode::List;
            }
            KeyAction::ToggleHelp => self.open_help(),
            other => {
                if let Some(entry) = PaletteEntry::from_action(other) {
                    self.choose(entry);
                }
            }
        }
    }

    /// Handle a completion message from background work.
    fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::DebounceElapsed { seq } => self.debounce_elapsed(seq),
            SessionMessage::PreviewReady {
                seq,
                format,
                output,
            } => self.preview_ready(seq, format, output),
            SessionMessage::JobDone(done) => self.job_done(done),
            SessionMessage::CatalogLoaded { source, result } => {
                self.catalog_loaded(source, result)
            }
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let ctx = RenderContext {
            mode: self.mode,
            help_return: self.help_return,
            theme: &self.theme,
            catalog: &self.catalog,
            depth: self.history.len(),
            preview: &self.preview,
            counters: &self.counters,
            job_log: self.show_job_log.then_some(&self.job_log),
            undo_depth: self.undo.len(),
            input_state: &self.input_state,
            palette_index: self.palette_index,
            pending_confirm: self.pending_confirm.as_ref(),
            pending_plan: self.pending_plan.as_ref(),
            plan_scroll: self.plan_scroll,
            operation_message: self.operation_message.as_ref(),
        };

        render_app(&ctx, area, buf);
    }
}
