//! Headless session tests.
//!
//! Sessions run against a temp directory with a recording gateway and a
//! scripted metadata tool; background messages are drained from the
//! session channel by hand.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use futures::future::BoxFuture;
use tempfile::TempDir;

use finfo_core::{ListSource, SessionConfig};
use finfo_ops::{ActionError, ActionGateway};

use super::state::Mode;
use super::App;
use crate::preview::{MetadataTool, PreviewContent, PreviewError, PreviewFormat, PreviewRequest};

/// Records every call; renames really happen so reloads see them, and
/// refuse to replace an existing path like the system gateway.
#[derive(Default)]
struct RecordingGateway {
    calls: Mutex<Vec<(&'static str, PathBuf)>>,
}

impl RecordingGateway {
    fn record(&self, what: &'static str, path: &Path) -> Result<(), ActionError> {
        self.calls.lock().unwrap().push((what, path.to_path_buf()));
        Ok(())
    }

    fn calls(&self) -> Vec<(&'static str, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ActionGateway for RecordingGateway {
    fn open(&self, path: &Path) -> Result<(), ActionError> {
        self.record("open", path)
    }
    fn reveal(&self, path: &Path) -> Result<(), ActionError> {
        self.record("reveal", path)
    }
    fn copy_paths(&self, paths: &[PathBuf]) -> Result<(), ActionError> {
        self.record("copy", &paths[0])
    }
    fn clear_quarantine(&self, path: &Path) -> Result<(), ActionError> {
        self.record("xattr", path)
    }
    fn chmod(&self, path: &Path, _mode: &str) -> Result<(), ActionError> {
        self.record("chmod", path)
    }
    fn trash(&self, path: &Path) -> Result<(), ActionError> {
        self.record("trash", path)
    }
    fn open_with(&self, path: &Path, _app: &str) -> Result<(), ActionError> {
        self.record("open_with", path)
    }
    fn rename(&self, from: &Path, to: &Path) -> Result<(), ActionError> {
        // Held across the check so concurrent renames cannot race
        let mut calls = self.calls.lock().unwrap();
        calls.push(("rename", from.to_path_buf()));
        if to.symlink_metadata().is_ok() {
            return Err(ActionError::DestinationExists(to.to_path_buf()));
        }
        fs::rename(from, to).map_err(|e| ActionError::io(from, e))
    }
    fn make_dir(&self, path: &Path) -> Result<(), ActionError> {
        self.record("mkdir", path)
    }
}

type Script = Box<dyn Fn(&PreviewRequest) -> Result<String, PreviewError> + Send + Sync>;

/// Answers each request from a script and remembers what was asked.
struct ScriptedTool {
    script: Script,
    requests: Mutex<Vec<(PathBuf, PreviewFormat)>>,
}

impl ScriptedTool {
    fn new(
        script: impl Fn(&PreviewRequest) -> Result<String, PreviewError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Structured output naming the requested file.
    fn json() -> Self {
        Self::new(|request| match request.format {
            PreviewFormat::Json => Ok(format!(
                r#"{{"name": "{}", "size_bytes": 3, "type": "text"}}"#,
                file_name(&request.path)
            )),
            PreviewFormat::Plain => Ok("plain".to_string()),
        })
    }

    fn requests(&self) -> Vec<(PathBuf, PreviewFormat)> {
        self.requests.lock().unwrap().clone()
    }
}

impl MetadataTool for ScriptedTool {
    fn describe(&self, request: PreviewRequest) -> BoxFuture<'static, Result<String, PreviewError>> {
        self.requests
            .lock()
            .unwrap()
            .push((request.path.clone(), request.format));
        let result = (self.script)(&request);
        Box::pin(std::future::ready(result))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().to_string()
}

/// `sub/`, `a.txt` and `b.txt` in a fresh directory.
fn fixture_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("a.txt"), "aaa").unwrap();
    fs::write(dir.path().join("b.txt"), "bbb").unwrap();
    dir
}

fn session(
    dir: &TempDir,
    tool: ScriptedTool,
) -> (App, Arc<RecordingGateway>, Arc<ScriptedTool>) {
    session_for(ListSource::Directory(dir.path().to_path_buf()), tool)
}

fn session_for(
    source: ListSource,
    tool: ScriptedTool,
) -> (App, Arc<RecordingGateway>, Arc<ScriptedTool>) {
    let config = SessionConfig {
        debounce_ms: 1,
        preview_timeout_ms: 2000,
        ..SessionConfig::default()
    };
    let gateway = Arc::new(RecordingGateway::default());
    let tool = Arc::new(tool);
    let app = App::with_collaborators(
        source,
        config,
        Arc::clone(&tool) as Arc<dyn MetadataTool>,
        Arc::clone(&gateway) as Arc<dyn ActionGateway>,
    );
    (app, gateway, tool)
}

fn names(app: &App) -> Vec<String> {
    app.catalog.items().iter().map(|item| item.name()).collect()
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn status(app: &App) -> Option<&str> {
    app.operation_message.as_ref().map(|(_, m)| m.as_str())
}

/// Feed background messages into the session until `done` holds.
async fn pump_until(app: &mut App, what: &str, done: impl Fn(&App) -> bool) {
    while !done(app) {
        let message = tokio::time::timeout(Duration::from_secs(5), app.rx.recv())
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for {what}"))
            .expect("session channel closed");
        app.handle_message(message);
    }
}

#[tokio::test]
async fn test_initial_listing_puts_directories_first() {
    let dir = fixture_dir();
    let (app, _, _) = session(&dir, ScriptedTool::json());

    assert_eq!(names(&app), vec!["sub", "a.txt", "b.txt"]);
    assert_eq!(app.mode, Mode::List);
    assert_eq!(app.catalog.focus(), 0);
}

#[tokio::test]
async fn test_back_restores_focus_and_selection() {
    let dir = fixture_dir();
    let (mut app, _, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Char('k'));
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.catalog.source().cwd(), Some(dir.path().join("sub").as_path()));
    assert_eq!(app.history.len(), 1);
    assert!(app.catalog.is_empty());

    press(&mut app, KeyCode::Backspace);

    assert_eq!(app.catalog.source().cwd(), Some(dir.path()));
    assert!(app.history.is_empty());
    assert_eq!(names(&app), vec!["sub", "a.txt", "b.txt"]);
    assert_eq!(app.catalog.focus(), 0);
    assert_eq!(app.catalog.selected_paths(), &[dir.path().join("a.txt")]);
}

#[tokio::test]
async fn test_back_from_root_listing_focuses_child() {
    let dir = fixture_dir();
    let sub = dir.path().join("sub");
    fs::write(sub.join("inner.txt"), "x").unwrap();

    let (mut app, _, _) = {
        let config = SessionConfig::default();
        let gateway = Arc::new(RecordingGateway::default());
        let tool = Arc::new(ScriptedTool::json());
        let app = App::with_collaborators(
            ListSource::Directory(sub.clone()),
            config,
            Arc::clone(&tool) as Arc<dyn MetadataTool>,
            Arc::clone(&gateway) as Arc<dyn ActionGateway>,
        );
        (app, gateway, tool)
    };

    press(&mut app, KeyCode::Char('h'));

    assert_eq!(app.catalog.source().cwd(), Some(dir.path()));
    assert_eq!(app.catalog.focused().map(|item| item.path.clone()), Some(sub));
}

#[tokio::test]
async fn test_preview_shows_structured_report() {
    let dir = fixture_dir();
    let (mut app, _, tool) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('j'));
    pump_until(&mut app, "report", |app| {
        matches!(app.preview.content(), PreviewContent::Report(_))
    })
    .await;

    let PreviewContent::Report(report) = app.preview.content() else {
        unreachable!();
    };
    assert_eq!(report.name, "a.txt");
    assert_eq!(
        tool.requests(),
        vec![(dir.path().join("a.txt"), PreviewFormat::Json)]
    );
}

#[tokio::test]
async fn test_stale_preview_is_dropped() {
    let dir = fixture_dir();
    let (mut app, _, _) = session(&dir, ScriptedTool::json());

    app.focus_changed();
    let first = app.preview.seq();
    press(&mut app, KeyCode::Char('j'));
    assert!(app.preview.seq() > first);

    app.preview_ready(
        first,
        PreviewFormat::Json,
        Ok(r#"{"name": "sub"}"#.to_string()),
    );
    assert_eq!(app.preview.content(), &PreviewContent::Pending);

    pump_until(&mut app, "current report", |app| {
        matches!(app.preview.content(), PreviewContent::Report(_))
    })
    .await;
    let PreviewContent::Report(report) = app.preview.content() else {
        unreachable!();
    };
    assert_eq!(report.name, "a.txt");
}

#[tokio::test]
async fn test_unparsable_json_falls_back_to_plain() {
    let dir = fixture_dir();
    let tool = ScriptedTool::new(|request| match request.format {
        PreviewFormat::Json => Ok("not json".to_string()),
        PreviewFormat::Plain => Ok("a.txt: ASCII text".to_string()),
    });
    let (mut app, _, tool) = session(&dir, tool);

    press(&mut app, KeyCode::Char('j'));
    pump_until(&mut app, "plain text", |app| {
        matches!(app.preview.content(), PreviewContent::Text(_))
    })
    .await;

    assert_eq!(
        app.preview.content(),
        &PreviewContent::Text("a.txt: ASCII text".to_string())
    );
    let formats: Vec<_> = tool.requests().into_iter().map(|(_, f)| f).collect();
    assert_eq!(formats, vec![PreviewFormat::Json, PreviewFormat::Plain]);
}

#[tokio::test]
async fn test_missing_tool_is_shown_without_fallback() {
    let dir = fixture_dir();
    let tool = ScriptedTool::new(|_| Err(PreviewError::ToolNotFound("finfo".to_string())));
    let (mut app, _, tool) = session(&dir, tool);

    press(&mut app, KeyCode::Char('j'));
    pump_until(&mut app, "error", |app| {
        matches!(app.preview.content(), PreviewContent::Error(_))
    })
    .await;

    assert_eq!(tool.requests().len(), 1);
    assert!(status(&app).unwrap().starts_with("Preview: "));
}

#[tokio::test]
async fn test_hidden_preview_issues_no_requests() {
    let dir = fixture_dir();
    let (mut app, _, tool) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('P'));
    assert!(!app.preview.is_visible());
    press(&mut app, KeyCode::Char('j'));

    tokio::time::sleep(Duration::from_millis(20)).await;
    while let Ok(message) = app.rx.try_recv() {
        app.handle_message(message);
    }
    assert!(tool.requests().is_empty());
    assert_eq!(app.preview.content(), &PreviewContent::Empty);
}

#[tokio::test]
async fn test_trash_declined_runs_nothing() {
    let dir = fixture_dir();
    let (mut app, gateway, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('d'));
    assert_eq!(app.mode, Mode::Confirm);

    // Unrelated keys leave the gate open
    press(&mut app, KeyCode::Char('x'));
    assert_eq!(app.mode, Mode::Confirm);

    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.mode, Mode::List);
    assert_eq!(status(&app), Some("Cancelled"));
    assert!(app.pending_confirm.is_none());
    assert_eq!(app.counters.running, 0);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_trash_confirmed_dispatches_per_target() {
    let dir = fixture_dir();
    let (mut app, gateway, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Char('y'));

    assert_eq!(app.mode, Mode::List);
    assert_eq!(app.counters.running, 2);

    pump_until(&mut app, "trash jobs", |app| app.counters.is_idle()).await;

    assert_eq!(app.counters.done, 2);
    assert_eq!(app.job_log.len(), 2);
    let mut trashed: Vec<_> = gateway
        .calls()
        .into_iter()
        .filter(|(what, _)| *what == "trash")
        .map(|(_, path)| path)
        .collect();
    trashed.sort();
    assert_eq!(trashed, vec![dir.path().join("a.txt"), dir.path().join("b.txt")]);
    // Trash is not reversible
    assert!(app.undo.is_empty());
}

#[tokio::test]
async fn test_enter_on_file_opens_it() {
    let dir = fixture_dir();
    let (mut app, gateway, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('G'));
    press(&mut app, KeyCode::Enter);
    pump_until(&mut app, "open job", |app| app.counters.done == 1).await;

    assert_eq!(gateway.calls(), vec![("open", dir.path().join("b.txt"))]);
}

#[tokio::test]
async fn test_undo_with_empty_stack() {
    let dir = fixture_dir();
    let (mut app, gateway, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('u'));

    assert_eq!(status(&app), Some("Nothing to undo"));
    assert_eq!(app.operation_message.as_ref().map(|(ok, _)| *ok), Some(false));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_rename_plan_executes_reloads_and_undoes() {
    let dir = fixture_dir();
    let (mut app, _, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char(' '));

    press(&mut app, KeyCode::Char('r'));
    assert_eq!(app.mode, Mode::RenamePattern);
    assert_eq!(app.input_state.buffer(), "{name}{ext}");

    app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
    type_text(&mut app, "new-{n}{ext}");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.mode, Mode::OpsPreview);
    let plan = app.pending_plan.as_ref().unwrap();
    assert_eq!(
        plan.pairs,
        vec![
            (dir.path().join("a.txt"), dir.path().join("new-1.txt")),
            (dir.path().join("b.txt"), dir.path().join("new-2.txt")),
        ]
    );

    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.mode, Mode::List);
    assert!(app.pending_plan.is_none());

    pump_until(&mut app, "rename and reload", |app| {
        names(app) == ["sub", "new-1.txt", "new-2.txt"]
    })
    .await;
    assert_eq!(app.counters.done, 2);
    assert_eq!(app.undo.len(), 2);
    assert!(!app.reload_after_jobs);

    press(&mut app, KeyCode::Char('u'));
    assert!(status(&app).unwrap().starts_with("Undo: "));
    press(&mut app, KeyCode::Char('u'));
    assert!(app.undo.is_empty());

    pump_until(&mut app, "undo and reload", |app| {
        names(app) == ["sub", "a.txt", "b.txt"]
    })
    .await;
    assert_eq!(app.counters.done, 4);
    // Undo never records itself
    assert!(app.undo.is_empty());
}

/// Select `a.txt` and `b.txt` and open the rename dry run for `pattern`.
fn plan_rename_of_both(app: &mut App, pattern: &str) {
    press(app, KeyCode::Char('j'));
    press(app, KeyCode::Char(' '));
    press(app, KeyCode::Char('j'));
    press(app, KeyCode::Char(' '));
    press(app, KeyCode::Char('r'));
    app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
    type_text(app, pattern);
    press(app, KeyCode::Enter);
}

#[tokio::test]
async fn test_conflicting_rename_needs_second_confirmation() {
    let dir = fixture_dir();
    let (mut app, _, _) = session(&dir, ScriptedTool::json());

    plan_rename_of_both(&mut app, "{ext}");
    assert_eq!(app.mode, Mode::OpsPreview);
    assert_eq!(app.pending_plan.as_ref().unwrap().conflicts(), vec![0, 1]);

    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.mode, Mode::Confirm);
    assert!(app.pending_confirm.is_some());

    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.mode, Mode::List);

    pump_until(&mut app, "both renames", |app| {
        app.counters.done + app.counters.failed == 2
    })
    .await;
    assert_eq!(app.counters.done, 1);
    assert_eq!(app.counters.failed, 1);
    assert_eq!(app.undo.len(), 1);

    // The loser of the collision stays where it was
    assert!(dir.path().join(".txt").exists());
    let survivors = ["a.txt", "b.txt"]
        .iter()
        .filter(|name| dir.path().join(name).exists())
        .count();
    assert_eq!(survivors, 1);
}

#[tokio::test]
async fn test_conflicting_rename_declined_at_confirm() {
    let dir = fixture_dir();
    let (mut app, gateway, _) = session(&dir, ScriptedTool::json());

    plan_rename_of_both(&mut app, "{ext}");
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.mode, Mode::Confirm);

    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.mode, Mode::List);
    assert!(app.pending_confirm.is_none());
    assert_eq!(status(&app), Some("Cancelled"));
    assert!(gateway.calls().is_empty());
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("b.txt").exists());
    assert!(!dir.path().join(".txt").exists());
}

#[tokio::test]
async fn test_rename_in_argument_listing_follows_items() {
    let dir = fixture_dir();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let (mut app, _, _) = session_for(
        ListSource::Arguments(vec![a.clone(), b.clone()]),
        ScriptedTool::json(),
    );
    assert_eq!(names(&app), ["a.txt", "b.txt"]);

    press(&mut app, KeyCode::Char('r'));
    app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
    type_text(&mut app, "renamed{ext}");
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('y'));

    pump_until(&mut app, "rename and reload", |app| {
        names(app) == ["renamed.txt", "b.txt"]
    })
    .await;
    assert_eq!(status(&app), Some("Rename: a.txt"));
    assert_eq!(
        app.catalog.source(),
        &ListSource::Arguments(vec![dir.path().join("renamed.txt"), b.clone()])
    );

    press(&mut app, KeyCode::Char('u'));
    pump_until(&mut app, "undo and reload", |app| {
        names(app) == ["a.txt", "b.txt"]
    })
    .await;
    assert_eq!(app.catalog.source(), &ListSource::Arguments(vec![a, b]));
}

#[tokio::test]
async fn test_failed_undo_can_be_retried() {
    let dir = fixture_dir();
    let (mut app, _, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('r'));
    app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
    type_text(&mut app, "new{ext}");
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('y'));
    pump_until(&mut app, "rename and reload", |app| {
        names(app) == ["sub", "b.txt", "new.txt"]
    })
    .await;

    // Something reappears at the original name
    fs::write(dir.path().join("a.txt"), "blocker").unwrap();
    press(&mut app, KeyCode::Char('u'));
    assert!(app.undo.is_empty());

    pump_until(&mut app, "failed undo", |app| app.counters.failed == 1).await;
    assert_eq!(app.undo.len(), 1);
    assert!(status(&app).unwrap().contains("failed"));
    assert!(dir.path().join("new.txt").exists());

    fs::remove_file(dir.path().join("a.txt")).unwrap();
    press(&mut app, KeyCode::Char('u'));
    pump_until(&mut app, "retried undo", |app| app.counters.done == 2).await;
    assert!(app.undo.is_empty());
    assert!(app.undo_in_flight.is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "aaa");
}

#[tokio::test]
async fn test_move_into_current_directory_does_nothing() {
    let dir = fixture_dir();
    let (mut app, gateway, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('m'));
    type_text(&mut app, &dir.path().display().to_string());
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.mode, Mode::List);
    assert!(app.pending_plan.is_none());
    assert!(status(&app).unwrap().starts_with("Already in "));
    assert!(gateway.calls().is_empty());
    assert!(dir.path().join("a.txt").exists());
}

#[tokio::test]
async fn test_move_plan_cancel_keeps_files() {
    let dir = fixture_dir();
    let (mut app, gateway, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('m'));
    type_text(&mut app, "sub");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.mode, Mode::OpsPreview);
    let plan = app.pending_plan.as_ref().unwrap();
    assert_eq!(
        plan.pairs,
        vec![(dir.path().join("a.txt"), dir.path().join("sub").join("a.txt"))]
    );

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.mode, Mode::List);
    assert_eq!(status(&app), Some("Cancelled"));
    assert!(gateway.calls().is_empty());
    assert!(dir.path().join("a.txt").exists());
}

#[tokio::test]
async fn test_move_to_a_file_is_rejected_in_input() {
    let dir = fixture_dir();
    let (mut app, _, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('m'));
    type_text(&mut app, "b.txt");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.mode, Mode::MoveToDir);
    assert!(app.input_state.error().unwrap().contains("not a directory"));
}

#[tokio::test]
async fn test_empty_input_cancels() {
    let dir = fixture_dir();
    let (mut app, gateway, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.mode, Mode::Chmod);
    type_text(&mut app, "   ");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.mode, Mode::List);
    assert_eq!(status(&app), Some("Cancelled: empty input"));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_chmod_mode_stays_in_input() {
    let dir = fixture_dir();
    let (mut app, gateway, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('c'));
    type_text(&mut app, "9z");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.mode, Mode::Chmod);
    assert!(app.input_state.error().is_some());

    app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
    type_text(&mut app, "644");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mode, Mode::List);

    pump_until(&mut app, "chmod job", |app| app.counters.done == 1).await;
    assert_eq!(gateway.calls(), vec![("chmod", dir.path().join("a.txt"))]);
}

#[tokio::test]
async fn test_palette_runs_selected_entry() {
    let dir = fixture_dir();
    let (mut app, gateway, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char(':'));
    assert_eq!(app.mode, Mode::Actions);

    // Open, Reveal, Copy path
    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mode, Mode::List);

    pump_until(&mut app, "copy job", |app| app.counters.done == 1).await;
    assert_eq!(gateway.calls(), vec![("copy", dir.path().join("a.txt"))]);
}

#[tokio::test]
async fn test_help_swallows_quit() {
    let dir = fixture_dir();
    let (mut app, _, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('?'));
    assert_eq!(app.mode, Mode::Help);

    press(&mut app, KeyCode::Char('j'));
    assert_eq!(app.catalog.focus(), 0);

    press(&mut app, KeyCode::Char('q'));
    assert_eq!(app.mode, Mode::List);

    press(&mut app, KeyCode::Char('q'));
    assert_eq!(app.mode, Mode::Quit);
}

#[tokio::test]
async fn test_help_returns_to_confirm() {
    let dir = fixture_dir();
    let (mut app, _, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Char('?'));
    assert_eq!(app.mode, Mode::Help);

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.mode, Mode::Confirm);
    assert!(app.pending_confirm.is_some());
}

#[tokio::test]
async fn test_refresh_picks_up_new_files() {
    let dir = fixture_dir();
    let (mut app, _, _) = session(&dir, ScriptedTool::json());

    fs::write(dir.path().join("c.txt"), "c").unwrap();
    press(&mut app, KeyCode::Char('R'));

    pump_until(&mut app, "reload", |app| app.catalog.len() == 4).await;
    assert_eq!(names(&app), vec!["sub", "a.txt", "b.txt", "c.txt"]);
}

#[tokio::test]
async fn test_reload_for_previous_source_is_dropped() {
    let dir = fixture_dir();
    let (mut app, _, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Enter);
    assert!(app.catalog.is_empty());

    app.catalog_loaded(
        ListSource::Directory(dir.path().to_path_buf()),
        Ok((Vec::new(), 0)),
    );
    assert_eq!(app.catalog.source().cwd(), Some(dir.path().join("sub").as_path()));
}

#[tokio::test]
async fn test_ctrl_c_quits_from_input() {
    let dir = fixture_dir();
    let (mut app, _, _) = session(&dir, ScriptedTool::json());

    press(&mut app, KeyCode::Char('w'));
    assert_eq!(app.mode, Mode::OpenWith);
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(app.mode, Mode::Quit);
}

#[tokio::test]
async fn test_render_draws_every_mode() {
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use ratatui::widgets::Widget;

    let dir = fixture_dir();
    let (mut app, _, _) = session(&dir, ScriptedTool::json());
    let area = Rect::new(0, 0, 100, 30);

    let render = |app: &App| {
        let mut buf = Buffer::empty(area);
        Widget::render(app, area, &mut buf);
        buf
    };

    let buf = render(&app);
    let text: String = buf.content().iter().map(|cell| cell.symbol()).collect();
    assert!(text.contains("finfo"));
    assert!(text.contains("a.txt"));

    for key in [':', 'd', 'c', '?'] {
        press(&mut app, KeyCode::Char(key));
        render(&app);
        press(&mut app, KeyCode::Esc);
    }
    app.show_job_log = true;
    render(&app);
}
