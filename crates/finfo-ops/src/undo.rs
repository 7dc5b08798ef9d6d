//! Undo stack for reversible operations.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use crate::executor::Job;
use crate::ActionKind;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// A completed operation that may be reversed.
#[derive(Debug, Clone)]
pub struct ExecutedOperation {
    /// Unique ID for this record.
    pub id: u64,
    /// The action that ran.
    pub kind: ActionKind,
    /// Original location.
    pub from: PathBuf,
    /// Location after the action.
    pub to: PathBuf,
    /// Whether an inverse exists.
    pub reversible: bool,
    /// When the operation completed.
    pub timestamp: SystemTime,
}

impl ExecutedOperation {
    /// Create a new record stamped with the current time.
    pub fn new(kind: ActionKind, from: PathBuf, to: PathBuf, reversible: bool) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            from,
            to,
            reversible,
            timestamp: SystemTime::now(),
        }
    }

    /// The job that puts `to` back at `from`.
    ///
    /// Returns None for records without an inverse.
    pub fn inverse_job(&self) -> Option<Job> {
        self.reversible.then(|| Job::Rename {
            kind: ActionKind::Undo,
            from: self.to.clone(),
            to: self.from.clone(),
        })
    }

    /// Human-readable description of the undo.
    pub fn undo_description(&self) -> String {
        let name = |p: &PathBuf| {
            p.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| p.display().to_string())
        };
        format!("{} '{}' back to '{}'", self.kind, name(&self.to), name(&self.from))
    }
}

/// Bounded LIFO of executed operations.
///
/// When full, the oldest record is evicted to make room.
#[derive(Debug)]
pub struct UndoStack {
    entries: VecDeque<ExecutedOperation>,
    max_entries: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(100)
    }
}

impl UndoStack {
    /// Create a stack holding at most `max_entries` records.
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: VecDeque::with_capacity(max_entries.min(1000)),
            max_entries,
        }
    }

    /// Push a record, evicting the oldest if at capacity.
    pub fn push(&mut self, op: ExecutedOperation) {
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(op);
    }

    /// Pop the most recent record, reversible or not.
    pub fn pop(&mut self) -> Option<ExecutedOperation> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }
}
