//! Job counters and the bounded job log.

use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::{ActionKind, JobComplete};

/// Aggregate counters for dispatched jobs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JobCounters {
    pub running: usize,
    pub done: usize,
    pub failed: usize,
}

impl JobCounters {
    /// Account for `count` jobs before any of them can complete.
    pub fn dispatch(&mut self, count: usize) {
        self.running += count;
    }

    /// Account for one completion.
    pub fn complete(&mut self, success: bool) {
        if self.running == 0 {
            tracing::warn!("job completion with no jobs running");
        }
        self.running = self.running.saturating_sub(1);
        if success {
            self.done += 1;
        } else {
            self.failed += 1;
        }
    }

    /// No jobs in flight.
    pub fn is_idle(&self) -> bool {
        self.running == 0
    }
}

impl std::fmt::Display for JobCounters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "jobs: {} running, {} done, {} failed",
            self.running, self.done, self.failed
        )
    }
}

/// One line of the job log.
#[derive(Debug, Clone)]
pub struct JobLogEntry {
    pub at: DateTime<Local>,
    pub kind: ActionKind,
    pub target: PathBuf,
    pub error: Option<String>,
}

impl JobLogEntry {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl From<&JobComplete> for JobLogEntry {
    fn from(done: &JobComplete) -> Self {
        Self {
            at: Local::now(),
            kind: done.kind.clone(),
            target: done.target.clone(),
            error: done.error.clone(),
        }
    }
}

/// Most recent job completions, oldest first.
#[derive(Debug)]
pub struct JobLog {
    entries: VecDeque<JobLogEntry>,
    capacity: usize,
}

impl Default for JobLog {
    fn default() -> Self {
        Self::new(50)
    }
}

impl JobLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(1000)),
            capacity,
        }
    }

    /// Append an entry, dropping the oldest when full.
    pub fn push(&mut self, entry: JobLogEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &JobLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_never_underflow() {
        let mut counters = JobCounters::default();
        counters.complete(true);
        assert_eq!(counters.running, 0);
        assert_eq!(counters.done, 1);
    }

    #[test]
    fn test_batch_accounting() {
        let mut counters = JobCounters::default();
        counters.dispatch(5);
        assert!(!counters.is_idle());

        for ok in [true, false, true, true, false] {
            counters.complete(ok);
        }
        assert!(counters.is_idle());
        assert_eq!(counters.done, 3);
        assert_eq!(counters.failed, 2);
    }

    #[test]
    fn test_job_log_is_bounded() {
        let mut log = JobLog::new(2);
        for name in ["a", "b", "c"] {
            log.push(JobLogEntry {
                at: Local::now(),
                kind: ActionKind::Open,
                target: PathBuf::from(name),
                error: None,
            });
        }

        let targets: Vec<_> = log.iter().map(|e| e.target.clone()).collect();
        assert_eq!(targets, vec![PathBuf::from("b"), PathBuf::from("c")]);
    }
}
