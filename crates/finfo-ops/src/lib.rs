//! Operation engine for finfo-tui.
//!
//! This crate turns user intents into reviewable plans, runs OS actions one
//! call per target on blocking tasks, and keeps the bookkeeping the session
//! needs afterwards: job counters, a bounded job log and the undo stack.
//! Results come back through channels, one message per finished job.

mod action;
mod conflict;
mod executor;
mod gateway;
mod jobs;
mod plan;
mod undo;

pub use action::{ActionError, ActionKind};
pub use conflict::{auto_rename_path, unique_destination};
pub use executor::{start_jobs, Job, JobComplete};
pub use gateway::{parse_mode, ActionGateway, SystemGateway};
pub use jobs::{JobCounters, JobLog, JobLogEntry};
pub use plan::{validate_filename, OperationPlan, PlanKind};
pub use undo::{ExecutedOperation, UndoStack};

/// Default channel buffer size for job completions.
pub const OPERATION_CHANNEL_SIZE: usize = 100;
