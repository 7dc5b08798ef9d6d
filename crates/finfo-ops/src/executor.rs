//! Per-target job execution with one completion message per job.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::gateway::ActionGateway;
use crate::{ActionError, ActionKind, ExecutedOperation, OPERATION_CHANNEL_SIZE};

/// A single unit of work for the gateway.
#[derive(Debug, Clone)]
pub enum Job {
    /// One action against one path.
    Single { kind: ActionKind, target: PathBuf },
    /// Copy several paths to the clipboard as one joined payload.
    CopyPaths { paths: Vec<PathBuf> },
    /// Rename `from` to `to` as part of a move, rename or undo.
    Rename {
        kind: ActionKind,
        from: PathBuf,
        to: PathBuf,
    },
}

impl Job {
    /// Expand an action over a target set into jobs.
    ///
    /// Copying paths is a single job; every other action is one job per target.
    pub fn for_targets(kind: &ActionKind, targets: &[PathBuf]) -> Vec<Job> {
        match kind {
            ActionKind::CopyPath if !targets.is_empty() => vec![Job::CopyPaths {
                paths: targets.to_vec(),
            }],
            ActionKind::CopyPath => Vec::new(),
            _ => targets
                .iter()
                .map(|target| Job::Single {
                    kind: kind.clone(),
                    target: target.clone(),
                })
                .collect(),
        }
    }

    /// The action this job performs.
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Single { kind, .. } | Self::Rename { kind, .. } => kind.clone(),
            Self::CopyPaths { .. } => ActionKind::CopyPath,
        }
    }

    /// The path reported in the completion message.
    pub fn target(&self) -> &Path {
        match self {
            Self::Single { target, .. } => target,
            Self::CopyPaths { paths } => paths
                .first()
                .map(PathBuf::as_path)
                .unwrap_or(Path::new("")),
            Self::Rename { from, .. } => from,
        }
    }

    fn destination(&self) -> Option<&Path> {
        match self {
            Self::Rename { to, .. } => Some(to),
            _ => None,
        }
    }

    /// Run the job synchronously against a gateway.
    pub fn run(&self, gateway: &dyn ActionGateway) -> Result<(), ActionError> {
        match self {
            Self::CopyPaths { paths } => gateway.copy_paths(paths),
            Self::Rename { kind, from, to } => {
                if *kind == ActionKind::Move {
                    if let Some(parent) = to.parent() {
                        gateway.make_dir(parent)?;
                    }
                }
                gateway.rename(from, to)
            }
            Self::Single { kind, target } => match kind {
                ActionKind::Open => gateway.open(target),
                ActionKind::Reveal => gateway.reveal(target),
                ActionKind::ClearQuarantine => gateway.clear_quarantine(target),
                ActionKind::Chmod(mode) => gateway.chmod(target, mode),
                ActionKind::Trash => gateway.trash(target),
                ActionKind::OpenWith(app) => gateway.open_with(target, app),
                ActionKind::CopyPath => gateway.copy_paths(std::slice::from_ref(target)),
                ActionKind::Move | ActionKind::Rename | ActionKind::Undo => {
                    Err(ActionError::Unsupported("rename without a destination"))
                }
            },
        }
    }
}

/// Completion message for one job.
#[derive(Debug, Clone)]
pub struct JobComplete {
    /// The path the job acted on.
    pub target: PathBuf,
    /// The action that ran.
    pub kind: ActionKind,
    /// Where the target went, for renames.
    pub destination: Option<PathBuf>,
    /// Error text when the job failed.
    pub error: Option<String>,
}

impl JobComplete {
    /// Check if the job succeeded.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The undo record for a successful reversible job.
    pub fn undo_record(&self) -> Option<ExecutedOperation> {
        if !self.is_success() || !self.kind.is_reversible() {
            return None;
        }
        let to = self.destination.clone()?;
        Some(ExecutedOperation::new(self.kind.clone(), self.target.clone(), to, true))
    }
}

/// Start jobs concurrently, each on its own blocking task.
///
/// Returns a receiver that yields exactly one [`JobComplete`] per job, in
/// completion order.
pub fn start_jobs(
    gateway: Arc<dyn ActionGateway>,
    jobs: Vec<Job>,
) -> mpsc::Receiver<JobComplete> {
    let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);

    for job in jobs {
        let tx = tx.clone();
        let gateway = Arc::clone(&gateway);

        tokio::spawn(async move {
            let target = job.target().to_path_buf();
            let kind = job.kind();
            let destination = job.destination().map(Path::to_path_buf);

            let result = tokio::task::spawn_blocking(move || job.run(gateway.as_ref()))
                .await
                .map_err(|e| format!("Task failed: {e}"))
                .and_then(|r| r.map_err(|e| e.to_string()));

            if let Err(ref e) = result {
                tracing::warn!(action = %kind, target = %target.display(), error = %e, "job failed");
            } else {
                tracing::debug!(action = %kind, target = %target.display(), "job done");
            }

            let _ = tx
                .send(JobComplete {
                    target,
                    kind,
                    destination,
                    error: result.err(),
                })
                .await;
        });
    }

    rx
}
