//! Dry-run planning for batch moves and pattern renames.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use strum::Display;

use crate::conflict::unique_destination;
use crate::executor::Job;
use crate::ActionKind;

/// The kind of batch operation a plan describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PlanKind {
    #[strum(to_string = "Move")]
    MoveToDir,
    #[strum(to_string = "Rename")]
    RenameByPattern,
}

/// A fully computed list of `from -> to` pairs awaiting confirmation.
///
/// Nothing touches the filesystem until the plan is turned into jobs.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// What kind of operation this is.
    pub kind: PlanKind,
    /// Source and destination pairs, in target-set order.
    pub pairs: Vec<(PathBuf, PathBuf)>,
    /// The destination directory or pattern the user typed.
    pub argument: String,
}

impl OperationPlan {
    /// Plan moving every target into `directory`.
    ///
    /// Each destination is `directory/basename`; when that is taken on disk
    /// or by an earlier pair, " (n)" is inserted before the extension.
    /// Targets already in `directory` stay where they are and get no pair.
    pub fn move_to_dir(targets: &[PathBuf], directory: &Path) -> Self {
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let pairs = targets
            .iter()
            .filter_map(|source| {
                let name = source.file_name().unwrap_or(source.as_os_str());
                let natural = directory.join(name);
                if natural == *source {
                    claimed.insert(natural);
                    return None;
                }
                let dest = unique_destination(&natural, &claimed);
                claimed.insert(dest.clone());
                Some((source.clone(), dest))
            })
            .collect();

        Self {
            kind: PlanKind::MoveToDir,
            pairs,
            argument: directory.display().to_string(),
        }
    }

    /// Plan renaming every target in place according to `pattern`.
    ///
    /// Placeholders: `{name}` is the base name without extension, `{ext}`
    /// the extension including its dot, `{n}` the 1-based position in the
    /// target set. Outputs are not deduplicated; see [`Self::conflicts`].
    pub fn rename_by_pattern(targets: &[PathBuf], pattern: &str) -> Self {
        let pairs = targets
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let new_name = apply_pattern(pattern, source, index + 1);
                let parent = source.parent().unwrap_or(Path::new(""));
                (source.clone(), parent.join(new_name))
            })
            .collect();

        Self {
            kind: PlanKind::RenameByPattern,
            pairs,
            argument: pattern.to_string(),
        }
    }

    /// Number of pairs in the plan.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the plan has nothing to do.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The action each pair will run as.
    pub fn action(&self) -> ActionKind {
        match self.kind {
            PlanKind::MoveToDir => ActionKind::Move,
            PlanKind::RenameByPattern => ActionKind::Rename,
        }
    }

    /// Indices of pairs whose destination is shared with another pair or
    /// already exists on disk (and is not the pair's own source).
    pub fn conflicts(&self) -> Vec<usize> {
        let mut counts: HashMap<&Path, usize> = HashMap::new();
        for (_, to) in &self.pairs {
            *counts.entry(to.as_path()).or_default() += 1;
        }

        self.pairs
            .iter()
            .enumerate()
            .filter(|(_, (from, to))| {
                counts.get(to.as_path()).copied().unwrap_or(0) > 1
                    || (to != from && to.symlink_metadata().is_ok())
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Render the human-readable dry run.
    pub fn dry_run(&self) -> String {
        let conflicts: HashSet<usize> = self.conflicts().into_iter().collect();
        let header = match self.kind {
            PlanKind::MoveToDir => {
                format!("Move {} item(s) into {}", self.pairs.len(), self.argument)
            }
            PlanKind::RenameByPattern => {
                format!("Rename {} item(s) with '{}'", self.pairs.len(), self.argument)
            }
        };

        let mut out = header;
        out.push('\n');
        for (index, (from, to)) in self.pairs.iter().enumerate() {
            out.push_str(&format!("  {} → {}", from.display(), to.display()));
            if conflicts.contains(&index) {
                out.push_str("  [conflict]");
            } else if let Some(name) = to.file_name() {
                if let Err(reason) = validate_filename(&name.to_string_lossy()) {
                    out.push_str(&format!("  [{reason}]"));
                }
            } else {
                out.push_str("  [empty name]");
            }
            out.push('\n');
        }
        out
    }

    /// One job per pair.
    pub fn jobs(&self) -> Vec<Job> {
        let kind = self.action();
        self.pairs
            .iter()
            .map(|(from, to)| Job::Rename {
                kind: kind.clone(),
                from: from.clone(),
                to: to.clone(),
            })
            .collect()
    }
}

fn apply_pattern(pattern: &str, source: &Path, ordinal: usize) -> String {
    let name = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    pattern
        .replace("{name}", &name)
        .replace("{ext}", &ext)
        .replace("{n}", &ordinal.to_string())
}

/// Validate a filename for cross-platform compatibility.
pub fn validate_filename(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".into());
    }

    if name.len() > 255 {
        return Err("Name is too long (max 255 characters)".into());
    }

    for c in ['/', '\0'] {
        if name.contains(c) {
            return Err(format!("Name cannot contain '{}'", c.escape_default()));
        }
    }

    if name == "." || name == ".." {
        return Err("'.' and '..' are reserved names".into());
    }

    if name.starts_with(' ') || name.ends_with(' ') {
        return Err("Name cannot start or end with spaces".into());
    }

    Ok(())
}
