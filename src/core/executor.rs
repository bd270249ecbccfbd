//! Plan executor module.
//!
//! Applies a rename plan entry by entry:
//! - resolve source and target to absolute paths
//! - create the target's parent directory when missing, dropping an
//!   `.ignore` marker into it unless it sits inside a `Season N` directory
//! - move the file
//!
//! Entries are independent. A failed entry is reported and the next one is
//! still attempted, so a run can leave the tree partially renamed.

use crate::core::scanner::absolute_path;
use crate::models::plan::{ExecutionResult, RenamePlan};
use crate::utils::fs::move_file;
use crate::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the marker file placed in ad hoc output directories.
pub const IGNORE_MARKER: &str = ".ignore";

/// Executor configuration.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Whether to drop `.ignore` markers into newly created directories.
    pub mark_unstructured_dirs: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            mark_unstructured_dirs: true,
        }
    }
}

/// Plan executor.
pub struct Executor {
    config: ExecutorConfig,
}

/// Whether a directory is named exactly `Season <digits>`.
pub fn is_season_dir(dir: &Path) -> bool {
    let name = match dir.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return false,
    };
    regex::Regex::new(r"^Season \d+$")
        .map(|re| re.is_match(&name))
        .unwrap_or(false)
}

/// Resolve a plan target against its (absolute) source.
///
/// Relative targets are taken relative to the source's directory, so a
/// bare file name renames in place.
pub fn resolve_target(source: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        return absolute_path(target);
    }
    let base = source.parent().unwrap_or_else(|| Path::new(""));
    absolute_path(&base.join(target))
}

/// Absolute `(source, target)` pairs of `plan`, in plan order.
fn resolved_pairs(plan: &RenamePlan) -> Vec<(PathBuf, PathBuf)> {
    plan.iter()
        .map(|(source, target)| {
            let from = absolute_path(source);
            let to = resolve_target(&from, target);
            (from, to)
        })
        .collect()
}

/// The same plan with every source and target made absolute.
///
/// Needed before inverting a plan, since a relative target only has meaning
/// next to its source.
pub fn resolve_plan(plan: &RenamePlan) -> Result<RenamePlan> {
    RenamePlan::from_pairs(resolved_pairs(plan))
}

/// Resolved targets that appear more than once, or that land on another
/// entry's source. Returned in first-seen order.
pub fn conflicting_targets(plan: &RenamePlan) -> Vec<PathBuf> {
    let pairs = resolved_pairs(plan);

    let mut counts: HashMap<&Path, usize> = HashMap::new();
    for (_, to) in &pairs {
        *counts.entry(to.as_path()).or_default() += 1;
    }

    let mut seen = HashSet::new();
    let mut conflicts = Vec::new();
    for (from, to) in &pairs {
        let duplicated = counts.get(to.as_path()).copied().unwrap_or(0) > 1;
        let hits_other_source = pairs.iter().any(|(s, _)| s == to && s != from);
        if (duplicated || hits_other_source) && seen.insert(to.as_path()) {
            conflicts.push(to.clone());
        }
    }
    conflicts
}

impl Executor {
    /// Create a new executor with default configuration.
    pub fn new() -> Self {
        Self {
            config: ExecutorConfig::default(),
        }
    }

    /// Create a new executor with custom configuration.
    pub fn with_config(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Apply every entry of `plan` in order.
    pub fn execute(&self, plan: &RenamePlan) -> Vec<ExecutionResult> {
        self.execute_with(plan, |_| {})
    }

    /// Apply every entry of `plan` in order, reporting each outcome to
    /// `on_result` as soon as it is known.
    pub fn execute_with<F>(&self, plan: &RenamePlan, mut on_result: F) -> Vec<ExecutionResult>
    where
        F: FnMut(&ExecutionResult),
    {
        tracing::info!("Executing {} renames", plan.len());

        let mut results = Vec::with_capacity(plan.len());
        for (idx, (source, target)) in plan.iter().enumerate() {
            let result = self.apply_entry(source, target);
            match &result {
                ExecutionResult::Renamed { from, to, .. } => {
                    tracing::info!("Renamed [{}/{}]: {:?} -> {:?}", idx + 1, plan.len(), from, to);
                }
                ExecutionResult::Unchanged { path } => {
                    tracing::debug!("Unchanged [{}/{}]: {:?}", idx + 1, plan.len(), path);
                }
                ExecutionResult::Failed { from, error, .. } => {
                    tracing::error!("Rename failed [{}/{}]: {:?} - {}", idx + 1, plan.len(), from, error);
                }
            }
            on_result(&result);
            results.push(result);
        }

        results
    }

    /// Check a plan against the filesystem without touching it.
    ///
    /// Returns human-readable warnings: missing sources, targets that already
    /// exist, and targets shared by several entries.
    pub fn validate(&self, plan: &RenamePlan) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut seen_targets = HashSet::new();

        for (source, target) in plan.iter() {
            let from = absolute_path(source);
            let to = resolve_target(&from, target);

            if !from.exists() {
                warnings.push(format!("Source not found: {}", from.display()));
            }
            if from != to && to.exists() {
                warnings.push(format!("Target already exists: {}", to.display()));
            }
            if !seen_targets.insert(to.clone()) {
                warnings.push(format!("Target used more than once: {}", to.display()));
            }
        }

        warnings
    }

    /// Apply a single entry.
    fn apply_entry(&self, source: &Path, target: &Path) -> ExecutionResult {
        let from = absolute_path(source);
        let to = resolve_target(&from, target);

        if from == to {
            return ExecutionResult::Unchanged { path: from };
        }

        match self.rename(&from, &to) {
            Ok((created_dir, marker)) => ExecutionResult::Renamed {
                from,
                to,
                created_dir,
                marker,
            },
            Err(error) => ExecutionResult::Failed { from, to, error },
        }
    }

    /// Create the target directory if needed, then move the file.
    fn rename(&self, from: &Path, to: &Path) -> Result<(Option<PathBuf>, Option<PathBuf>)> {
        if fs::symlink_metadata(from).is_err() {
            return Err(Error::PathNotFound(from.display().to_string()));
        }
        if to.exists() {
            return Err(Error::TargetExists(to.display().to_string()));
        }

        let mut created_dir = None;
        let mut marker = None;

        if let Some(parent) = to.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
                tracing::debug!("Created directory: {:?}", parent);
                created_dir = Some(parent.to_path_buf());

                if self.config.mark_unstructured_dirs {
                    marker = self.mark_if_unstructured(parent)?;
                }
            }
        }

        move_file(from, to)?;
        Ok((created_dir, marker))
    }

    /// Drop an `.ignore` marker into `new_dir` unless its containing
    /// directory is a `Season N` directory.
    fn mark_if_unstructured(&self, new_dir: &Path) -> Result<Option<PathBuf>> {
        let in_season = new_dir.parent().map(is_season_dir).unwrap_or(false);
        if in_season {
            return Ok(None);
        }

        let marker = new_dir.join(IGNORE_MARKER);
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&marker)?;
        tracing::debug!("Created marker: {:?}", marker);
        Ok(Some(marker))
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}
