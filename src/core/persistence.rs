//! Plan persistence.
//!
//! Plans are written as pretty-printed JSON objects into the working
//! directory before execution (`.{title}.rename-plan.json`), and moved into
//! a timestamped backup (`.rename-plan.<YYYYMMDDHHMMSS>.json`) under the
//! top-level directory shared by the plan's targets afterwards.

use crate::core::executor::resolve_target;
use crate::core::naming::common_ancestor;
use crate::core::scanner::absolute_path;
use crate::models::plan::RenamePlan;
use crate::utils::fs::move_file;
use crate::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// File name used when no title is known.
pub const DEFAULT_PLAN_FILE: &str = ".rename-plan.json";

/// Artifact file name for a plan made for `title`.
pub fn plan_file_name(title: Option<&str>) -> String {
    let label = title
        .map(|t| t.replace(['/', '\\'], "_"))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    match label {
        Some(label) => format!(".{}.rename-plan.json", label),
        None => DEFAULT_PLAN_FILE.to_string(),
    }
}

/// Artifact path inside `dir` for a plan made for `title`.
pub fn plan_file_path(dir: &Path, title: Option<&str>) -> PathBuf {
    dir.join(plan_file_name(title))
}

/// Save a plan to a JSON file.
pub fn save_plan(plan: &RenamePlan, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;

    tracing::info!("Plan saved to {:?}", path);
    Ok(())
}

/// Load a plan from a JSON file.
pub fn load_plan(path: &Path) -> Result<RenamePlan> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| crate::Error::InvalidPlanFile(format!("{}: {}", path.display(), e)))
}

/// Backup file name stamped with `now` to the second.
pub fn backup_file_name(now: DateTime<Local>) -> String {
    format!(".rename-plan.{}.json", now.format("%Y%m%d%H%M%S"))
}

/// Directory that receives the backup of `plan`.
///
/// This is the top-level directory shared by every resolved target (for
/// targets under `/media/tv/...` that is `/media`). When the targets share
/// nothing but the filesystem root, or that directory does not exist,
/// `fallback` is used.
pub fn backup_dir(plan: &RenamePlan, fallback: &Path) -> PathBuf {
    let targets: Vec<PathBuf> = plan
        .iter()
        .map(|(source, target)| resolve_target(&absolute_path(source), target))
        .collect();

    let label = common_ancestor(&targets);
    if label.as_os_str().is_empty() || label.has_root() {
        return fallback.to_path_buf();
    }

    let root: PathBuf = targets
        .first()
        .map(|t| {
            t.components()
                .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
                .collect()
        })
        .unwrap_or_default();

    let dir = root.join(label);
    if dir.is_dir() {
        dir
    } else {
        tracing::warn!("Backup directory {:?} missing, using {:?}", dir, fallback);
        fallback.to_path_buf()
    }
}

/// Move `plan_file` into the backup directory for `plan`, stamped with `now`.
///
/// Returns the backup path.
pub fn archive_plan_at(
    plan_file: &Path,
    plan: &RenamePlan,
    now: DateTime<Local>,
    fallback: &Path,
) -> Result<PathBuf> {
    let dir = backup_dir(plan, fallback);
    let backup_path = dir.join(backup_file_name(now));

    move_file(plan_file, &backup_path)?;
    tracing::info!("Moved plan file to {:?}", backup_path);
    Ok(backup_path)
}

/// Archive `plan_file` with the current time, falling back to the system
/// temporary directory.
pub fn archive_plan(plan_file: &Path, plan: &RenamePlan) -> Result<PathBuf> {
    archive_plan_at(plan_file, plan, Local::now(), &std::env::temp_dir())
}
