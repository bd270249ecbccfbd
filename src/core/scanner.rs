//! Directory scanner module.
//!
//! Walks a directory tree to a bounded depth collecting rename candidates.
//! A directory that already holds a video file is returned whole (its
//! entries, files and subdirectories alike) and not descended into; other
//! directories are descended until the depth budget runs out.

use crate::core::naming::classify;
use crate::models::media::MediaClass;
use crate::utils::fs::{ensure_directory, is_hidden_name};
use crate::Result;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// List the non-hidden immediate entries of `root`, sorted by name.
fn list_entries(root: &Path) -> std::result::Result<Vec<PathBuf>, walkdir::Error> {
    WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden_name(&e.file_name().to_string_lossy()))
        .map(|entry| entry.map(|e| e.into_path()))
        .collect()
}

/// Whether any of `entries` is a video file.
fn contains_video(entries: &[PathBuf]) -> bool {
    entries
        .iter()
        .any(|p| p.is_file() && classify(p) == MediaClass::Video)
}

/// Collect candidate paths under `root`.
///
/// - If `root` directly contains a video file, its full entry list is
///   returned and nothing below it is visited.
/// - If `max_depth <= 1`, the entry list is returned as is.
/// - Otherwise every subdirectory is scanned with `max_depth - 1` and the
///   results are concatenated in entry order. Plain files at this level are
///   dropped.
///
/// A directory that cannot be read is logged and contributes nothing.
pub fn discover(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let entries = match list_entries(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Failed to read directory {:?}: {}", root, e);
            return Vec::new();
        }
    };

    if contains_video(&entries) {
        tracing::debug!("Found media in {:?}, not descending", root);
        return entries;
    }

    if max_depth <= 1 {
        return entries;
    }

    entries
        .iter()
        .filter(|p| p.is_dir())
        .flat_map(|dir| discover(dir, max_depth - 1))
        .collect()
}

/// Make `path` absolute against the working directory and collapse `.` and
/// `..` lexically. Symlinks are not resolved.
pub fn absolute_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            // `..` at the root stays at the root
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Absolute-normalise paths and drop repeats, keeping first occurrences.
pub fn dedup_paths<I>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .map(|p| absolute_path(&p))
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Discover candidates under each of `roots` in turn.
///
/// Every root must be an existing directory. Results are absolute and
/// deduplicated across roots.
pub fn discover_all<P: AsRef<Path>>(roots: &[P], max_depth: usize) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for root in roots {
        let root = absolute_path(root.as_ref());
        ensure_directory(&root)?;
        let paths = discover(&root, max_depth);
        tracing::info!("Discovered {} paths under {:?}", paths.len(), root);
        found.extend(paths);
    }

    Ok(dedup_paths(found))
}
