//! Naming heuristics.
//!
//! Derives a search title from a release directory name, classifies paths by
//! extension, and finds the top-level label shared by a set of paths.

use crate::models::media::MediaClass;
use crate::utils::fs::get_extension;
use std::path::{Component, Path, PathBuf};

/// Video file extensions that gate discovery.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "wmv"];

/// Subtitle file extensions.
pub const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "ass", "ssa", "vtt", "sub", "idx", "sup"];

/// Strip `[...]` and `(...)` tags from a release name and tidy whitespace.
///
/// `"[Group] Show Name (2020) [1080p]"` becomes `"Show Name"`.
pub fn extract_title(name: &str) -> String {
    let mut title = name.to_string();

    for pattern in [r"\[.*?\]", r"\(.*?\)"] {
        if let Ok(re) = regex::Regex::new(pattern) {
            title = re.replace_all(&title, "").into_owned();
        }
    }

    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classify a path by its (case-insensitive) extension.
pub fn classify(path: &Path) -> MediaClass {
    match get_extension(path) {
        Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => MediaClass::Video,
        Some(ext) if SUBTITLE_EXTENSIONS.contains(&ext.as_str()) => MediaClass::Subtitle,
        _ => MediaClass::Other,
    }
}

/// Top-level label shared by the parent directories of `paths`.
///
/// Computes the common prefix of every path's parent. When that prefix has
/// at least one named segment, only the first segment is returned
/// (`/a/b/c.mkv` and `/a/b/d.mkv` give `a`). A prefix made only of a root
/// (`/`) is returned as is, and no common prefix or no input gives an empty
/// path.
pub fn common_ancestor<P: AsRef<Path>>(paths: &[P]) -> PathBuf {
    let mut parents = paths
        .iter()
        .map(|p| p.as_ref().parent().unwrap_or_else(|| Path::new("")));

    let first = match parents.next() {
        Some(first) => first,
        None => return PathBuf::new(),
    };

    let mut common: Vec<Component> = first.components().collect();
    for parent in parents {
        let shared = common
            .iter()
            .zip(parent.components())
            .take_while(|(a, b)| **a == *b)
            .count();
        common.truncate(shared);
    }

    match common.iter().find(|c| matches!(c, Component::Normal(_))) {
        Some(Component::Normal(segment)) => PathBuf::from(segment),
        _ => common.iter().collect(),
    }
}
