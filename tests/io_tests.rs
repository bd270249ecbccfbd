//! Integration tests for plan file I/O.
//!
//! Tests cover:
//! - Plan save/load
//! - Rejection of malformed plan files
//! - Archiving plans into the backup directory

use bt_rename::core::persistence::{
    archive_plan_at, backup_file_name, load_plan, plan_file_path, save_plan,
};
use bt_rename::models::plan::RenamePlan;
use bt_rename::Error;
use chrono::{Local, TimeZone};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn sample_plan() -> RenamePlan {
    RenamePlan::from_pairs([
        ("/dl/Show/[Grp] Show - 02.mkv", "/dl/Show/S01E02.mkv"),
        ("/dl/Show/[Grp] Show - 01.mkv", "/dl/Show/S01E01.mkv"),
        ("/dl/Show/[Grp] Show - 01.tc.ass", "/dl/Show/S01E01.cht.ass"),
    ])
    .unwrap()
}

// ========== PLAN I/O TESTS ==========

#[test]
fn test_save_and_load_plan() {
    let temp_dir = TempDir::new().unwrap();
    let plan_path = plan_file_path(temp_dir.path(), Some("Show"));
    let plan = sample_plan();

    save_plan(&plan, &plan_path).unwrap();
    assert!(plan_path.exists());
    assert_eq!(plan_path.file_name().unwrap(), ".Show.rename-plan.json");

    let loaded = load_plan(&plan_path).unwrap();
    assert_eq!(loaded, plan);
    // Order survives the round trip
    assert_eq!(
        loaded.sources().next().unwrap(),
        PathBuf::from("/dl/Show/[Grp] Show - 02.mkv")
    );
}

#[test]
fn test_saved_plan_is_flat_json_object() {
    let temp_dir = TempDir::new().unwrap();
    let plan_path = temp_dir.path().join("plan.json");
    save_plan(&sample_plan(), &plan_path).unwrap();

    let content = fs::read_to_string(&plan_path).unwrap();
    assert!(content.ends_with('\n'));

    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 3);
    assert_eq!(
        object["/dl/Show/[Grp] Show - 01.tc.ass"],
        serde_json::json!("/dl/Show/S01E01.cht.ass")
    );
}

#[test]
fn test_save_creates_parent_directory() {
    let temp_dir = TempDir::new().unwrap();
    let plan_path = temp_dir.path().join("nested").join("dir").join("plan.json");
    save_plan(&sample_plan(), &plan_path).unwrap();
    assert!(plan_path.exists());
}

#[test]
fn test_load_nonexistent_plan() {
    let result = load_plan(&PathBuf::from("/nonexistent/plan.json"));
    assert!(matches!(result, Err(Error::PathNotFound(_))));
}

#[test]
fn test_load_invalid_plan() {
    let temp_dir = TempDir::new().unwrap();
    let plan_path = temp_dir.path().join("plan.json");

    fs::write(&plan_path, "[\"not\", \"a\", \"map\"]").unwrap();
    assert!(matches!(load_plan(&plan_path), Err(Error::InvalidPlanFile(_))));

    fs::write(&plan_path, "{\"/a.mkv\": \"/b.mkv\", \"/a.mkv\": \"/c.mkv\"}").unwrap();
    assert!(matches!(load_plan(&plan_path), Err(Error::InvalidPlanFile(_))));
}

// ========== ARCHIVE TESTS ==========

#[test]
fn test_archive_uses_fallback_when_label_missing() {
    let work_dir = TempDir::new().unwrap();
    let fallback = TempDir::new().unwrap();

    let plan = RenamePlan::from_pairs([(
        "/nonexistent_bt_rename_root/Show/raw.mkv",
        "/nonexistent_bt_rename_root/Show/S01E01.mkv",
    )])
    .unwrap();
    let plan_file = plan_file_path(work_dir.path(), Some("Show"));
    save_plan(&plan, &plan_file).unwrap();

    let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let backup = archive_plan_at(&plan_file, &plan, now, fallback.path()).unwrap();

    assert_eq!(backup, fallback.path().join(".rename-plan.20240102030405.json"));
    assert_eq!(backup.file_name().unwrap().to_string_lossy(), backup_file_name(now));
    assert!(!plan_file.exists());
    assert_eq!(load_plan(&backup).unwrap(), plan);
}

#[test]
fn test_archive_missing_plan_file_fails() {
    let fallback = TempDir::new().unwrap();
    let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

    let result = archive_plan_at(
        &fallback.path().join("missing.json"),
        &sample_plan(),
        now,
        fallback.path(),
    );
    assert!(result.is_err());
}
