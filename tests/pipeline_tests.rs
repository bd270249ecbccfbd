//! Integration tests for the planning pipeline.
//!
//! The metadata service and generator are replaced by in-process fakes.
//!
//! Tests cover:
//! - A full run from piped paths to a saved plan artifact
//! - Continuing without metadata when the lookup misses or fails
//! - Fatal generation and normalization errors
//! - The subtitle gate

use bt_rename::core::persistence::load_plan;
use bt_rename::core::pipeline::{
    CandidateSource, LookupOutcome, PlanRequest, Renamer, NO_METADATA_NOTE,
};
use bt_rename::models::media::{MetadataSummary, SeasonSummary};
use bt_rename::services::{MetadataLookup, NameGenerator};
use bt_rename::{Error, NormalizeError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const TEMPLATE: &str = "Files:\n<<FILES>>\nInfo:\n<<TMDB_INFO>>";

enum LookupBehavior {
    Found(MetadataSummary),
    Miss,
    Fail,
}

struct FakeLookup {
    behavior: LookupBehavior,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeLookup {
    fn new(behavior: LookupBehavior) -> Self {
        Self {
            behavior,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MetadataLookup for FakeLookup {
    async fn lookup(&self, title: &str) -> Result<Option<MetadataSummary>> {
        self.queries.lock().unwrap().push(title.to_string());
        match &self.behavior {
            LookupBehavior::Found(summary) => Ok(Some(summary.clone())),
            LookupBehavior::Miss => Ok(None),
            LookupBehavior::Fail => Err(Error::other("connection refused")),
        }
    }
}

struct FakeGenerator {
    response: std::result::Result<String, String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeGenerator {
    fn replying(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn failing(reason: &str) -> Self {
        Self {
            response: Err(reason.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl NameGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.response.clone().map_err(Error::GenerationFailed)
    }
}

fn frieren() -> MetadataSummary {
    MetadataSummary::Series {
        name: "Frieren: Beyond Journey's End".to_string(),
        first_air_date: Some("2023-09-29".to_string()),
        seasons: vec![SeasonSummary {
            season_number: 1,
            name: "Season 1".to_string(),
            episode_count: 28,
        }],
    }
}

fn piped_request(work_dir: &Path, paths: Vec<PathBuf>) -> PlanRequest {
    PlanRequest {
        source: CandidateSource::Paths(paths),
        search_terms: vec!["Frieren".to_string()],
        require_subtitles: false,
        max_depth: 2,
        working_dir: work_dir.to_path_buf(),
    }
}

fn proposal(names: &[&str]) -> String {
    serde_json::json!({ "result": names }).to_string()
}

#[tokio::test]
async fn test_plan_from_piped_paths() {
    let work_dir = TempDir::new().unwrap();
    let paths = vec![
        PathBuf::from("/root/raw1.mkv"),
        PathBuf::from("/root/raw1.tc.ass"),
    ];

    let lookup = FakeLookup::new(LookupBehavior::Found(frieren()));
    let queries = lookup.queries.clone();
    let generator = FakeGenerator::replying(&format!(
        "```json\n{}\n```",
        proposal(&["/root/S01E01.mkv", "/root/S01E01.tc.ass"])
    ));
    let prompts = generator.prompts.clone();

    let renamer = Renamer::new(lookup, generator, TEMPLATE.to_string());
    let planned = renamer
        .plan(&piped_request(work_dir.path(), paths.clone()))
        .await
        .unwrap();

    assert_eq!(queries.lock().unwrap().as_slice(), ["Frieren".to_string()]);
    assert_eq!(planned.title.as_deref(), Some("Frieren"));
    assert_eq!(planned.lookup, LookupOutcome::Found(frieren()));
    assert_eq!(planned.candidates, paths);

    let prompt = prompts.lock().unwrap()[0].clone();
    assert!(prompt.contains("/root/raw1.mkv\n/root/raw1.tc.ass"));
    assert!(prompt.contains("Beyond Journey's End"));

    assert_eq!(
        planned.plan.target_of(Path::new("/root/raw1.tc.ass")),
        Some(Path::new("/root/S01E01.cht.ass"))
    );

    assert_eq!(planned.plan_file, work_dir.path().join(".Frieren.rename-plan.json"));
    assert_eq!(load_plan(&planned.plan_file).unwrap(), planned.plan);
}

#[tokio::test]
async fn test_lookup_miss_continues_without_metadata() {
    let work_dir = TempDir::new().unwrap();
    let generator = FakeGenerator::replying(&proposal(&["/root/S01E01.mkv"]));
    let prompts = generator.prompts.clone();

    let renamer = Renamer::new(
        FakeLookup::new(LookupBehavior::Miss),
        generator,
        TEMPLATE.to_string(),
    );
    let planned = renamer
        .plan(&piped_request(work_dir.path(), vec![PathBuf::from("/root/raw1.mkv")]))
        .await
        .unwrap();

    assert!(matches!(planned.lookup, LookupOutcome::Skipped(_)));
    assert!(prompts.lock().unwrap()[0].contains(NO_METADATA_NOTE));
    assert_eq!(planned.plan.len(), 1);
}

#[tokio::test]
async fn test_lookup_failure_continues_without_metadata() {
    let work_dir = TempDir::new().unwrap();
    let renamer = Renamer::new(
        FakeLookup::new(LookupBehavior::Fail),
        FakeGenerator::replying(&proposal(&["/root/S01E01.mkv"])),
        TEMPLATE.to_string(),
    );
    let planned = renamer
        .plan(&piped_request(work_dir.path(), vec![PathBuf::from("/root/raw1.mkv")]))
        .await
        .unwrap();

    match planned.lookup {
        LookupOutcome::Skipped(reason) => assert!(reason.contains("connection refused")),
        other => panic!("Unexpected lookup outcome: {:?}", other),
    }
    assert!(planned.plan_file.exists());
}

#[tokio::test]
async fn test_generation_failure_is_fatal() {
    let work_dir = TempDir::new().unwrap();
    let renamer = Renamer::new(
        FakeLookup::new(LookupBehavior::Miss),
        FakeGenerator::failing("HTTP 500"),
        TEMPLATE.to_string(),
    );
    let result = renamer
        .plan(&piped_request(work_dir.path(), vec![PathBuf::from("/root/raw1.mkv")]))
        .await;

    assert!(matches!(result, Err(Error::GenerationFailed(_))));
    assert_eq!(fs::read_dir(work_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_length_mismatch_writes_no_plan() {
    let work_dir = TempDir::new().unwrap();
    let renamer = Renamer::new(
        FakeLookup::new(LookupBehavior::Found(frieren())),
        FakeGenerator::replying(&proposal(&["/root/S01E01.mkv"])),
        TEMPLATE.to_string(),
    );
    let result = renamer
        .plan(&piped_request(
            work_dir.path(),
            vec![PathBuf::from("/root/raw1.mkv"), PathBuf::from("/root/raw2.mkv")],
        ))
        .await;

    match result {
        Err(Error::Normalize(NormalizeError::LengthMismatch { paths, result })) => {
            assert_eq!(paths.len(), 2);
            assert_eq!(result, vec!["/root/S01E01.mkv".to_string()]);
        }
        other => panic!("Unexpected result: {:?}", other.map(|p| p.plan)),
    }
    assert_eq!(fs::read_dir(work_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_missing_result_field_is_fatal() {
    let work_dir = TempDir::new().unwrap();
    let renamer = Renamer::new(
        FakeLookup::new(LookupBehavior::Miss),
        FakeGenerator::replying("{\"names\": []}"),
        TEMPLATE.to_string(),
    );
    let result = renamer
        .plan(&piped_request(work_dir.path(), vec![PathBuf::from("/root/raw1.mkv")]))
        .await;

    assert!(matches!(
        result,
        Err(Error::Normalize(NormalizeError::MissingResultField { .. }))
    ));
}

#[tokio::test]
async fn test_subtitle_gate_stops_before_services() {
    let work_dir = TempDir::new().unwrap();
    let lookup = FakeLookup::new(LookupBehavior::Found(frieren()));
    let queries = lookup.queries.clone();
    let generator = FakeGenerator::replying(&proposal(&["/root/S01E01.mkv"]));
    let prompts = generator.prompts.clone();

    let renamer = Renamer::new(lookup, generator, TEMPLATE.to_string());
    let mut request = piped_request(work_dir.path(), vec![PathBuf::from("/root/raw1.mkv")]);
    request.require_subtitles = true;

    let result = renamer.plan(&request).await;

    assert!(matches!(result, Err(Error::NoSubtitles(1))));
    assert!(queries.lock().unwrap().is_empty());
    assert!(prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_plan_from_directory_uses_directory_title() {
    let work_dir = TempDir::new().unwrap();
    let downloads = TempDir::new().unwrap();
    let release = downloads.path().join("[Grp] Sousou no Frieren [1080p]");
    fs::create_dir(&release).unwrap();
    fs::write(release.join("01.mkv"), "video").unwrap();
    fs::write(release.join("01.sc.srt"), "subs").unwrap();

    let lookup = FakeLookup::new(LookupBehavior::Miss);
    let queries = lookup.queries.clone();
    let renamer = Renamer::new(
        lookup,
        FakeGenerator::replying(&proposal(&["S01E01.mkv", "S01E01.sc.srt"])),
        TEMPLATE.to_string(),
    );

    let request = PlanRequest {
        source: CandidateSource::Directories(vec![release.clone()]),
        search_terms: vec![],
        require_subtitles: true,
        max_depth: 2,
        working_dir: work_dir.path().to_path_buf(),
    };
    let planned = renamer.plan(&request).await.unwrap();

    assert_eq!(queries.lock().unwrap().as_slice(), ["Sousou no Frieren".to_string()]);
    assert_eq!(planned.candidates, vec![release.join("01.mkv"), release.join("01.sc.srt")]);
    assert_eq!(
        planned.plan.target_of(&release.join("01.sc.srt")),
        Some(Path::new("S01E01.chs.srt"))
    );
    assert_eq!(
        planned.plan_file,
        work_dir.path().join(".Sousou no Frieren.rename-plan.json")
    );
}

#[tokio::test]
async fn test_empty_candidates_rejected() {
    let work_dir = TempDir::new().unwrap();
    let renamer = Renamer::new(
        FakeLookup::new(LookupBehavior::Miss),
        FakeGenerator::replying(&proposal(&[])),
        TEMPLATE.to_string(),
    );
    let result = renamer.plan(&piped_request(work_dir.path(), vec![])).await;
    assert!(matches!(result, Err(Error::NoCandidates)));
}
