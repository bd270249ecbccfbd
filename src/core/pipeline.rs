//! Rename planning pipeline.
//!
//! One run moves through explicit stages:
//!
//! 1. collect candidates (piped paths or directory discovery)
//! 2. gate on subtitle presence, when asked to
//! 3. pick a search title
//! 4. look up metadata; a miss or network error degrades to "no metadata"
//! 5. request a proposal from the generator
//! 6. normalize the proposal into a [`RenamePlan`]
//! 7. persist the plan artifact
//!
//! Execution and archiving are left to the caller, which may ask for
//! confirmation in between.

use crate::core::executor::conflicting_targets;
use crate::core::naming::{classify, extract_title};
use crate::core::normalizer::normalize;
use crate::core::persistence::{plan_file_path, save_plan};
use crate::core::scanner::{absolute_path, dedup_paths, discover_all};
use crate::models::media::{MediaClass, MetadataSummary};
use crate::models::plan::RenamePlan;
use crate::services::{MetadataLookup, NameGenerator};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Placeholder replaced by the newline-joined candidate list.
pub const FILES_PLACEHOLDER: &str = "<<FILES>>";
/// Placeholder replaced by the metadata summary.
pub const METADATA_PLACEHOLDER: &str = "<<TMDB_INFO>>";
/// Substituted for the metadata when the lookup found nothing.
pub const NO_METADATA_NOTE: &str = "(no metadata available)";

/// Built-in prompt template.
pub const DEFAULT_PROMPT: &str = include_str!("../prompts/rename_plan_prompt.txt");

/// Load the prompt template from `path`, or the built-in one.
pub fn load_prompt(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| Error::PromptTemplate {
            path: path.display().to_string(),
            reason: e.to_string(),
        }),
        None => Ok(DEFAULT_PROMPT.to_string()),
    }
}

/// Where the candidate paths come from.
#[derive(Debug, Clone)]
pub enum CandidateSource {
    /// Paths given directly, e.g. piped on stdin.
    Paths(Vec<PathBuf>),
    /// Directories to discover candidates under.
    Directories(Vec<PathBuf>),
}

impl CandidateSource {
    /// Whether the run was started on explicit directories.
    pub fn is_directories(&self) -> bool {
        matches!(self, CandidateSource::Directories(_))
    }
}

/// Parse newline-separated paths, skipping blank lines.
pub fn parse_path_list(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Stage 1: absolute, deduplicated candidate paths.
pub fn collect_candidates(source: &CandidateSource, max_depth: usize) -> Result<Vec<PathBuf>> {
    let candidates = match source {
        CandidateSource::Paths(paths) => dedup_paths(paths.iter().cloned()),
        CandidateSource::Directories(dirs) => discover_all(dirs, max_depth)?,
    };

    if candidates.is_empty() {
        return Err(Error::NoCandidates);
    }
    Ok(candidates)
}

/// Stage 2: require at least one subtitle among the candidates.
pub fn gate_subtitles(candidates: &[PathBuf], required: bool) -> Result<()> {
    if !required {
        return Ok(());
    }
    if candidates
        .iter()
        .any(|p| classify(p) == MediaClass::Subtitle)
    {
        Ok(())
    } else {
        Err(Error::NoSubtitles(candidates.len()))
    }
}

/// Stage 3: the title to search the metadata service for.
///
/// Explicit search terms win. Otherwise the title is derived from the first
/// directory argument, or from `cwd` for piped paths. Returns `None` when
/// the cleaned name is empty.
pub fn search_title(search_terms: &[String], source: &CandidateSource, cwd: &Path) -> Option<String> {
    let joined = search_terms.join(" ").trim().to_string();
    if !joined.is_empty() {
        return Some(joined);
    }

    let dir = match source {
        CandidateSource::Directories(dirs) => dirs.first().map(|d| absolute_path(d)),
        CandidateSource::Paths(_) => Some(cwd.to_path_buf()),
    }?;

    let name = dir.file_name()?.to_string_lossy().to_string();
    let title = extract_title(&name);
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Result of the metadata stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(MetadataSummary),
    /// Continue without metadata, for the given reason.
    Skipped(String),
}

impl LookupOutcome {
    pub fn summary(&self) -> Option<&MetadataSummary> {
        match self {
            LookupOutcome::Found(summary) => Some(summary),
            LookupOutcome::Skipped(_) => None,
        }
    }
}

/// Stage 4: look up metadata, never failing the run.
pub async fn lookup_metadata<L: MetadataLookup>(lookup: &L, title: Option<&str>) -> LookupOutcome {
    let title = match title {
        Some(title) if !title.trim().is_empty() => title,
        _ => return LookupOutcome::Skipped("no search title".to_string()),
    };

    match lookup.lookup(title).await {
        Ok(Some(summary)) => {
            tracing::info!("Metadata found for '{}': {}", title, summary.title());
            LookupOutcome::Found(summary)
        }
        Ok(None) => {
            tracing::warn!("No metadata match for '{}'", title);
            LookupOutcome::Skipped(format!("no match for '{}'", title))
        }
        Err(e) => {
            tracing::warn!("Metadata lookup failed for '{}': {}", title, e);
            LookupOutcome::Skipped(format!("lookup failed: {}", e))
        }
    }
}

/// Fill the prompt template.
pub fn build_prompt(template: &str, candidates: &[PathBuf], metadata: Option<&MetadataSummary>) -> String {
    let files = candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    let info = metadata
        .map(MetadataSummary::to_prompt_text)
        .unwrap_or_else(|| NO_METADATA_NOTE.to_string());

    template
        .replace(FILES_PLACEHOLDER, &files)
        .replace(METADATA_PLACEHOLDER, &info)
}

/// Stage 5: ask the generator for a proposal.
pub async fn request_proposal<G: NameGenerator>(generator: &G, prompt: &str) -> Result<String> {
    let response = generator.generate(prompt).await?;
    if response.trim().is_empty() {
        return Err(Error::GenerationFailed("empty response".to_string()));
    }
    tracing::debug!("Generation response:\n{}", response);
    Ok(response)
}

/// Inputs for one planning run.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub source: CandidateSource,
    /// Explicit search terms; bypass the directory-name heuristic.
    pub search_terms: Vec<String>,
    pub require_subtitles: bool,
    pub max_depth: usize,
    /// Working directory. The plan artifact is written here, and for piped
    /// paths its name is the fallback search title.
    pub working_dir: PathBuf,
}

/// Everything produced by a successful planning run.
#[derive(Debug)]
pub struct PlannedRename {
    pub candidates: Vec<PathBuf>,
    pub title: Option<String>,
    pub lookup: LookupOutcome,
    pub response: String,
    pub plan: RenamePlan,
    pub plan_file: PathBuf,
}

/// Drives the planning stages against a metadata lookup and a generator.
pub struct Renamer<L, G> {
    lookup: L,
    generator: G,
    prompt: String,
}

impl<L: MetadataLookup, G: NameGenerator> Renamer<L, G> {
    pub fn new(lookup: L, generator: G, prompt: String) -> Self {
        Self {
            lookup,
            generator,
            prompt,
        }
    }

    /// Run stages 1-7 and return the persisted plan.
    pub async fn plan(&self, request: &PlanRequest) -> Result<PlannedRename> {
        let candidates = collect_candidates(&request.source, request.max_depth)?;
        tracing::info!("Collected {} candidate paths", candidates.len());

        gate_subtitles(&candidates, request.require_subtitles)?;

        let title = search_title(&request.search_terms, &request.source, &request.working_dir);
        tracing::info!("Search title: {}", title.as_deref().unwrap_or("<none>"));

        let lookup = lookup_metadata(&self.lookup, title.as_deref()).await;
        if let LookupOutcome::Skipped(reason) = &lookup {
            tracing::info!("Continuing without metadata: {}", reason);
        }

        let prompt = build_prompt(&self.prompt, &candidates, lookup.summary());
        tracing::debug!("Prompt:\n{}", prompt);

        let response = request_proposal(&self.generator, &prompt).await?;

        let plan = normalize(&candidates, &response)?;
        tracing::info!("Normalized plan with {} entries", plan.len());
        for target in conflicting_targets(&plan) {
            tracing::warn!("Conflicting target in plan: {:?}", target);
        }

        let plan_file = plan_file_path(&request.working_dir, title.as_deref());
        save_plan(&plan, &plan_file)?;

        Ok(PlannedRename {
            candidates,
            title,
            lookup,
            response,
            plan,
            plan_file,
        })
    }
}
