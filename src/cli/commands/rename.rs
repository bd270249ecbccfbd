//! Rename command implementation.
//!
//! Collects candidates, asks TMDB and the generator for a plan, writes the
//! plan artifact, then (after confirmation) executes and archives it.

use crate::cli::output;
use crate::core::executor::Executor;
use crate::core::persistence;
use crate::core::pipeline::{self, CandidateSource, LookupOutcome, PlanRequest, Renamer};
use crate::models::config::AppConfig;
use crate::models::plan::ExecutionSummary;
use crate::services::openrouter::OpenRouterClient;
use crate::services::tmdb::TmdbClient;
use crate::Result;
use colored::Colorize;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

/// Options for the rename command.
#[derive(Debug, Clone, Default)]
pub struct RenameOptions {
    pub dirs: Vec<PathBuf>,
    pub dry_run: bool,
    pub search: Vec<String>,
    pub require_subtitles: bool,
    pub yes: bool,
    pub max_depth: Option<usize>,
}

/// Read candidate paths piped on stdin.
fn read_stdin_paths() -> Result<Vec<PathBuf>> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(crate::Error::NoCandidates);
    }
    let mut text = String::new();
    stdin.lock().read_to_string(&mut text)?;
    Ok(pipeline::parse_path_list(&text))
}

/// Execute the rename command.
pub async fn rename(options: RenameOptions, config: &AppConfig) -> Result<()> {
    let source = if options.dirs.is_empty() {
        CandidateSource::Paths(read_stdin_paths()?)
    } else {
        CandidateSource::Directories(options.dirs.clone())
    };
    let confirm_first = source.is_directories() && !options.yes;

    let request = PlanRequest {
        source,
        search_terms: options.search.clone(),
        require_subtitles: options.require_subtitles,
        max_depth: options.max_depth.unwrap_or(config.max_depth),
        working_dir: std::env::current_dir()?,
    };

    let prompt = pipeline::load_prompt(config.prompt_path.as_deref())?;
    let lookup = TmdbClient::new(config.tmdb.clone())?;
    let generator = OpenRouterClient::new(config.openrouter.clone())?;
    tracing::debug!("Using model {}", generator.model());

    eprintln!("{}", "[PLAN] Requesting rename plan...".bold().cyan());
    let renamer = Renamer::new(lookup, generator, prompt);
    let planned = renamer.plan(&request).await?;

    match &planned.lookup {
        LookupOutcome::Found(summary) => {
            eprintln!("  {} {}", "TMDB:".bold(), summary.title());
        }
        LookupOutcome::Skipped(reason) => {
            eprintln!("  {} {}", "TMDB:".bold(), format!("skipped ({})", reason).yellow());
        }
    }
    eprintln!();

    output::print_plan(&planned.plan);

    let executor = Executor::new();
    output::print_warnings(&executor.validate(&planned.plan));

    println!();
    println!(
        "{} {}",
        "[OK] Plan saved to:".bold().green(),
        planned.plan_file.display()
    );

    if options.dry_run {
        println!("{}", "[DRY-RUN] No files were renamed".yellow());
        return Ok(());
    }

    if confirm_first && !output::confirm("Proceed with renaming?")? {
        println!("Aborted. The plan is kept for `bt-rename apply`.");
        return Ok(());
    }

    let results = output::execute_with_progress(&executor, &planned.plan);
    let summary = output::print_results(&results);

    let backup = persistence::archive_plan(&planned.plan_file, &planned.plan)?;
    println!("Moved plan file to: {}", backup.display());

    check_summary(&summary)
}

/// Turn failed entries into a non-zero exit.
pub(crate) fn check_summary(summary: &ExecutionSummary) -> Result<()> {
    if summary.is_success() {
        Ok(())
    } else {
        Err(crate::Error::ExecuteError(format!(
            "{} of {} renames failed",
            summary.failed,
            summary.renamed + summary.unchanged + summary.failed
        )))
    }
}
