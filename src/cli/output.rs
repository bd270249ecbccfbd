//! Console output shared by the commands.

use crate::core::executor::Executor;
use crate::models::plan::{ExecutionResult, ExecutionSummary, RenamePlan};
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};

/// Print the plan as `'old' -> 'new'` lines.
pub fn print_plan(plan: &RenamePlan) {
    for (source, target) in plan.iter() {
        println!(
            "'{}' -> '{}'",
            source.display().to_string().dimmed(),
            target.display().to_string().green()
        );
    }
}

/// Print warnings about the plan, if any.
pub fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!();
    println!("{}", "[WARNING] Plan issues:".bold().yellow());
    for warning in warnings {
        println!("  - {}", warning);
    }
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question.bold());
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Run the executor with a progress bar.
pub fn execute_with_progress(executor: &Executor, plan: &RenamePlan) -> Vec<ExecutionResult> {
    let pb = ProgressBar::new(plan.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let results = executor.execute_with(plan, |result| {
        let name = result
            .source()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        pb.set_message(name);
        pb.inc(1);
    });

    pb.finish_and_clear();
    results
}

/// Print per-entry outcomes and a summary.
pub fn print_results(results: &[ExecutionResult]) -> ExecutionSummary {
    for result in results {
        match result {
            ExecutionResult::Renamed { from, to, created_dir, marker } => {
                if let Some(dir) = created_dir {
                    println!("{} {}", "[MKDIR]".cyan(), dir.display());
                }
                if let Some(marker) = marker {
                    println!("{} {}", "[MARK]".cyan(), marker.display());
                }
                println!(
                    "{} '{}' to '{}'",
                    "Renamed".green(),
                    from.display(),
                    to.display()
                );
            }
            ExecutionResult::Unchanged { path } => {
                println!("{} '{}'", "Unchanged".dimmed(), path.display());
            }
            ExecutionResult::Failed { from, to, error } => {
                eprintln!(
                    "{} '{}' to '{}': {}",
                    "[FAILED]".red().bold(),
                    from.display(),
                    to.display(),
                    error
                );
            }
        }
    }

    let summary = ExecutionSummary::from_results(results);
    println!();
    println!("{}", "[Execution Summary]".bold().green());
    println!("  {} {}", "Renamed:".bold(), summary.renamed);
    println!("  {} {}", "Unchanged:".bold(), summary.unchanged);
    println!("  {} {}", "Directories created:".bold(), summary.dirs_created);
    println!("  {} {}", "Failed:".bold(), summary.failed);
    summary
}
