//! Apply command implementation.
//!
//! Reads a plan file, executes it, and moves the plan file into the backup
//! directory.

use super::rename::check_summary;
use crate::cli::output;
use crate::core::executor::Executor;
use crate::core::persistence;
use crate::Result;
use colored::Colorize;
use std::path::Path;

/// Execute a plan file.
pub fn apply(plan_file: &Path) -> Result<()> {
    println!("{}", "[EXEC] Executing plan...".bold().cyan());
    println!("[INFO] Loading plan: {}", plan_file.display());

    let plan = persistence::load_plan(plan_file)?;
    println!("  {} {}", "Entries:".bold(), plan.len());
    println!();

    let executor = Executor::new();
    output::print_warnings(&executor.validate(&plan));

    let results = output::execute_with_progress(&executor, &plan);
    let summary = output::print_results(&results);

    let backup = persistence::archive_plan(plan_file, &plan)?;
    println!();
    println!("Moved plan file to: {}", backup.display());
    println!(
        "  To undo changes: {}",
        format!("bt-rename undo '{}'", backup.display()).cyan()
    );

    check_summary(&summary)
}
