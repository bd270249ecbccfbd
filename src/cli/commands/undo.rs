//! Undo command implementation.
//!
//! Inverts an archived plan and moves every renamed file back.

use super::rename::check_summary;
use crate::cli::output;
use crate::core::executor::{resolve_plan, Executor, ExecutorConfig};
use crate::core::persistence;
use crate::Result;
use colored::Colorize;
use std::path::Path;

/// Reverse a previously applied plan.
pub fn undo(plan_file: &Path, dry_run: bool) -> Result<()> {
    println!("{}", "[UNDO] Reversing plan".bold().cyan());
    println!("[INFO] Loading plan: {}", plan_file.display());

    let plan = persistence::load_plan(plan_file)?;
    let inverse = resolve_plan(&plan)?.inverted()?;
    println!("  {} {}", "Entries:".bold(), inverse.len());
    println!();

    let executor = Executor::with_config(ExecutorConfig {
        mark_unstructured_dirs: false,
    });

    if dry_run {
        println!("{}", "[DRY-RUN] Would move back:".bold().yellow());
        output::print_plan(&inverse);
        output::print_warnings(&executor.validate(&inverse));
        return Ok(());
    }

    let results = output::execute_with_progress(&executor, &inverse);
    let summary = output::print_results(&results);
    check_summary(&summary)
}
