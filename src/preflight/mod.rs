//! Preflight checks module.
//!
//! Configuration problems are caught here, before any network call.

mod openrouter;
mod tmdb;

use crate::core::pipeline::load_prompt;
use crate::models::config::AppConfig;
use colored::Colorize;

/// Result of a preflight check.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub success: bool,
    pub message: String,
    pub hint: Option<String>,
}

impl CheckResult {
    pub fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            message: message.to_string(),
            hint: None,
        }
    }

    pub fn fail(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }
}

/// Check that the prompt template can be read.
fn check_prompt(config: &AppConfig) -> CheckResult {
    match (&config.prompt_path, load_prompt(config.prompt_path.as_deref())) {
        (None, _) => CheckResult::ok("Prompt", "built-in template"),
        (Some(path), Ok(_)) => CheckResult::ok("Prompt", &path.display().to_string()),
        (Some(_), Err(e)) => CheckResult::fail(
            "Prompt",
            &e.to_string(),
            "Fix or unset the BT_RENAME_PROMPT environment variable",
        ),
    }
}

/// Run all preflight checks.
pub fn run_preflight_checks(config: &AppConfig) -> Vec<CheckResult> {
    vec![
        tmdb::check(&config.tmdb),
        openrouter::check(&config.openrouter),
        check_prompt(config),
    ]
}

/// Print preflight check results.
pub fn print_results(results: &[CheckResult]) {
    for result in results {
        if result.success {
            eprintln!(
                "{} {}: {}",
                "[OK]".green(),
                result.name.bold(),
                result.message
            );
        } else {
            eprintln!(
                "{} {}: {}",
                "[FAIL]".red(),
                result.name.bold(),
                result.message
            );
            if let Some(ref hint) = result.hint {
                eprintln!("  {} {}", "->".yellow(), hint);
            }
        }
    }
}

/// Check if all preflight checks passed.
pub fn all_passed(results: &[CheckResult]) -> bool {
    results.iter().all(|r| r.success)
}
