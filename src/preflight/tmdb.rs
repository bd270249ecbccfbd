//! TMDB API preflight check.

use super::CheckResult;
use crate::models::config::TmdbConfig;

/// Check that a TMDB key is configured.
pub fn check(config: &TmdbConfig) -> CheckResult {
    match config.api_key {
        Some(_) if config.use_bearer() => {
            CheckResult::ok("TMDB API", &format!("bearer token ({})", config.language))
        }
        Some(_) => CheckResult::ok("TMDB API", &format!("API key ({})", config.language)),
        None => CheckResult::fail(
            "TMDB API",
            "API key not configured",
            "Set TMDB_API_KEY environment variable",
        ),
    }
}
