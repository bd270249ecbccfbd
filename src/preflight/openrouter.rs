//! OpenRouter preflight check.

use super::CheckResult;
use crate::models::config::OpenRouterConfig;

/// Check that an API key and model are configured.
pub fn check(config: &OpenRouterConfig) -> CheckResult {
    if config.api_key.is_none() {
        return CheckResult::fail(
            "OpenRouter",
            "API key not configured",
            "Set OPENROUTER_API_KEY environment variable",
        );
    }
    if config.model.trim().is_empty() {
        return CheckResult::fail(
            "OpenRouter",
            "model not configured",
            "Set OPENROUTER_MODEL environment variable",
        );
    }
    CheckResult::ok("OpenRouter", &format!("model {}", config.model))
}
