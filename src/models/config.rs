//! Configuration model.
//!
//! Settings are read once at startup from `config.toml` in the user config
//! directory and then overridden by environment variables:
//! - `TMDB_API_KEY`, `TMDB_LANGUAGE`
//! - `OPENROUTER_API_KEY`, `OPENROUTER_MODEL`, `OPENROUTER_BASE_URL`
//! - `BT_RENAME_PROMPT`: path to a custom prompt template
//! - `BT_RENAME_MAX_DEPTH`: discovery depth

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_LANGUAGE: &str = "zh-CN";
const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite";
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MAX_DEPTH: usize = 2;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// TMDB configuration.
    pub tmdb: TmdbConfig,
    /// OpenRouter configuration.
    pub openrouter: OpenRouterConfig,
    /// Custom prompt template (built-in template when unset).
    pub prompt_path: Option<PathBuf>,
    /// Maximum discovery depth below each directory argument.
    pub max_depth: usize,
}

/// TMDB configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// API key (v3) or Bearer token (v4).
    pub api_key: Option<String>,
    /// Language for responses.
    pub language: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// OpenRouter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tmdb: TmdbConfig::default(),
            openrouter: OpenRouterConfig::default(),
            prompt_path: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: DEFAULT_LANGUAGE.to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.2,
            timeout_secs: 30,
        }
    }
}

impl TmdbConfig {
    /// Bearer tokens start with "eyJ" (base64 encoded JWT header).
    pub fn use_bearer(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| k.starts_with("eyJ"))
            .unwrap_or(false)
    }
}

impl AppConfig {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Self {
        let mut config = match config_file_path() {
            Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::Error::other(format!("{}: {}", path.display(), e)))
    }

    /// Override fields from environment-style key lookups.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("TMDB_API_KEY") {
            self.tmdb.api_key = Some(key);
        }
        if let Some(language) = get("TMDB_LANGUAGE") {
            self.tmdb.language = language;
        }
        if let Some(key) = get("OPENROUTER_API_KEY") {
            self.openrouter.api_key = Some(key);
        }
        if let Some(model) = get("OPENROUTER_MODEL") {
            self.openrouter.model = model;
        }
        if let Some(url) = get("OPENROUTER_BASE_URL") {
            self.openrouter.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = get("BT_RENAME_PROMPT") {
            self.prompt_path = Some(PathBuf::from(path));
        }
        if let Some(depth) = get("BT_RENAME_MAX_DEPTH").and_then(|d| d.parse().ok()) {
            self.max_depth = depth;
        }
    }
}

/// Get the configuration directory path.
fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bt_rename"))
}

/// Location of the optional config file.
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.tmdb.language, "zh-CN");
        assert_eq!(config.tmdb.timeout_secs, 10);
        assert_eq!(config.openrouter.model, "google/gemini-2.5-flash-lite");
        assert_eq!(config.openrouter.timeout_secs, 30);
        assert!(config.tmdb.api_key.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TMDB_API_KEY", "abc"),
            ("OPENROUTER_API_KEY", "sk-or"),
            ("OPENROUTER_MODEL", ""),
            ("OPENROUTER_BASE_URL", "http://localhost:8080/v1/"),
            ("BT_RENAME_MAX_DEPTH", "3"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.tmdb.api_key.as_deref(), Some("abc"));
        assert_eq!(config.openrouter.api_key.as_deref(), Some("sk-or"));
        // Empty values do not clobber defaults
        assert_eq!(config.openrouter.model, "google/gemini-2.5-flash-lite");
        assert_eq!(config.openrouter.base_url, "http://localhost:8080/v1");
        assert_eq!(config.max_depth, 3);
    }

    #[test]
    fn test_use_bearer() {
        let mut tmdb = TmdbConfig::default();
        assert!(!tmdb.use_bearer());
        tmdb.api_key = Some("eyJhbGciOi".to_string());
        assert!(tmdb.use_bearer());
        tmdb.api_key = Some("0123abcd".to_string());
        assert!(!tmdb.use_bearer());
    }

    #[test]
    fn test_partial_toml() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "max_depth = 4\n[openrouter]\nmodel = \"x/y\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.openrouter.model, "x/y");
        assert_eq!(config.openrouter.temperature, 0.2);
        assert_eq!(config.tmdb.language, "zh-CN");
    }
}
