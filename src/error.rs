//! Error types for the renamer.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the renamer.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("TMDB API key not configured. Set TMDB_API_KEY environment variable")]
    TmdbApiKeyMissing,

    #[error("OpenRouter API key not configured. Set OPENROUTER_API_KEY environment variable")]
    GeneratorApiKeyMissing,

    #[error("Generation model not configured. Set OPENROUTER_MODEL environment variable")]
    GeneratorModelMissing,

    #[error("Failed to load prompt template {path}: {reason}")]
    PromptTemplate { path: String, reason: String },

    // File system errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Target already exists: {0}")]
    TargetExists(String),

    // Discovery errors
    #[error("No candidate paths to rename")]
    NoCandidates,

    #[error("No subtitle files found among {0} candidates")]
    NoSubtitles(usize),

    // Generation errors
    #[error("Generation request failed: {0}")]
    GenerationFailed(String),

    // Normalization errors
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    // Plan errors
    #[error("Invalid plan file: {0}")]
    InvalidPlanFile(String),

    #[error("Duplicate source in plan: {0}")]
    DuplicateSource(String),

    #[error("Execute operation failed: {0}")]
    ExecuteError(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}

/// Reasons a proposal text cannot become a rename plan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Empty rename response")]
    EmptyResponse,

    #[error("Rename response is not valid JSON ({reason}):\n{raw}")]
    InvalidJson { reason: String, raw: String },

    #[error("No 'result' field in rename response JSON:\n{raw}")]
    MissingResultField { raw: String },

    #[error("'result' field is not a list of strings:\n{raw}")]
    ResultNotStringList { raw: String },

    #[error(
        "Mismatch between number of paths ({}) and rename results ({}).\nPaths:\n{}\nResults:\n{}",
        paths.len(),
        result.len(),
        paths.join("\n"),
        result.join("\n")
    )]
    LengthMismatch {
        paths: Vec<String>,
        result: Vec<String>,
    },
}
