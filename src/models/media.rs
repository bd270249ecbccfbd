//! Media-related data models.

use serde::{Deserialize, Serialize};

/// Classification of a path by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaClass {
    Video,
    Subtitle,
    Other,
}

impl std::fmt::Display for MediaClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaClass::Video => write!(f, "video"),
            MediaClass::Subtitle => write!(f, "subtitle"),
            MediaClass::Other => write!(f, "other"),
        }
    }
}

/// One season of a series as reported by TMDB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season_number: u16,
    pub name: String,
    pub episode_count: u16,
}

/// Reduced projection of a TMDB record, fed into the generation prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataSummary {
    Series {
        name: String,
        first_air_date: Option<String>,
        seasons: Vec<SeasonSummary>,
    },
    Movie {
        title: String,
        release_date: Option<String>,
    },
}

impl MetadataSummary {
    /// Display name of the series or movie.
    pub fn title(&self) -> &str {
        match self {
            MetadataSummary::Series { name, .. } => name,
            MetadataSummary::Movie { title, .. } => title,
        }
    }

    /// Textual form substituted into the prompt.
    pub fn to_prompt_text(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}
