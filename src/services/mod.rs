//! External services.
//!
//! The pipeline talks to the title database and the text generator only
//! through [`MetadataLookup`] and [`NameGenerator`], so tests can swap in
//! fakes.

pub mod openrouter;
pub mod tmdb;

use crate::models::media::MetadataSummary;
use crate::Result;

/// Looks up descriptive metadata for a title.
#[allow(async_fn_in_trait)]
pub trait MetadataLookup {
    /// Best match for `title`, or `None` when nothing matches.
    async fn lookup(&self, title: &str) -> Result<Option<MetadataSummary>>;
}

/// Proposes new file names for a prompt.
#[allow(async_fn_in_trait)]
pub trait NameGenerator {
    /// Raw response text for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
