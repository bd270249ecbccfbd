//! TMDB API client.

use super::MetadataLookup;
use crate::models::config::TmdbConfig;
use crate::models::media::{MetadataSummary, SeasonSummary};
use crate::Result;
use serde::Deserialize;
use std::time::Duration;

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// TMDB API client.
pub struct TmdbClient {
    config: TmdbConfig,
    api_key: String,
    client: reqwest::Client,
}

/// Movie search result.
#[derive(Debug, Deserialize)]
pub struct MovieSearchResult {
    pub results: Vec<MovieSearchItem>,
}

/// Movie search item.
#[derive(Debug, Deserialize)]
pub struct MovieSearchItem {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
}

/// TV show search result.
#[derive(Debug, Deserialize)]
pub struct TvSearchResult {
    pub results: Vec<TvSearchItem>,
}

/// TV show search item.
#[derive(Debug, Deserialize)]
pub struct TvSearchItem {
    pub id: u64,
    pub name: String,
}

/// TV show details.
#[derive(Debug, Deserialize)]
pub struct TvDetails {
    pub name: String,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub seasons: Vec<TvSeason>,
}

/// Season entry within TV show details.
#[derive(Debug, Deserialize)]
pub struct TvSeason {
    pub season_number: u16,
    pub name: String,
    #[serde(default)]
    pub episode_count: u16,
}

impl From<TvDetails> for MetadataSummary {
    fn from(details: TvDetails) -> Self {
        MetadataSummary::Series {
            name: details.name,
            first_air_date: details.first_air_date.filter(|d| !d.is_empty()),
            seasons: details
                .seasons
                .into_iter()
                .map(|s| SeasonSummary {
                    season_number: s.season_number,
                    name: s.name,
                    episode_count: s.episode_count,
                })
                .collect(),
        }
    }
}

impl From<MovieSearchItem> for MetadataSummary {
    fn from(item: MovieSearchItem) -> Self {
        MetadataSummary::Movie {
            title: item.title,
            release_date: item.release_date.filter(|d| !d.is_empty()),
        }
    }
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(crate::Error::TmdbApiKeyMissing)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    /// Build a request with proper authentication.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        if self.config.use_bearer() {
            request.header("Authorization", format!("Bearer {}", self.api_key))
        } else {
            request
        }
    }

    /// Build URL with optional api_key parameter (only for v3 style).
    fn build_url(&self, path: &str, extra_params: &str) -> String {
        if self.config.use_bearer() {
            format!(
                "{}/{}?language={}{}",
                TMDB_BASE_URL, path, self.config.language, extra_params
            )
        } else {
            format!(
                "{}/{}?api_key={}&language={}{}",
                TMDB_BASE_URL, path, self.api_key, self.config.language, extra_params
            )
        }
    }

    /// Search for TV shows.
    pub async fn search_tv(&self, query: &str) -> Result<Vec<TvSearchItem>> {
        let url = self.build_url(
            "search/tv",
            &format!("&query={}", urlencoding::encode(query)),
        );

        let resp: TvSearchResult = self
            .build_request(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp.results)
    }

    /// Get TV show details.
    pub async fn get_tv_details(&self, tv_id: u64) -> Result<TvDetails> {
        let url = self.build_url(&format!("tv/{}", tv_id), "");
        let resp = self
            .build_request(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp)
    }

    /// Search for movies.
    pub async fn search_movie(&self, query: &str) -> Result<Vec<MovieSearchItem>> {
        let url = self.build_url(
            "search/movie",
            &format!("&query={}", urlencoding::encode(query)),
        );

        let resp: MovieSearchResult = self
            .build_request(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp.results)
    }
}

impl MetadataLookup for TmdbClient {
    /// Takes the first TV result; falls back to the first movie result.
    async fn lookup(&self, title: &str) -> Result<Option<MetadataSummary>> {
        if let Some(best) = self.search_tv(title).await?.into_iter().next() {
            tracing::debug!("TMDB TV match for '{}': {} ({})", title, best.name, best.id);
            let details = self.get_tv_details(best.id).await?;
            return Ok(Some(details.into()));
        }

        if let Some(best) = self.search_movie(title).await?.into_iter().next() {
            tracing::debug!("TMDB movie match for '{}': {} ({})", title, best.title, best.id);
            return Ok(Some(best.into()));
        }

        Ok(None)
    }
}
