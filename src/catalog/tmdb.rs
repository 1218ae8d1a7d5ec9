//! TMDB (The Movie Database) catalog.
//!
//! Implements [`Catalog`] by querying the TMDB v3 REST API.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - 30-second request timeout.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use marquee_common::{CatalogItem, Category, CategoryId, MediaKind};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Catalog, DiscoverPage};
use crate::config::TmdbConfig;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;
const DEFAULT_REQUESTS_PER_SECOND: u32 = 4;

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbDiscoverResponse {
    page: Option<u32>,
    #[serde(default)]
    results: Vec<TmdbDiscoverResult>,
    total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TmdbDiscoverResult {
    id: i64,
    /// Movie title or TV show name.
    #[serde(alias = "name")]
    title: Option<String>,
    backdrop_path: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenreList {
    #[serde(default)]
    genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    id: i64,
    name: String,
}

impl From<TmdbDiscoverResult> for CatalogItem {
    fn from(r: TmdbDiscoverResult) -> Self {
        let mut item = CatalogItem::new(r.id, r.title.unwrap_or_default());
        item.backdrop_path = r.backdrop_path;
        item.poster_path = r.poster_path;
        item
    }
}

// ---------------------------------------------------------------------------
// Catalog implementation
// ---------------------------------------------------------------------------

/// TMDB-backed catalog.
///
/// # Examples
///
/// ```no_run
/// use marquee::catalog::TmdbCatalog;
/// use marquee::config::TmdbConfig;
///
/// let mut config = TmdbConfig::default();
/// config.api_key = "your-api-key".into();
/// let catalog = TmdbCatalog::new(&config);
/// ```
pub struct TmdbCatalog {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl TmdbCatalog {
    /// Create a catalog from configuration, rate limited at 4 requests per
    /// second.
    pub fn new(config: &TmdbConfig) -> Self {
        Self::with_rate_limit(config, DEFAULT_REQUESTS_PER_SECOND)
    }

    /// Create a catalog allowing `per_second` requests per second.
    pub fn with_rate_limit(config: &TmdbConfig, per_second: u32) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        let rate = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            rate_limiter,
        }
    }

    /// Returns `true` when an API key is configured.
    pub fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    async fn get(
        &self,
        path: &str,
        extra_params: &[(&str, &str)],
    ) -> anyhow::Result<reqwest::Response> {
        if !self.is_available() {
            anyhow::bail!("TMDB API key is not configured");
        }

        let url = format!("{}{path}", self.base_url);
        let mut params: Vec<(&str, &str)> = vec![
            ("api_key", self.api_key.as_str()),
            ("language", self.language.as_str()),
        ];
        params.extend_from_slice(extra_params);

        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = self
                .client
                .get(&url)
                .query(&params)
                .send()
                .await
                .with_context(|| format!("TMDB request failed: {path}"))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            let resp = resp
                .error_for_status()
                .with_context(|| format!("TMDB request returned error: {path}"))?;

            return Ok(resp);
        }
    }
}

#[async_trait]
impl Catalog for TmdbCatalog {
    async fn discover(
        &self,
        kind: MediaKind,
        category: CategoryId,
        page: u32,
    ) -> anyhow::Result<DiscoverPage> {
        let path = format!("/discover/{}", kind.as_path());
        let genre = category.to_string();
        let page_str = page.to_string();
        debug!(%kind, %category, page, "TMDB discover");

        let body: TmdbDiscoverResponse = self
            .get(
                &path,
                &[
                    ("with_genres", genre.as_str()),
                    ("sort_by", "popularity.desc"),
                    ("page", page_str.as_str()),
                ],
            )
            .await?
            .json()
            .await
            .context("failed to parse TMDB discover response")?;

        Ok(DiscoverPage {
            page: body.page.unwrap_or(page),
            results: body.results.into_iter().map(CatalogItem::from).collect(),
            total_pages: body.total_pages,
        })
    }

    async fn genres(&self, kind: MediaKind) -> anyhow::Result<Vec<Category>> {
        let path = format!("/genre/{}/list", kind.as_path());
        debug!(%kind, "TMDB genre list");

        let body: TmdbGenreList = self
            .get(&path, &[])
            .await?
            .json()
            .await
            .context("failed to parse TMDB genre list response")?;

        Ok(body
            .genres
            .into_iter()
            .map(|g| Category::new(g.id, g.name))
            .collect())
    }
}
