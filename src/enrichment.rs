/*!
 * Optional remote metadata enrichment.
 *
 * Looks up series information for a parsed title against a remote catalog.
 * This is strictly best-effort: the pipeline logs what it learns and carries
 * on identically whether the lookup succeeds, misses, or fails.
 */

use anyhow::{Result, Context};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::app_config::EnrichmentConfig;

/// Series information returned by a catalog lookup
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesInfo {
    /// Canonical series title
    pub title: String,

    /// Catalog page URL if available
    pub url: Option<String>,

    /// Thumbnail image URL if available
    pub image_url: Option<String>,
}

/// Catalog lookup interface. Injected so tests can substitute a mock and the
/// pipeline never grows a hard dependency on a remote service.
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Look up a series by title. Ok(None) means the catalog had no match.
    async fn lookup(&self, title: &str) -> Result<Option<SeriesInfo>>;
}

/// Jikan (MyAnimeList) API response envelope
#[derive(Debug, Deserialize)]
struct JikanSearchResponse {
    #[serde(default)]
    data: Vec<JikanAnime>,
}

#[derive(Debug, Deserialize)]
struct JikanAnime {
    title: String,
    url: Option<String>,
    images: Option<JikanImages>,
}

#[derive(Debug, Deserialize)]
struct JikanImages {
    jpg: Option<JikanImageSet>,
}

#[derive(Debug, Deserialize)]
struct JikanImageSet {
    image_url: Option<String>,
}

/// Enricher backed by the Jikan REST API
pub struct JikanClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl JikanClient {
    /// Build a client from the enrichment configuration
    pub fn new(config: &EnrichmentConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build enrichment HTTP client")?;

        // Url::join treats the last path segment as a file unless the base
        // ends with a slash, which would strip the API version segment.
        let mut raw = config.endpoint.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let endpoint = Url::parse(&raw)
            .with_context(|| format!("Invalid enrichment endpoint: {}", config.endpoint))?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Enricher for JikanClient {
    async fn lookup(&self, title: &str) -> Result<Option<SeriesInfo>> {
        let mut url = self
            .endpoint
            .join("anime")
            .context("Failed to build enrichment lookup URL")?;
        url.query_pairs_mut()
            .append_pair("q", title)
            .append_pair("limit", "1");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Enrichment request failed")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Enrichment service responded with status {}",
                response.status()
            ));
        }

        let body: JikanSearchResponse = response
            .json()
            .await
            .context("Failed to parse enrichment response")?;

        Ok(body.data.into_iter().next().map(|anime| SeriesInfo {
            title: anime.title,
            url: anime.url,
            image_url: anime
                .images
                .and_then(|i| i.jpg)
                .and_then(|j| j.image_url),
        }))
    }
}

/// Mock enricher returning a fixed response, for tests
pub struct MockEnricher {
    response: Option<SeriesInfo>,
}

impl MockEnricher {
    /// Mock that always matches with the given series info
    pub fn with_match(info: SeriesInfo) -> Self {
        Self {
            response: Some(info),
        }
    }

    /// Mock that never matches
    pub fn no_match() -> Self {
        Self { response: None }
    }
}

#[async_trait]
impl Enricher for MockEnricher {
    async fn lookup(&self, _title: &str) -> Result<Option<SeriesInfo>> {
        Ok(self.response.clone())
    }
}
