//! Google Books API client.
//!
//! Uses the public `volumes` search endpoint. An API key is optional; without
//! one the anonymous per-IP quota applies and 429s are more likely.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::{ImageLinks, RawEntry};
use super::{CatalogError, CatalogSearchClient};
use crate::config::CatalogConfig;

/// Google Books client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleBooksConfig {
    /// Base URL (default: https://www.googleapis.com/books/v1).
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// `maxResults` sent with every query.
    pub max_results: u32,
    pub timeout_secs: u32,
}

impl From<&CatalogConfig> for GoogleBooksConfig {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            max_results: config.max_results,
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Google Books API client.
pub struct GoogleBooksClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    max_results: u32,
}

impl GoogleBooksClient {
    /// Create a new Google Books client.
    pub fn new(config: GoogleBooksConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(format!("shelfsync/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            max_results: config.max_results,
        })
    }
}

#[async_trait]
impl CatalogSearchClient for GoogleBooksClient {
    async fn search(&self, query: &str) -> Result<Vec<RawEntry>, CatalogError> {
        let url = format!("{}/volumes", self.base_url);

        debug!(
            "Google Books search: query='{}', max_results={}",
            query, self.max_results
        );

        let mut params = vec![
            ("q", query.to_string()),
            ("maxResults", self.max_results.to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }

        let response = self.client.get(&url).query(&params).send().await?;

        let status = response.status();
        if status == 429 {
            warn!("Google Books rate limit exceeded");
            return Err(CatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let search_result: GbSearchResponse = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse volumes response: {}", e))
        })?;

        Ok(search_result.into_entries())
    }

    fn name(&self) -> &'static str {
        "google_books"
    }
}

// ============================================================================
// Google Books API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct GbSearchResponse {
    // Absent when nothing matched.
    #[serde(default)]
    items: Vec<GbVolume>,
}

impl GbSearchResponse {
    fn into_entries(self) -> Vec<RawEntry> {
        self.items.into_iter().map(RawEntry::from).collect()
    }
}

#[derive(Debug, Deserialize)]
struct GbVolume {
    id: String,
    #[serde(rename = "volumeInfo", default)]
    volume_info: GbVolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GbVolumeInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Option<Vec<String>>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image_links: Option<GbImageLinks>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GbImageLinks {
    #[serde(default)]
    small_thumbnail: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
}

impl From<GbVolume> for RawEntry {
    fn from(gb: GbVolume) -> Self {
        let info = gb.volume_info;
        RawEntry {
            id: gb.id,
            title: info.title,
            authors: info.authors,
            description: info.description,
            image_links: info.image_links.map(|links| ImageLinks {
                small_thumbnail: links.small_thumbnail,
                thumbnail: links.thumbnail,
            }),
        }
    }
}
