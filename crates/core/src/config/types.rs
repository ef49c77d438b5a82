use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// How the engine treats save requests from unauthenticated sessions.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SavePolicy {
    /// Save affordance hidden without login; the engine fails closed before mutating.
    #[default]
    Strict,
    /// Save affordance always shown; the server decides.
    Permissive,
}

/// Engine session behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub save_policy: SavePolicy,
    /// Results per page (default: 5)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Re-query the owned-books mirror after each successful save
    #[serde(default = "default_true")]
    pub refresh_after_save: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            save_policy: SavePolicy::default(),
            page_size: default_page_size(),
            refresh_after_save: true,
        }
    }
}

fn default_page_size() -> usize {
    crate::engine::DEFAULT_PAGE_SIZE
}

fn default_true() -> bool {
    true
}

/// Google Books catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub base_url: String,
    /// Optional API key (anonymous quota applies without one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Maximum results per query (Google Books caps this at 40)
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            api_key: None,
            max_results: default_max_results(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_catalog_url() -> String {
    "https://www.googleapis.com/books/v1".to_string()
}

fn default_max_results() -> u32 {
    40
}

fn default_timeout() -> u32 {
    30
}

/// Owned-books GraphQL server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Query a specific user's books instead of the token owner's
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: default_store_endpoint(),
            timeout_secs: default_timeout(),
            user_id: None,
        }
    }
}

fn default_store_endpoint() -> String {
    "http://localhost:3001/graphql".to_string()
}

/// Durable saved-id cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("shelfsync.db")
}

/// Authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Bearer token issued by the collection server. Absent = anonymous.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub session: SessionConfig,
    pub catalog: SanitizedCatalogConfig,
    pub store: StoreConfig,
    pub cache: CacheConfig,
    pub auth: SanitizedAuthConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub max_results: u32,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub token_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            session: config.session.clone(),
            catalog: SanitizedCatalogConfig {
                base_url: config.catalog.base_url.clone(),
                api_key_configured: config
                    .catalog
                    .api_key
                    .as_ref()
                    .is_some_and(|k| !k.is_empty()),
                max_results: config.catalog.max_results,
                timeout_secs: config.catalog.timeout_secs,
            },
            store: config.store.clone(),
            cache: config.cache.clone(),
            auth: SanitizedAuthConfig {
                token_configured: config.auth.token.as_ref().is_some_and(|t| !t.is_empty()),
            },
        }
    }
}
