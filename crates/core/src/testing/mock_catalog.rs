//! Mock catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, CatalogSearchClient, RawEntry};

/// Mock implementation of the CatalogSearchClient trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable entries, per query or as a default
/// - Delay individual queries to force out-of-order responses
/// - Simulate failures
/// - Track queries for assertions
///
/// # Example
///
/// ```rust,ignore
/// use shelfsync_core::testing::{MockCatalog, fixtures};
///
/// let catalog = MockCatalog::new();
/// catalog.set_results("dune", fixtures::dune_entries(7)).await;
/// catalog.set_delay("slow", Duration::from_millis(50)).await;
///
/// let entries = catalog.search("dune").await?;
/// assert_eq!(entries.len(), 7);
/// assert_eq!(catalog.recorded_queries().await, vec!["dune"]);
/// ```
#[derive(Debug, Default)]
pub struct MockCatalog {
    /// Entries by exact query.
    results: Arc<RwLock<HashMap<String, Vec<RawEntry>>>>,
    /// Entries for queries without a specific configuration.
    default_results: Arc<RwLock<Vec<RawEntry>>>,
    /// Artificial latency by exact query.
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Recorded queries, in call order.
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl MockCatalog {
    /// Create a new mock catalog with no entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entries returned for `query`.
    pub async fn set_results(&self, query: &str, entries: Vec<RawEntry>) {
        self.results.write().await.insert(query.to_string(), entries);
    }

    /// Set the entries returned for any unconfigured query.
    pub async fn set_default_results(&self, entries: Vec<RawEntry>) {
        *self.default_results.write().await = entries;
    }

    /// Delay the response for `query`.
    pub async fn set_delay(&self, query: &str, delay: Duration) {
        self.delays.write().await.insert(query.to_string(), delay);
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get recorded queries.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.queries.read().await.len()
    }
}

#[async_trait]
impl CatalogSearchClient for MockCatalog {
    async fn search(&self, query: &str) -> Result<Vec<RawEntry>, CatalogError> {
        self.queries.write().await.push(query.to_string());

        let delay = self.delays.read().await.get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        if let Some(entries) = self.results.read().await.get(query) {
            return Ok(entries.clone());
        }
        Ok(self.default_results.read().await.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
