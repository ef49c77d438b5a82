//! Book catalog search.
//!
//! The catalog is the external, read-only source of search results. The
//! engine only ever asks it one thing: "what matches this text?".

mod google_books;
mod types;

pub use google_books::{GoogleBooksClient, GoogleBooksConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Backend could not be reached.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Free-text search over an external book catalog.
#[async_trait]
pub trait CatalogSearchClient: Send + Sync {
    /// Search the catalog. Entries come back in the backend's order.
    async fn search(&self, query: &str) -> Result<Vec<RawEntry>, CatalogError>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}
