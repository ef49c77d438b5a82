//! Server-side collection of owned books.

mod graphql;
mod types;

pub use graphql::{GraphqlOwnedBooksStore, GraphqlStoreConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::Token;

/// Errors returned by an owned-books backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server refused the call for lack of (valid) credentials.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Server processed the request and reported errors.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Non-success HTTP status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Backend could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Read/append access to the authenticated user's collection.
///
/// Tokens are passed per call so the same store can serve anonymous and
/// logged-in sessions; the backend decides what an absent token means.
#[async_trait]
pub trait OwnedBooksStore: Send + Sync {
    /// Fetch owned books, optionally for an explicit user id.
    async fn query(
        &self,
        token: Option<&Token>,
        user_id: Option<&str>,
    ) -> Result<Vec<OwnedBook>, StoreError>;

    /// Add a book to the collection and return the server record.
    async fn append(
        &self,
        token: Option<&Token>,
        input: &BookInput,
    ) -> Result<OwnedBook, StoreError>;
}
