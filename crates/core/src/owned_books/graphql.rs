//! GraphQL client for the collection server.
//!
//! The server exposes `user { ownedBooks }` (scoped by the bearer token),
//! `userBooks(userId)` and the `addBook(bookInput)` mutation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::types::{BookInput, OwnedBook};
use super::{OwnedBooksStore, StoreError};
use crate::auth::Token;
use crate::config::StoreConfig;

const QUERY_USER: &str = "query me { user { _id username ownedBooks { _id title authors description image bookId } } }";

const QUERY_USER_BOOKS: &str = "query getUserOwnedBooks($userId: ID!) { userBooks(userId: $userId) { _id title authors description condition image bookId category { _id name } owner { _id username } } }";

const MUTATION_ADD_BOOK: &str = "mutation addBook($bookInput: BookInput!) { addBook(bookInput: $bookInput) { _id title authors description image bookId } }";

/// GraphQL store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphqlStoreConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    pub timeout_secs: u32,
}

impl From<&StoreConfig> for GraphqlStoreConfig {
    fn from(config: &StoreConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Owned-books store backed by the collection server's GraphQL API.
pub struct GraphqlOwnedBooksStore {
    client: Client,
    endpoint: String,
}

impl GraphqlOwnedBooksStore {
    pub fn new(config: GraphqlStoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }

    /// POST one operation and unwrap its `data` payload.
    async fn execute<T: DeserializeOwned>(
        &self,
        token: Option<&Token>,
        query: &str,
        variables: Value,
    ) -> Result<T, StoreError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));

        if let Some(token) = token {
            request = request.header(reqwest::header::AUTHORIZATION, token.bearer());
        }

        let response = request.send().await?;

        let status = response.status();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Unauthorized(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: GqlResponse<T> = response
            .json()
            .await
            .map_err(|e| StoreError::ParseError(format!("Failed to parse GraphQL response: {}", e)))?;

        body.into_result()
    }
}

#[async_trait]
impl OwnedBooksStore for GraphqlOwnedBooksStore {
    async fn query(
        &self,
        token: Option<&Token>,
        user_id: Option<&str>,
    ) -> Result<Vec<OwnedBook>, StoreError> {
        match user_id {
            Some(user_id) => {
                debug!("GraphQL userBooks: user_id={}", user_id);
                let data: UserBooksData = self
                    .execute(token, QUERY_USER_BOOKS, json!({ "userId": user_id }))
                    .await?;
                Ok(data.user_books)
            }
            None => {
                debug!("GraphQL user.ownedBooks for token owner");
                let data: UserData = self.execute(token, QUERY_USER, json!({})).await?;
                Ok(data.user.map(|u| u.owned_books).unwrap_or_default())
            }
        }
    }

    async fn append(
        &self,
        token: Option<&Token>,
        input: &BookInput,
    ) -> Result<OwnedBook, StoreError> {
        debug!("GraphQL addBook: book_id={}", input.book_id);
        let data: AddBookData = self
            .execute(token, MUTATION_ADD_BOOK, json!({ "bookInput": input }))
            .await?;

        data.add_book.ok_or_else(|| {
            warn!("addBook returned no record for {}", input.book_id);
            StoreError::Rejected(format!("addBook returned no record for {}", input.book_id))
        })
    }
}

// ============================================================================
// GraphQL Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct GqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GqlError>,
}

impl<T> GqlResponse<T> {
    fn into_result(self) -> Result<T, StoreError> {
        if let Some(first) = self.errors.first() {
            let message = self
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(if first.is_auth_error() {
                StoreError::Unauthorized(message)
            } else {
                StoreError::Rejected(message)
            });
        }
        self.data
            .ok_or_else(|| StoreError::ParseError("response has neither data nor errors".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GqlError {
    message: String,
    #[serde(default)]
    extensions: Option<GqlErrorExtensions>,
}

impl GqlError {
    fn is_auth_error(&self) -> bool {
        let coded = self
            .extensions
            .as_ref()
            .and_then(|ext| ext.code.as_deref())
            .is_some_and(|code| code == "UNAUTHENTICATED" || code == "FORBIDDEN");
        coded || self.message.to_lowercase().contains("logged in")
    }
}

#[derive(Debug, Deserialize)]
struct GqlErrorExtensions {
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    #[serde(default)]
    user: Option<GqlUser>,
}

#[derive(Debug, Deserialize)]
struct GqlUser {
    #[serde(rename = "ownedBooks", default)]
    owned_books: Vec<OwnedBook>,
}

#[derive(Debug, Deserialize)]
struct UserBooksData {
    #[serde(rename = "userBooks", default)]
    user_books: Vec<OwnedBook>,
}

#[derive(Debug, Deserialize)]
struct AddBookData {
    #[serde(rename = "addBook", default)]
    add_book: Option<OwnedBook>,
}
