//! Mock owned-books store for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::Token;
use crate::owned_books::{BookInput, OwnedBook, OwnedBooksStore, StoreError};

/// Mock implementation of the OwnedBooksStore trait.
///
/// Keeps an in-memory collection, assigns server ids on append, and records
/// every append for assertions. With `require_token` set it refuses calls
/// without a bearer token the way the real server does.
#[derive(Debug, Default)]
pub struct MockOwnedBooksStore {
    /// Current collection.
    books: Arc<RwLock<Vec<OwnedBook>>>,
    /// Appends received, in call order.
    appends: Arc<RwLock<Vec<BookInput>>>,
    /// Number of query calls.
    queries: Arc<RwLock<usize>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<StoreError>>>,
    /// Refuse calls without a token.
    require_token: Arc<RwLock<bool>>,
    /// Leave appended books out of query responses.
    hide_new_books: Arc<RwLock<bool>>,
    /// Artificial latency for appends.
    append_delay: Arc<RwLock<Option<Duration>>>,
}

impl MockOwnedBooksStore {
    /// Create an empty store that accepts anonymous calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already owns `books`.
    pub async fn with_books(books: Vec<OwnedBook>) -> Self {
        let store = Self::new();
        *store.books.write().await = books;
        store
    }

    /// Refuse calls that carry no token.
    pub async fn set_require_token(&self, required: bool) {
        *self.require_token.write().await = required;
    }

    /// Simulate a lagging read side: appended books are not returned by
    /// `query`.
    pub async fn set_hide_new_books(&self, hide: bool) {
        *self.hide_new_books.write().await = hide;
    }

    /// Delay every append by `delay`.
    pub async fn set_append_delay(&self, delay: Duration) {
        *self.append_delay.write().await = Some(delay);
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: StoreError) {
        *self.next_error.write().await = Some(error);
    }

    /// Appends received so far.
    pub async fn recorded_appends(&self) -> Vec<BookInput> {
        self.appends.read().await.clone()
    }

    /// Number of append calls that reached the store.
    pub async fn append_count(&self) -> usize {
        self.appends.read().await.len()
    }

    /// Number of query calls.
    pub async fn query_count(&self) -> usize {
        *self.queries.read().await
    }

    /// Current collection.
    pub async fn books(&self) -> Vec<OwnedBook> {
        self.books.read().await.clone()
    }

    async fn check_call(&self, token: Option<&Token>) -> Result<(), StoreError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        let authorized = token.map(|t| !t.is_empty()).unwrap_or(false);
        if *self.require_token.read().await && !authorized {
            return Err(StoreError::Unauthorized(
                "You need to be logged in!".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl OwnedBooksStore for MockOwnedBooksStore {
    async fn query(
        &self,
        token: Option<&Token>,
        _user_id: Option<&str>,
    ) -> Result<Vec<OwnedBook>, StoreError> {
        *self.queries.write().await += 1;
        self.check_call(token).await?;

        let books = self.books.read().await.clone();
        if *self.hide_new_books.read().await {
            let appended: Vec<String> = self
                .appends
                .read()
                .await
                .iter()
                .map(|a| a.book_id.clone())
                .collect();
            return Ok(books
                .into_iter()
                .filter(|b| !appended.contains(&b.book_id))
                .collect());
        }
        Ok(books)
    }

    async fn append(
        &self,
        token: Option<&Token>,
        input: &BookInput,
    ) -> Result<OwnedBook, StoreError> {
        self.appends.write().await.push(input.clone());

        let delay = *self.append_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_call(token).await?;

        let book = OwnedBook {
            server_id: Uuid::new_v4().to_string(),
            book_id: input.book_id.clone(),
            title: input.title.clone(),
            authors: input.authors.clone(),
            description: input.description.clone(),
            image: input.image.clone(),
            condition: None,
            category: None,
            owner: None,
        };
        self.books.write().await.push(book.clone());
        Ok(book)
    }
}
