//! The reconciliation engine.
//!
//! Keeps three sources consistent for one browsing session:
//! - the transient catalog result list,
//! - a mirror of the server's owned books,
//! - the durable saved-id cache.
//!
//! State lives behind a mutex that is never held across an await, so
//! searches may overlap; each carries a generation and only the latest one
//! is allowed to replace the result list.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::error::{IndexError, SaveError, SearchError};
use super::merge::{contains_book, merge_owned};
use super::normalize::normalize_entries;
use super::pager::{page_count, select_page};
use super::types::{ResultView, SaveState, SearchOutcome, SearchResult, SearchTicket};
use crate::auth::AuthProvider;
use crate::catalog::{CatalogError, CatalogSearchClient, RawEntry};
use crate::config::{SavePolicy, SessionConfig};
use crate::metrics;
use crate::owned_books::{OwnedBook, OwnedBooksStore, StoreError};
use crate::save_cache::{CacheError, LocalSaveCache, SavedIdSet};

/// Collaborators the engine talks to.
#[derive(Clone)]
pub struct EngineDeps {
    pub catalog: Arc<dyn CatalogSearchClient>,
    pub store: Arc<dyn OwnedBooksStore>,
    pub cache: Arc<dyn LocalSaveCache>,
    pub auth: Arc<dyn AuthProvider>,
}

#[derive(Debug)]
struct EngineState {
    results: Vec<SearchResult>,
    /// 1-based.
    current_page: usize,
    query_input: String,
    /// Last issued search.
    generation: u64,
    /// Last search whose response was applied or failed.
    settled_generation: u64,
    owned_books: Vec<OwnedBook>,
    /// Books confirmed by a save in this session; survive mirror refreshes.
    session_saves: Vec<OwnedBook>,
    saved_ids: SavedIdSet,
    pending_saves: HashSet<String>,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            current_page: 1,
            query_input: String::new(),
            generation: 0,
            settled_generation: 0,
            owned_books: Vec::new(),
            session_saves: Vec::new(),
            saved_ids: SavedIdSet::new(),
            pending_saves: HashSet::new(),
        }
    }
}

/// Search, save and session-boundary logic for one browsing session.
///
/// The saved-id set is written back to the durable cache exactly once:
/// by [`ReconciliationEngine::end_session`], or on drop if that was never
/// called.
pub struct ReconciliationEngine {
    catalog: Arc<dyn CatalogSearchClient>,
    store: Arc<dyn OwnedBooksStore>,
    cache: Arc<dyn LocalSaveCache>,
    auth: Arc<dyn AuthProvider>,
    options: SessionConfig,
    user_id: Option<String>,
    state: Mutex<EngineState>,
    ended: bool,
}

impl std::fmt::Debug for ReconciliationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationEngine")
            .field("catalog", &self.catalog.name())
            .field("auth", &self.auth.method_name())
            .field("options", &self.options)
            .field("user_id", &self.user_id)
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}

impl ReconciliationEngine {
    /// Create an engine with empty state. Call [`load_session`](Self::load_session)
    /// to pull in the durable cache and the owned-books mirror.
    pub fn new(deps: EngineDeps, options: SessionConfig) -> Self {
        Self {
            catalog: deps.catalog,
            store: deps.store,
            cache: deps.cache,
            auth: deps.auth,
            options,
            user_id: None,
            state: Mutex::new(EngineState::default()),
            ended: false,
        }
    }

    /// Scope owned-book queries to an explicit user instead of the token owner.
    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn query_user_id(&self) -> Option<String> {
        self.user_id.clone().or_else(|| self.auth.user_id())
    }

    pub fn save_policy(&self) -> SavePolicy {
        self.options.save_policy
    }

    pub fn page_size(&self) -> usize {
        self.options.page_size
    }

    // =========================================================================
    // Session start
    // =========================================================================

    /// Initial load: durable saved ids, plus the owned-books mirror when
    /// logged in. Failures degrade to empty state and are logged.
    pub async fn load_session(&self) {
        let cache = Arc::clone(&self.cache);
        let cached = tokio::task::spawn_blocking(move || cache.load());
        let owned = async {
            if self.auth.is_logged_in() {
                Some(self.refresh_owned_books().await)
            } else {
                None
            }
        };

        let (cached, owned) = futures::join!(cached, owned);

        match cached {
            Ok(Ok(ids)) => {
                info!("Loaded {} saved ids from cache", ids.len());
                self.state().saved_ids.extend(ids);
            }
            Ok(Err(e)) => warn!("Failed to load saved-id cache, starting empty: {}", e),
            Err(e) => warn!("Saved-id cache load task failed: {}", e),
        }

        match owned {
            Some(Ok(count)) => info!("Loaded {} owned books", count),
            Some(Err(e)) => warn!("Failed to load owned books, mirror empty: {}", e),
            None => debug!("Anonymous session, owned books not loaded"),
        }
    }

    /// Re-query the owned-books mirror. Returns the mirror size.
    ///
    /// Books saved earlier in this session are kept even if the server's
    /// listing does not show them yet.
    pub async fn refresh_owned_books(&self) -> Result<usize, StoreError> {
        let token = self.auth.token();
        let user_id = self.query_user_id();
        let books = self.store.query(token.as_ref(), user_id.as_deref()).await?;
        Ok(self.apply_owned(books))
    }

    fn apply_owned(&self, books: Vec<OwnedBook>) -> usize {
        let mut state = self.state();
        let mut mirror = books;
        for saved in &state.session_saves {
            if !contains_book(&mirror, &saved.book_id) {
                mirror = merge_owned(mirror, saved.clone());
            }
        }
        let ids: Vec<String> = mirror.iter().map(|b| b.book_id.clone()).collect();
        state.saved_ids.extend(ids);
        state.owned_books = mirror;
        state.owned_books.len()
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub fn query_input(&self) -> String {
        self.state().query_input.clone()
    }

    pub fn set_query_input(&self, text: impl Into<String>) {
        self.state().query_input = text.into();
    }

    /// Search with the current query input.
    pub async fn submit_search(&self) -> Result<SearchOutcome, SearchError> {
        let query = self.query_input();
        self.search_catalog(&query).await
    }

    /// Search the catalog and replace the result list with the response.
    ///
    /// A blank query does nothing. A failed search leaves the previous
    /// results in place.
    pub async fn search_catalog(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let Some(ticket) = self.begin_search(query) else {
            return Ok(SearchOutcome::Ignored);
        };
        let response = self.catalog.search(&ticket.query).await;
        self.complete_search(ticket, response)
    }

    /// Issue a new search generation. `None` for a blank query.
    ///
    /// Every ticket issued before this one becomes stale.
    pub fn begin_search(&self, query: &str) -> Option<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring blank search");
            metrics::SEARCHES.with_label_values(&["empty"]).inc();
            return None;
        }

        let mut state = self.state();
        state.generation += 1;
        debug!(
            "Catalog search #{} via {}: '{}'",
            state.generation,
            self.catalog.name(),
            query
        );
        Some(SearchTicket {
            generation: state.generation,
            query: query.to_string(),
        })
    }

    /// Apply a catalog response for `ticket`, unless a newer search was issued.
    pub fn complete_search(
        &self,
        ticket: SearchTicket,
        response: Result<Vec<RawEntry>, CatalogError>,
    ) -> Result<SearchOutcome, SearchError> {
        let mut state = self.state();

        if ticket.generation != state.generation {
            warn!(
                "Discarding stale response for search #{} '{}' (current #{})",
                ticket.generation, ticket.query, state.generation
            );
            metrics::SEARCHES.with_label_values(&["stale"]).inc();
            return Ok(SearchOutcome::Superseded {
                generation: ticket.generation,
            });
        }
        state.settled_generation = ticket.generation;

        let raw = match response {
            Ok(raw) => raw,
            Err(source) => {
                warn!("Catalog search '{}' failed: {}", ticket.query, source);
                metrics::SEARCHES.with_label_values(&["failed"]).inc();
                return Err(SearchError::Catalog {
                    query: ticket.query,
                    source,
                });
            }
        };

        let results = normalize_entries(raw);
        let count = results.len();

        state.results = results;
        state.current_page = 1;
        state.query_input.clear();

        info!(
            "Search #{} '{}' returned {} results",
            ticket.generation, ticket.query, count
        );
        metrics::SEARCHES.with_label_values(&["applied"]).inc();
        metrics::SEARCH_RESULTS
            .with_label_values(&[])
            .observe(count as f64);

        Ok(SearchOutcome::Applied {
            generation: ticket.generation,
            count,
        })
    }

    /// Generation of the most recently issued search.
    pub fn generation(&self) -> u64 {
        self.state().generation
    }

    /// Whether the latest issued search has not settled yet.
    pub fn is_search_pending(&self) -> bool {
        let state = self.state();
        state.settled_generation < state.generation
    }

    pub fn results(&self) -> Vec<SearchResult> {
        self.state().results.clone()
    }

    pub fn result(&self, id: &str) -> Option<SearchResult> {
        self.state().results.iter().find(|r| r.id == id).cloned()
    }

    // =========================================================================
    // Save
    // =========================================================================

    /// Save the result with `id` to the owned collection.
    ///
    /// Saving an id that is already in the owned-books mirror returns the
    /// mirrored record without calling the server again.
    pub async fn save_result(&self, id: &str) -> Result<OwnedBook, SaveError> {
        let (input, token) = {
            let mut state = self.state();

            let Some(result) = state.results.iter().find(|r| r.id == id) else {
                error!("Save requested for {} which is not in the result list", id);
                metrics::SAVES.with_label_values(&["not_found"]).inc();
                return Err(SaveError::NotFound { id: id.to_string() });
            };
            let input = result.to_book_input();

            if let Some(owned) = state.owned_books.iter().find(|b| b.book_id == id) {
                debug!("{} already saved, skipping mutation", id);
                metrics::SAVES.with_label_values(&["already_saved"]).inc();
                return Ok(owned.clone());
            }

            if state.pending_saves.contains(id) {
                debug!("Save for {} already in flight", id);
                metrics::SAVES.with_label_values(&["pending"]).inc();
                return Err(SaveError::AlreadyPending { id: id.to_string() });
            }

            let token = match self.options.save_policy {
                SavePolicy::Strict => {
                    let token = if self.auth.is_logged_in() {
                        self.auth.token().filter(|t| !t.is_empty())
                    } else {
                        None
                    };
                    if token.is_none() {
                        info!("Refusing save of {}: not logged in", id);
                        metrics::SAVES.with_label_values(&["unauthenticated"]).inc();
                        return Err(SaveError::Unauthenticated);
                    }
                    token
                }
                SavePolicy::Permissive => self.auth.token(),
            };

            state.pending_saves.insert(id.to_string());
            (input, token)
        };

        let response = self.store.append(token.as_ref(), &input).await;

        let book = {
            let mut state = self.state();
            state.pending_saves.remove(id);

            match response {
                Ok(book) => {
                    let mirror = std::mem::take(&mut state.owned_books);
                    state.owned_books = merge_owned(mirror, book.clone());
                    state.session_saves = merge_owned(
                        std::mem::take(&mut state.session_saves),
                        book.clone(),
                    );
                    state.saved_ids.insert(id.to_string());
                    book
                }
                Err(StoreError::Unauthorized(message)) => {
                    warn!("Server refused save of {}: {}", id, message);
                    metrics::SAVES.with_label_values(&["unauthenticated"]).inc();
                    return Err(SaveError::Unauthenticated);
                }
                Err(source) => {
                    warn!("Save of {} failed: {}", id, source);
                    metrics::SAVES.with_label_values(&["failed"]).inc();
                    return Err(SaveError::MutationFailed {
                        id: id.to_string(),
                        source,
                    });
                }
            }
        };

        info!("Saved '{}' ({})", book.title, id);
        metrics::SAVES.with_label_values(&["saved"]).inc();

        if self.options.refresh_after_save {
            if let Err(e) = self.refresh_owned_books().await {
                warn!("Owned-books refresh after save failed, keeping local mirror: {}", e);
            }
        }

        Ok(book)
    }

    /// Whether `id` is part of the collection.
    ///
    /// The owned-books mirror decides; the durable saved-id set is only
    /// consulted when nobody is logged in.
    pub fn is_saved(&self, id: &str) -> bool {
        let logged_in = self.auth.is_logged_in();
        Self::is_saved_in(&self.state(), id, logged_in)
    }

    fn is_saved_in(state: &EngineState, id: &str, logged_in: bool) -> bool {
        contains_book(&state.owned_books, id) || (!logged_in && state.saved_ids.contains(id))
    }

    pub fn is_save_pending(&self, id: &str) -> bool {
        self.state().pending_saves.contains(id)
    }

    /// Save affordance for `id`, derived per result.
    pub fn save_state(&self, id: &str) -> SaveState {
        let logged_in = self.auth.is_logged_in();
        self.derive_save_state(&self.state(), id, logged_in)
    }

    fn derive_save_state(&self, state: &EngineState, id: &str, logged_in: bool) -> SaveState {
        if Self::is_saved_in(state, id, logged_in) {
            SaveState::Saved
        } else if state.pending_saves.contains(id) {
            SaveState::Saving
        } else if self.options.save_policy == SavePolicy::Strict && !logged_in {
            SaveState::LoginRequired
        } else {
            SaveState::Available
        }
    }

    pub fn owned_books(&self) -> Vec<OwnedBook> {
        self.state().owned_books.clone()
    }

    pub fn saved_ids(&self) -> SavedIdSet {
        self.state().saved_ids.clone()
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Flip description expansion of the result at list position `index`.
    /// Returns the new expansion state.
    pub fn toggle_description(&self, index: usize) -> Result<bool, IndexError> {
        let mut state = self.state();
        let len = state.results.len();
        match state.results.get_mut(index) {
            Some(result) => {
                result.description_expanded = !result.description_expanded;
                Ok(result.description_expanded)
            }
            None => {
                error!("Description toggle for index {} with {} results", index, len);
                Err(IndexError { index, len })
            }
        }
    }

    pub fn current_page(&self) -> usize {
        self.state().current_page
    }

    /// Move to 1-based `page`. Pages past the end show nothing.
    pub fn set_page(&self, page: usize) {
        self.state().current_page = page.max(1);
    }

    pub fn page_count(&self) -> usize {
        page_count(&self.state().results, self.options.page_size)
    }

    /// Cards on the current page with their save state.
    pub fn visible_results(&self) -> Vec<ResultView> {
        let logged_in = self.auth.is_logged_in();
        let state = self.state();
        let first_index = state
            .current_page
            .saturating_sub(1)
            .saturating_mul(self.options.page_size);

        select_page(&state.results, state.current_page, self.options.page_size)
            .iter()
            .enumerate()
            .map(|(offset, result)| ResultView {
                index: first_index + offset,
                id: result.id.clone(),
                title: result.title.clone(),
                authors: result.authors.clone(),
                description: result.rendered_description().to_string(),
                image_url: result.image_url.clone(),
                description_expanded: result.description_expanded,
                save_state: self.derive_save_state(&state, &result.id, logged_in),
            })
            .collect()
    }

    /// Heading above the result cards.
    pub fn result_heading(&self) -> String {
        let count = self.state().results.len();
        if count == 0 {
            "Search for a book to add to your collection".to_string()
        } else {
            format!("Viewing {} results:", count)
        }
    }

    // =========================================================================
    // Session end
    // =========================================================================

    /// End the session and persist the saved-id set to the durable cache.
    ///
    /// Inside a Tokio runtime the write runs on the blocking pool and the
    /// returned task may be dropped without waiting. Without a runtime the
    /// write happens before this returns.
    pub fn end_session(mut self) -> PersistTask {
        self.ended = true;
        let ids = self.state().saved_ids.clone();
        persist_saved_ids(Arc::clone(&self.cache), ids)
    }
}

impl Drop for ReconciliationEngine {
    fn drop(&mut self) {
        if self.ended {
            return;
        }
        let ids = self.state().saved_ids.clone();
        persist_saved_ids(Arc::clone(&self.cache), ids);
    }
}

/// Outcome of the session-end cache write.
#[derive(Debug)]
pub enum PersistTask {
    /// Running on the blocking pool.
    Spawned(JoinHandle<Result<SavedIdSet, CacheError>>),
    /// Already written, no runtime was available.
    Done(Result<SavedIdSet, CacheError>),
}

impl PersistTask {
    /// Wait for the write and return the stored set.
    pub async fn wait(self) -> Result<SavedIdSet, CacheError> {
        match self {
            PersistTask::Spawned(handle) => handle
                .await
                .map_err(|e| CacheError::Internal(format!("persist task failed: {}", e)))?,
            PersistTask::Done(result) => result,
        }
    }
}

fn persist_saved_ids(cache: Arc<dyn LocalSaveCache>, ids: SavedIdSet) -> PersistTask {
    match Handle::try_current() {
        Ok(handle) => {
            PersistTask::Spawned(handle.spawn_blocking(move || persist_now(cache.as_ref(), &ids)))
        }
        Err(_) => PersistTask::Done(persist_now(cache.as_ref(), &ids)),
    }
}

fn persist_now(cache: &dyn LocalSaveCache, ids: &SavedIdSet) -> Result<SavedIdSet, CacheError> {
    let result = cache.merge(ids);
    match &result {
        Ok(merged) => {
            info!(
                "Persisted {} saved ids ({} in cache)",
                ids.len(),
                merged.len()
            );
            metrics::CACHE_PERSISTS.with_label_values(&["success"]).inc();
        }
        Err(e) => {
            warn!("Failed to persist saved ids: {}", e);
            metrics::CACHE_PERSISTS.with_label_values(&["failed"]).inc();
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save_cache::MemorySaveCache;
    use crate::testing::{fixtures, MockAuth, MockCatalog, MockOwnedBooksStore};

    struct Harness {
        engine: ReconciliationEngine,
        store: Arc<MockOwnedBooksStore>,
        cache: MemorySaveCache,
    }

    fn harness(auth: MockAuth, policy: SavePolicy, cache: MemorySaveCache) -> Harness {
        let store = Arc::new(MockOwnedBooksStore::new());
        let deps = EngineDeps {
            catalog: Arc::new(MockCatalog::new()),
            store: store.clone(),
            cache: Arc::new(cache.clone()),
            auth: Arc::new(auth),
        };
        let options = SessionConfig {
            save_policy: policy,
            ..SessionConfig::default()
        };
        Harness {
            engine: ReconciliationEngine::new(deps, options),
            store,
            cache,
        }
    }

    fn anonymous() -> Harness {
        harness(MockAuth::anonymous(), SavePolicy::Strict, MemorySaveCache::new())
    }

    fn apply(engine: &ReconciliationEngine, query: &str, entries: Vec<RawEntry>) {
        let ticket = engine.begin_search(query).unwrap();
        engine.complete_search(ticket, Ok(entries)).unwrap();
    }

    #[test]
    fn test_blank_query_issues_nothing() {
        let h = anonymous();
        assert!(h.engine.begin_search("   ").is_none());
        assert_eq!(h.engine.generation(), 0);
        assert!(!h.engine.is_search_pending());
    }

    #[test]
    fn test_newer_search_wins_regardless_of_arrival() {
        let h = anonymous();
        let first = h.engine.begin_search("a").unwrap();
        let second = h.engine.begin_search("b").unwrap();
        assert!(h.engine.is_search_pending());

        let applied = h
            .engine
            .complete_search(second, Ok(vec![fixtures::raw_entry("b1", "B")]))
            .unwrap();
        assert_eq!(applied, SearchOutcome::Applied { generation: 2, count: 1 });
        assert!(!h.engine.is_search_pending());

        let stale = h
            .engine
            .complete_search(first, Ok(vec![fixtures::raw_entry("a1", "A")]))
            .unwrap();
        assert_eq!(stale, SearchOutcome::Superseded { generation: 1 });
        assert_eq!(h.engine.results()[0].id, "b1");
    }

    #[test]
    fn test_stale_error_is_not_reported() {
        let h = anonymous();
        let first = h.engine.begin_search("a").unwrap();
        let _second = h.engine.begin_search("b").unwrap();

        let outcome = h
            .engine
            .complete_search(first, Err(CatalogError::RateLimitExceeded))
            .unwrap();
        assert_eq!(outcome, SearchOutcome::Superseded { generation: 1 });
        assert!(h.engine.is_search_pending());
    }

    #[test]
    fn test_failed_search_keeps_previous_results() {
        let h = anonymous();
        apply(&h.engine, "dune", fixtures::dune_entries(3));
        h.engine.set_query_input("foundation");

        let ticket = h.engine.begin_search("foundation").unwrap();
        let result = h
            .engine
            .complete_search(ticket, Err(CatalogError::Unavailable("down".to_string())));

        assert!(matches!(result, Err(SearchError::Catalog { ref query, .. }) if query == "foundation"));
        assert_eq!(h.engine.results().len(), 3);
        assert_eq!(h.engine.query_input(), "foundation");
    }

    #[test]
    fn test_applied_search_resets_page_and_input() {
        let h = anonymous();
        apply(&h.engine, "dune", fixtures::dune_entries(7));
        h.engine.set_page(2);
        h.engine.set_query_input("foundation");

        apply(&h.engine, "foundation", fixtures::dune_entries(2));
        assert_eq!(h.engine.current_page(), 1);
        assert_eq!(h.engine.query_input(), "");
    }

    #[test]
    fn test_visible_results_carry_list_index() {
        let h = anonymous();
        apply(&h.engine, "dune", fixtures::dune_entries(7));
        assert_eq!(h.engine.page_count(), 2);

        h.engine.set_page(2);
        let page = h.engine.visible_results();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].index, 5);
        assert_eq!(page[1].id, "dune-7");

        h.engine.set_page(3);
        assert!(h.engine.visible_results().is_empty());
    }

    #[test]
    fn test_toggle_description() {
        let h = anonymous();
        apply(&h.engine, "dune", fixtures::dune_entries(2));

        assert_eq!(h.engine.visible_results()[1].description, "");
        assert_eq!(h.engine.toggle_description(1), Ok(true));
        assert_eq!(
            h.engine.visible_results()[1].description,
            "Volume 2 of the Dune saga."
        );
        assert_eq!(h.engine.toggle_description(1), Ok(false));
        assert!(!h.engine.results()[0].description_expanded);

        assert_eq!(
            h.engine.toggle_description(2),
            Err(IndexError { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_result_heading() {
        let h = anonymous();
        assert_eq!(
            h.engine.result_heading(),
            "Search for a book to add to your collection"
        );
        apply(&h.engine, "dune", fixtures::dune_entries(7));
        assert_eq!(h.engine.result_heading(), "Viewing 7 results:");
    }

    #[test]
    fn test_save_state_by_policy() {
        let strict = anonymous();
        apply(&strict.engine, "dune", fixtures::dune_entries(1));
        assert_eq!(strict.engine.save_state("dune-1"), SaveState::LoginRequired);

        let permissive = harness(
            MockAuth::anonymous(),
            SavePolicy::Permissive,
            MemorySaveCache::new(),
        );
        apply(&permissive.engine, "dune", fixtures::dune_entries(1));
        assert_eq!(permissive.engine.save_state("dune-1"), SaveState::Available);
    }

    #[test]
    fn test_cached_ids_only_count_when_logged_out() {
        let cache = MemorySaveCache::with_ids(["dune-1"]);

        let anon = harness(MockAuth::anonymous(), SavePolicy::Strict, cache.clone());
        tokio_test::block_on(anon.engine.load_session());
        apply(&anon.engine, "dune", fixtures::dune_entries(2));
        assert!(anon.engine.is_saved("dune-1"));
        assert_eq!(anon.engine.save_state("dune-1"), SaveState::Saved);

        let user = harness(MockAuth::logged_in("jwt"), SavePolicy::Strict, cache);
        tokio_test::block_on(user.engine.load_session());
        apply(&user.engine, "dune", fixtures::dune_entries(2));
        assert!(!user.engine.is_saved("dune-1"));
        assert_eq!(user.engine.save_state("dune-1"), SaveState::Available);
    }

    #[tokio::test]
    async fn test_save_unknown_id_is_not_found() {
        let h = harness(
            MockAuth::logged_in("jwt"),
            SavePolicy::Strict,
            MemorySaveCache::new(),
        );
        apply(&h.engine, "dune", fixtures::dune_entries(2));

        let result = h.engine.save_result("missing").await;
        assert!(matches!(result, Err(SaveError::NotFound { ref id }) if id == "missing"));
        assert_eq!(h.store.append_count().await, 0);
    }

    #[tokio::test]
    async fn test_end_session_writes_saved_ids() {
        let h = harness(
            MockAuth::logged_in("jwt"),
            SavePolicy::Strict,
            MemorySaveCache::with_ids(["older"]),
        );
        apply(&h.engine, "dune", fixtures::dune_entries(2));
        h.engine.save_result("dune-2").await.unwrap();

        let cache = h.cache.clone();
        let persisted = h.engine.end_session().wait().await.unwrap();
        assert!(persisted.contains("older"));
        assert!(persisted.contains("dune-2"));
        assert_eq!(cache.snapshot(), persisted);
    }

    #[test]
    fn test_end_session_without_runtime_writes_inline() {
        let h = harness(
            MockAuth::logged_in("jwt"),
            SavePolicy::Strict,
            MemorySaveCache::with_ids(["older"]),
        );
        tokio_test::block_on(async {
            let ticket = h.engine.begin_search("dune").unwrap();
            h.engine
                .complete_search(ticket, Ok(fixtures::dune_entries(1)))
                .unwrap();
            h.engine.save_result("dune-1").await.unwrap();
        });

        let cache = h.cache.clone();
        let task = h.engine.end_session();
        assert!(matches!(task, PersistTask::Done(Ok(_))));

        let stored = cache.snapshot();
        assert!(stored.contains("older"));
        assert!(stored.contains("dune-1"));
    }
}
