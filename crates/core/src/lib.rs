pub mod auth;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod metrics;
pub mod owned_books;
pub mod save_cache;
pub mod testing;

pub use auth::{create_auth_provider, AnonymousAuth, AuthError, AuthProvider, StaticTokenAuth, Token};
pub use catalog::{CatalogError, CatalogSearchClient, GoogleBooksClient, GoogleBooksConfig, RawEntry};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    SavePolicy, SessionConfig,
};
pub use engine::{
    EngineDeps, IndexError, PersistTask, ReconciliationEngine, ResultView, SaveError, SaveState,
    SearchError, SearchOutcome, SearchResult,
};
pub use owned_books::{BookInput, GraphqlOwnedBooksStore, OwnedBook, OwnedBooksStore, StoreError};
pub use save_cache::{CacheError, LocalSaveCache, MemorySaveCache, SavedIdSet, SqliteSaveCache};
