//! Session reconciliation between catalog results, the owned-books mirror
//! and the durable saved-id cache.

mod error;
mod merge;
mod normalize;
mod pager;
mod reconcile;
mod types;

pub use error::{IndexError, SaveError, SearchError};
pub use merge::{contains_book, merge_owned};
pub use normalize::{normalize_entries, normalize_entry, NO_AUTHOR_PLACEHOLDER};
pub use pager::{page_count, select_page, DEFAULT_PAGE_SIZE};
pub use reconcile::{EngineDeps, PersistTask, ReconciliationEngine};
pub use types::{ResultView, SaveState, SearchOutcome, SearchResult, SearchTicket};
