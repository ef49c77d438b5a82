use thiserror::Error;

use crate::catalog::CatalogError;
use crate::owned_books::StoreError;

/// A catalog search that could not replace the result list.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Catalog search for '{query}' failed: {source}")]
    Catalog {
        query: String,
        #[source]
        source: CatalogError,
    },
}

/// Why a result could not be saved to the collection.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The id is not in the current result list.
    #[error("No search result with id {id}")]
    NotFound { id: String },

    /// No usable login for a save.
    #[error("Please log in to save books")]
    Unauthenticated,

    /// A save for this id is already in flight.
    #[error("Save already in progress for {id}")]
    AlreadyPending { id: String },

    /// The server did not accept the save. Retrying is allowed.
    #[error("Saving {id} failed: {source}")]
    MutationFailed {
        id: String,
        #[source]
        source: StoreError,
    },
}

/// Position outside the current result list.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Result index {index} out of range (list has {len})")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}
