//! Durable cache of saved catalog ids.
//!
//! The cache survives restarts and works without login. It only gates the
//! "already saved" affordance, so stale ids are tolerated: entries are added,
//! never removed.

mod memory;
mod sqlite;

pub use memory::MemorySaveCache;
pub use sqlite::SqliteSaveCache;

use std::collections::BTreeSet;

use thiserror::Error;

/// Set of catalog ids known to have been saved.
pub type SavedIdSet = BTreeSet<String>;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Storage for the saved-id set.
pub trait LocalSaveCache: Send + Sync {
    /// Read every stored id.
    fn load(&self) -> Result<SavedIdSet, CacheError>;

    /// Store the given ids. Ids already present are kept; nothing is removed.
    fn save(&self, ids: &SavedIdSet) -> Result<(), CacheError>;

    /// Union `ids` into the stored set and return the result.
    fn merge(&self, ids: &SavedIdSet) -> Result<SavedIdSet, CacheError> {
        let mut merged = self.load()?;
        merged.extend(ids.iter().cloned());
        self.save(&merged)?;
        Ok(merged)
    }
}
