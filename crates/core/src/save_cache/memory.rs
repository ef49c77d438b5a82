use std::sync::{Arc, RwLock};

use super::{CacheError, LocalSaveCache, SavedIdSet};

/// In-process saved-id cache.
///
/// Clones share the same set, so a test can hand one clone to an engine and
/// inspect the other after the session ends.
#[derive(Debug, Clone, Default)]
pub struct MemorySaveCache {
    ids: Arc<RwLock<SavedIdSet>>,
    fail_next: Arc<RwLock<bool>>,
}

impl MemorySaveCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given ids already stored.
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cache = Self::new();
        if let Ok(mut stored) = cache.ids.write() {
            stored.extend(ids.into_iter().map(Into::into));
        }
        cache
    }

    /// Snapshot of the stored ids.
    pub fn snapshot(&self) -> SavedIdSet {
        self.ids.read().map(|ids| ids.clone()).unwrap_or_default()
    }

    /// Make the next `load` or `save` fail.
    pub fn fail_next(&self) {
        if let Ok(mut flag) = self.fail_next.write() {
            *flag = true;
        }
    }

    fn take_failure(&self) -> Result<(), CacheError> {
        let mut flag = self
            .fail_next
            .write()
            .map_err(|_| CacheError::Internal("cache lock poisoned".to_string()))?;
        if std::mem::take(&mut *flag) {
            return Err(CacheError::Database("injected failure".to_string()));
        }
        Ok(())
    }
}

impl LocalSaveCache for MemorySaveCache {
    fn load(&self) -> Result<SavedIdSet, CacheError> {
        self.take_failure()?;
        self.ids
            .read()
            .map(|ids| ids.clone())
            .map_err(|_| CacheError::Internal("cache lock poisoned".to_string()))
    }

    fn save(&self, ids: &SavedIdSet) -> Result<(), CacheError> {
        self.take_failure()?;
        let mut stored = self
            .ids
            .write()
            .map_err(|_| CacheError::Internal("cache lock poisoned".to_string()))?;
        stored.extend(ids.iter().cloned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let cache = MemorySaveCache::new();
        let other = cache.clone();
        cache.save(&["x".to_string()].into_iter().collect()).unwrap();
        assert!(other.snapshot().contains("x"));
    }

    #[test]
    fn test_with_ids() {
        let cache = MemorySaveCache::with_ids(["a", "b"]);
        assert_eq!(cache.load().unwrap().len(), 2);
    }

    #[test]
    fn test_injected_failure_is_consumed() {
        let cache = MemorySaveCache::with_ids(["a"]);
        cache.fail_next();
        assert!(matches!(cache.load(), Err(CacheError::Database(_))));
        assert!(cache.load().is_ok());
    }
}
