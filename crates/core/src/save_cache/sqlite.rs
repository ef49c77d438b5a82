//! SQLite-backed saved-id cache.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection};

use super::{CacheError, LocalSaveCache, SavedIdSet};

/// SQLite-backed saved-id cache.
pub struct SqliteSaveCache {
    conn: Mutex<Connection>,
}

impl SqliteSaveCache {
    /// Open the cache, creating the database file and table if needed.
    pub fn new(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path).map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self, CacheError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CacheError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS saved_book_ids (
                book_id TEXT PRIMARY KEY,
                saved_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| CacheError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Internal("cache connection lock poisoned".to_string()))
    }

    /// Number of stored ids.
    pub fn count(&self) -> Result<usize, CacheError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM saved_book_ids", [], |row| row.get(0))
            .map_err(|e| CacheError::Database(e.to_string()))?;
        Ok(count as usize)
    }
}

impl LocalSaveCache for SqliteSaveCache {
    fn load(&self) -> Result<SavedIdSet, CacheError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT book_id FROM saved_book_ids")
            .map_err(|e| CacheError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| CacheError::Database(e.to_string()))?;

        let mut ids = SavedIdSet::new();
        for row in rows {
            ids.insert(row.map_err(|e| CacheError::Database(e.to_string()))?);
        }
        Ok(ids)
    }

    fn save(&self, ids: &SavedIdSet) -> Result<(), CacheError> {
        let mut conn = self.lock()?;
        let now_str = Utc::now().to_rfc3339();

        let tx = conn
            .transaction()
            .map_err(|e| CacheError::Database(e.to_string()))?;
        for id in ids {
            tx.execute(
                "INSERT OR IGNORE INTO saved_book_ids (book_id, saved_at) VALUES (?, ?)",
                params![id, &now_str],
            )
            .map_err(|e| CacheError::Database(e.to_string()))?;
        }
        tx.commit()
            .map_err(|e| CacheError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ids(values: &[&str]) -> SavedIdSet {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_empty_cache_loads_empty_set() {
        let cache = SqliteSaveCache::in_memory().unwrap();
        assert!(cache.load().unwrap().is_empty());
        assert_eq!(cache.count().unwrap(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let cache = SqliteSaveCache::in_memory().unwrap();
        cache.save(&ids(&["a", "b"])).unwrap();
        assert_eq!(cache.load().unwrap(), ids(&["a", "b"]));
    }

    #[test]
    fn test_save_never_removes() {
        let cache = SqliteSaveCache::in_memory().unwrap();
        cache.save(&ids(&["a", "b"])).unwrap();
        cache.save(&ids(&["c"])).unwrap();
        assert_eq!(cache.load().unwrap(), ids(&["a", "b", "c"]));
    }

    #[test]
    fn test_merge_returns_union() {
        let cache = SqliteSaveCache::in_memory().unwrap();
        cache.save(&ids(&["a"])).unwrap();
        let merged = cache.merge(&ids(&["a", "z"])).unwrap();
        assert_eq!(merged, ids(&["a", "z"]));
        assert_eq!(cache.count().unwrap(), 2);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved.db");

        {
            let cache = SqliteSaveCache::new(&path).unwrap();
            cache.save(&ids(&["kept"])).unwrap();
        }

        let reopened = SqliteSaveCache::new(&path).unwrap();
        assert_eq!(reopened.load().unwrap(), ids(&["kept"]));
    }
}
