//! SQLite adapter: Implementation of `KeyValueStore`.
//!
//! Provides durable local persistence for the prediction history. Values are
//! stored whole under their key; there is no partial update.
//!
//! # Mutex Behavior
//!
//! The connection is protected by a `Mutex`. A poisoned mutex surfaces as
//! `StorageError::LockPoisoned` instead of panicking; history callers treat
//! storage failures as non-fatal.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use crate::ports::{KeyValueStore, StorageError};

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

/// SQLite-backed key-value store.
pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
}

impl SqliteKeyValueStore {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory SQLite database (for testing).
    ///
    /// # Errors
    /// Returns error if database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.lock()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.lock()?;

        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;

        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.lock()?;
        let now = chrono::Utc::now().to_rfc3339();

        conn.execute(
            r"
            INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value, now],
        )?;

        tracing::debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        tracing::debug!(key, removed, "Removed value");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let store = SqliteKeyValueStore::in_memory().expect("Should create db");

        assert!(store.get("k").expect("Should read").is_none());

        store.put("k", "first").expect("Should write");
        store.put("k", "second").expect("Should overwrite");
        assert_eq!(store.get("k").expect("Should read").as_deref(), Some("second"));

        store.remove("k").expect("Should remove");
        assert!(store.get("k").expect("Should read").is_none());

        // Removing again is a no-op
        store.remove("k").expect("Should remove absent key");
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("history.db");

        {
            let store = SqliteKeyValueStore::new(&path).expect("Should open");
            store.put("heartDiseaseResults", "[]").expect("Should write");
        }

        let reopened = SqliteKeyValueStore::new(&path).expect("Should reopen");
        assert_eq!(
            reopened.get("heartDiseaseResults").expect("Should read").as_deref(),
            Some("[]")
        );
    }
}
