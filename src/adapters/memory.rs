//! In-memory adapter: `KeyValueStore` backed by a `HashMap`.
//!
//! Used in tests and for sessions that should not touch the disk.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::ports::{KeyValueStore, StorageError};

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
    read_only: bool,
}

impl MemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, e.g. to simulate a full disk.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            read_only: true,
        }
    }

    /// Seed a raw value, bypassing the read-only flag.
    pub fn insert_raw(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::ReadOnly);
        }
        let mut values = self.values.lock().map_err(|_| StorageError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::ReadOnly);
        }
        let mut values = self.values.lock().map_err(|_| StorageError::LockPoisoned)?;
        values.remove(key);
        Ok(())
    }
}
