//! Storage ports: persisted key-value slot and the bounded result history.
//!
//! `KeyValueStore` abstracts the raw backend (SQLite, memory).
//! `ResultStore` is what the application talks to.

use crate::domain::{PredictionInput, PredictionResult, SavedResult};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Storage is read-only")]
    ReadOnly,
}

/// A durable store of string values under string keys.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    /// Returns error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    /// Returns error if the backend cannot be written.
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    /// Returns error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Bounded, most-recent-first history of predictions.
///
/// Implementations keep at most [`crate::domain::HISTORY_CAPACITY`] records.
pub trait ResultStore: Send + Sync {
    /// Record a prediction, evicting the oldest entry when full.
    ///
    /// # Errors
    /// Returns error if the history cannot be read or persisted. Callers treat
    /// this as non-fatal.
    fn save(
        &self,
        prediction: &PredictionResult,
        input: &PredictionInput,
    ) -> Result<SavedResult, StorageError>;

    /// All records, newest first. Unreadable history yields an empty list.
    fn list(&self) -> Vec<SavedResult>;

    /// Remove all records.
    ///
    /// # Errors
    /// Returns error if the backend cannot be written.
    fn clear(&self) -> Result<(), StorageError>;
}
