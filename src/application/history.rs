//! Bounded prediction history over any `KeyValueStore`.
//!
//! The whole list lives under one key and is rewritten on every change.
//! Stored as `{"version": 1, "results": [...]}`; a bare JSON array is read
//! as the unversioned layout. Anything else reads as empty history.

use serde::{Deserialize, Serialize};

use crate::domain::{PredictionInput, PredictionResult, SavedResult, HISTORY_CAPACITY};
use crate::ports::{KeyValueStore, ResultStore, StorageError};

/// Key under which the history is persisted.
pub const HISTORY_KEY: &str = "heartDiseaseResults";

const HISTORY_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    results: &'a [SavedResult],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredHistory {
    Versioned { version: u32, results: Vec<SavedResult> },
    Legacy(Vec<SavedResult>),
}

/// Serialize a history list in the current format.
///
/// # Errors
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_history(results: &[SavedResult]) -> Result<String, StorageError> {
    serde_json::to_string(&EnvelopeRef {
        version: HISTORY_FORMAT_VERSION,
        results,
    })
    .map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Decode a persisted history list. Never fails: unreadable data is empty.
#[must_use]
pub fn decode_history(raw: &str) -> Vec<SavedResult> {
    match serde_json::from_str::<StoredHistory>(raw) {
        Ok(StoredHistory::Versioned { version, results }) if version == HISTORY_FORMAT_VERSION => {
            results
        }
        Ok(StoredHistory::Versioned { version, .. }) => {
            tracing::warn!("Ignoring history in unknown format version {}", version);
            Vec::new()
        }
        Ok(StoredHistory::Legacy(results)) => results,
        Err(e) => {
            tracing::warn!("Discarding unreadable history: {}", e);
            Vec::new()
        }
    }
}

/// History store keeping the most recent [`HISTORY_CAPACITY`] predictions.
pub struct LocalResultStore<K: KeyValueStore> {
    backend: K,
}

impl<K: KeyValueStore> LocalResultStore<K> {
    pub fn new(backend: K) -> Self {
        Self { backend }
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &K {
        &self.backend
    }
}

impl<K: KeyValueStore> ResultStore for LocalResultStore<K> {
    fn save(
        &self,
        prediction: &PredictionResult,
        input: &PredictionInput,
    ) -> Result<SavedResult, StorageError> {
        let saved = SavedResult::new(prediction.clone(), input.clone());

        // Read errors propagate; only undecodable data counts as empty.
        let previous = self
            .backend
            .get(HISTORY_KEY)?
            .map(|raw| decode_history(&raw))
            .unwrap_or_default();

        let mut results = Vec::with_capacity(HISTORY_CAPACITY);
        results.push(saved.clone());
        results.extend(previous.into_iter().take(HISTORY_CAPACITY - 1));

        self.backend.put(HISTORY_KEY, &encode_history(&results)?)?;
        tracing::debug!("Saved result {} ({} in history)", saved.id, results.len());
        Ok(saved)
    }

    fn list(&self) -> Vec<SavedResult> {
        match self.backend.get(HISTORY_KEY) {
            Ok(Some(raw)) => {
                let mut results = decode_history(&raw);
                results.truncate(HISTORY_CAPACITY);
                results
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read history: {}", e);
                Vec::new()
            }
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.backend.remove(HISTORY_KEY)?;
        tracing::info!("Cleared prediction history");
        Ok(())
    }
}
