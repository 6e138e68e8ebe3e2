//! Prediction service: validates intake data, calls the predictor, and
//! records results in the local history.
//!
//! Network and storage run as separate steps so the TUI can call `predict`
//! from its worker thread and `record` from the UI thread.

use std::sync::Arc;

use crate::domain::{IntakeDraft, PredictionInput, PredictionResult, SavedResult};
use crate::ports::{Predictor, ResultStore};
use crate::Result;

/// Service for submitting predictions and managing their history.
pub struct PredictionService<P, S>
where
    P: Predictor,
    S: ResultStore,
{
    predictor: Arc<P>,
    store: Arc<S>,
}

impl<P, S> Clone for PredictionService<P, S>
where
    P: Predictor,
    S: ResultStore,
{
    fn clone(&self) -> Self {
        Self {
            predictor: Arc::clone(&self.predictor),
            store: Arc::clone(&self.store),
        }
    }
}

impl<P, S> PredictionService<P, S>
where
    P: Predictor,
    S: ResultStore,
{
    /// Create a new prediction service.
    pub fn new(predictor: Arc<P>, store: Arc<S>) -> Self {
        Self { predictor, store }
    }

    /// Validate form contents without touching the network.
    ///
    /// # Errors
    /// Returns the first validation failure.
    pub fn validate(&self, draft: &IntakeDraft) -> Result<PredictionInput> {
        Ok(draft.validate()?)
    }

    /// Request a prediction for already-validated input.
    ///
    /// Input that fails range validation is rejected before the call.
    ///
    /// # Errors
    /// Returns validation or prediction errors.
    pub fn predict(&self, input: &PredictionInput) -> Result<PredictionResult> {
        input.validate()?;

        tracing::info!("Requesting prediction...");
        let result = self.predictor.predict(input)?;
        tracing::info!(
            "Prediction received: risk={}, probability={:.1}%",
            result.risk,
            result.probability_percent()
        );
        Ok(result)
    }

    /// Add a result to the history. Storage failures are logged, not raised.
    pub fn record(
        &self,
        result: &PredictionResult,
        input: &PredictionInput,
    ) -> Option<SavedResult> {
        match self.store.save(result, input) {
            Ok(saved) => Some(saved),
            Err(e) => {
                tracing::warn!("Failed to save result to history: {}", e);
                None
            }
        }
    }

    /// Full submission flow: validate, predict, then record.
    ///
    /// # Errors
    /// Returns validation or prediction errors. Storage errors never fail
    /// the submission.
    pub fn submit(&self, draft: &IntakeDraft) -> Result<PredictionResult> {
        let input = self.validate(draft)?;
        let result = self.predict(&input)?;
        self.record(&result, &input);
        Ok(result)
    }

    /// Saved results, newest first.
    #[must_use]
    pub fn history(&self) -> Vec<SavedResult> {
        self.store.list()
    }

    /// Remove all saved results.
    ///
    /// # Errors
    /// Returns error if the store cannot be cleared.
    pub fn clear_history(&self) -> Result<()> {
        self.store.clear()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryKeyValueStore;
    use crate::application::LocalResultStore;
    use crate::domain::{sample_input, sample_result, ValidationError};
    use crate::ports::PredictionError;
    use crate::HeartGuardError;
    use std::result::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockPredictor {
        calls: AtomicUsize,
        response: Result<PredictionResult, PredictionError>,
    }

    impl MockPredictor {
        fn returning(response: Result<PredictionResult, PredictionError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                response,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Predictor for MockPredictor {
        fn predict(&self, _input: &PredictionInput) -> Result<PredictionResult, PredictionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    type MemoryStore = LocalResultStore<MemoryKeyValueStore>;

    fn service(
        predictor: Arc<MockPredictor>,
    ) -> PredictionService<MockPredictor, MemoryStore> {
        let store = Arc::new(LocalResultStore::new(MemoryKeyValueStore::new()));
        PredictionService::new(predictor, store)
    }

    fn complete_draft() -> IntakeDraft {
        IntakeDraft::from_input(&sample_input())
    }

    #[test]
    fn test_submit_records_result() {
        let predictor = MockPredictor::returning(Ok(sample_result()));
        let service = service(Arc::clone(&predictor));

        let result = service.submit(&complete_draft()).expect("Should predict");
        assert_eq!(result, sample_result());
        assert_eq!(predictor.calls(), 1);

        let history = service.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].prediction, sample_result());
        assert_eq!(history[0].input, sample_input());
    }

    #[test]
    fn test_missing_age_makes_no_call() {
        let predictor = MockPredictor::returning(Ok(sample_result()));
        let service = service(Arc::clone(&predictor));
        let draft = IntakeDraft {
            age: String::new(),
            ..complete_draft()
        };

        let err = service.submit(&draft).expect_err("Should be blocked");
        assert!(matches!(
            err,
            HeartGuardError::Validation(ValidationError::MissingFields(_))
        ));
        assert_eq!(
            err.to_string(),
            "Please fill in all required fields before submitting."
        );
        assert_eq!(predictor.calls(), 0);
        assert!(service.history().is_empty());
    }

    #[test]
    fn test_out_of_range_cholesterol_makes_no_call() {
        let predictor = MockPredictor::returning(Ok(sample_result()));
        let service = service(Arc::clone(&predictor));
        let draft = IntakeDraft {
            cholesterol: "1500".to_string(),
            ..complete_draft()
        };

        let err = service.submit(&draft).expect_err("Should be blocked");
        assert!(matches!(
            err,
            HeartGuardError::Validation(ValidationError::Cholesterol)
        ));
        assert_eq!(predictor.calls(), 0);

        let input = PredictionInput {
            cholesterol: 1500.0,
            ..sample_input()
        };
        assert!(service.predict(&input).is_err());
        assert_eq!(predictor.calls(), 0);
    }

    #[test]
    fn test_service_error_is_surfaced_and_not_recorded() {
        let predictor = MockPredictor::returning(Err(PredictionError::Service(
            "model offline".to_string(),
        )));
        let service = service(Arc::clone(&predictor));

        let err = service.submit(&complete_draft()).expect_err("Should fail");
        assert_eq!(err.to_string(), "model offline");
        assert!(service.history().is_empty());
    }

    #[test]
    fn test_storage_failure_does_not_fail_submission() {
        let predictor = MockPredictor::returning(Ok(sample_result()));
        let store = Arc::new(LocalResultStore::new(MemoryKeyValueStore::read_only()));
        let service = PredictionService::new(Arc::clone(&predictor), store);

        let result = service.submit(&complete_draft()).expect("Should still succeed");
        assert_eq!(result, sample_result());
        assert!(service.record(&result, &sample_input()).is_none());
    }

    #[test]
    fn test_clear_history() {
        let predictor = MockPredictor::returning(Ok(sample_result()));
        let service = service(predictor);

        service.submit(&complete_draft()).expect("Should predict");
        service.submit(&complete_draft()).expect("Should predict");
        assert_eq!(service.history().len(), 2);

        service.clear_history().expect("Should clear");
        assert!(service.history().is_empty());
    }
}
