//! Predictor port: Trait for the remote risk prediction service.

use crate::domain::{PredictionInput, PredictionResult};

/// Fallback message when the service gives no detail.
pub const DEFAULT_PREDICTION_ERROR: &str = "Failed to get prediction";

/// Errors that can occur while requesting a prediction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    /// The service answered with an error; the message is its `detail`.
    #[error("{0}")]
    Service(String),

    /// The request never completed (connection refused, DNS, TLS...).
    #[error("{0}")]
    Network(String),

    #[error("Invalid response from prediction service: {0}")]
    InvalidResponse(String),
}

/// Trait for obtaining a risk prediction.
pub trait Predictor: Send + Sync {
    /// Submit an input and wait for the service's answer.
    ///
    /// # Errors
    /// Returns [`PredictionError`] on transport, service, or decode failure.
    fn predict(&self, input: &PredictionInput) -> Result<PredictionResult, PredictionError>;
}
