//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (prediction service,
//! local storage, report files, document analysis).

mod document;
mod predictor;
mod report;
mod storage;

pub use document::{AnalysisError, DocumentAnalyzer};
pub use predictor::{PredictionError, Predictor, DEFAULT_PREDICTION_ERROR};
pub use report::{ExportError, ReportWriter};
pub use storage::{KeyValueStore, ResultStore, StorageError};
