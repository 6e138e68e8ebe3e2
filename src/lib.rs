//! # HeartGuard
//!
//! Terminal client for a heart disease risk prediction service.
//!
//! This crate provides:
//! - Intake form validation for the eleven clinical parameters
//! - An HTTP client for the remote `/predict` endpoint
//! - A bounded local history of predictions
//! - PDF report export
//! - Terminal UI
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (inputs, results, history records)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (HTTP, SQLite, PDF, log sanitizing)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::Config;
pub use domain::{PredictionInput, PredictionResult, RiskLevel, SavedResult};

/// Result type for HeartGuard operations
pub type Result<T> = std::result::Result<T, HeartGuardError>;

/// Main error type for HeartGuard
#[derive(Debug, thiserror::Error)]
pub enum HeartGuardError {
    #[error(transparent)]
    Validation(#[from] domain::ValidationError),

    #[error(transparent)]
    Prediction(#[from] ports::PredictionError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] ports::StorageError),
}
