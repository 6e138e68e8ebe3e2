//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Dashboard with saved prediction history
//! - Health parameter intake form
//! - Medical document upload
//! - Prediction progress and results

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
pub use worker::{FailedStage, PredictionWorker, WorkerHandle, WorkerProgress};
