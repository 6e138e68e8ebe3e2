//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod history;
mod prediction;
mod report;

pub use history::{decode_history, encode_history, LocalResultStore, HISTORY_KEY};
pub use prediction::PredictionService;
pub use report::{
    build_report, format_probability, parameter_lines, risk_color, summarize, ReportService,
    ResultSummary, Tone, DISCLAIMER, REPORT_FILE_NAME, REPORT_TITLE,
};
