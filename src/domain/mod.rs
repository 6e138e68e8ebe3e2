//! Domain layer: Core types and validation.
//!
//! Pure Rust types with no I/O. Wire-facing types are serializable and
//! follow the prediction service's field names.

pub mod document;
mod history;
pub mod input;
mod prediction;
pub mod report;

pub use document::{DocumentKind, UploadedDocument, MAX_DOCUMENT_BYTES};
pub use history::{SavedResult, HISTORY_CAPACITY};
pub use input::{
    ChestPainType, ExerciseAngina, FastingBloodSugar, IntakeDraft, PredictionInput, RestingEcg,
    Sex, StSlope, ValidationError,
};
pub use prediction::{PredictionResult, RiskLevel};
pub use report::{ReportDocument, ReportLine, Rgb};

#[cfg(test)]
pub(crate) use input::sample_input;
#[cfg(test)]
pub(crate) use prediction::sample_result;
