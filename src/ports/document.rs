//! Document analysis port: Trait for extracting health parameters from files.

use std::path::Path;

use crate::domain::{PredictionInput, UploadedDocument};

/// Errors that can occur during document analysis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Unsupported document type: {0}")]
    UnsupportedType(String),

    #[error("Document too large: {name} ({size_bytes} bytes)")]
    TooLarge { name: String, size_bytes: u64 },

    #[error("Cannot read document {name}: {reason}")]
    Unreadable { name: String, reason: String },

    #[error("No documents to analyze")]
    NoDocuments,
}

/// Trait for turning medical documents into a prediction input.
pub trait DocumentAnalyzer: Send + Sync {
    /// Check whether a file can be analyzed.
    ///
    /// # Errors
    /// Returns [`AnalysisError`] if the file is missing, too large, or of an
    /// unsupported type.
    fn accept(&self, path: &Path) -> Result<UploadedDocument, AnalysisError>;

    /// Extract health parameters from the accepted documents.
    ///
    /// # Errors
    /// Returns [`AnalysisError::NoDocuments`] when `documents` is empty.
    fn analyze(&self, documents: &[UploadedDocument]) -> Result<PredictionInput, AnalysisError>;
}
