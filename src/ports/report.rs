//! Report port: Trait for writing a laid-out report to a file.

use std::path::Path;

use crate::domain::ReportDocument;

/// Errors that can occur while exporting a report.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to build report: {0}")]
    Render(String),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Sink that turns a [`ReportDocument`] into a file.
pub trait ReportWriter: Send + Sync {
    /// File extension produced by this writer (without the dot).
    fn extension(&self) -> &'static str;

    /// Write `document` to `path`, replacing any existing file.
    ///
    /// # Errors
    /// Returns [`ExportError`] if rendering or writing fails.
    fn write(&self, document: &ReportDocument, path: &Path) -> Result<(), ExportError>;
}
