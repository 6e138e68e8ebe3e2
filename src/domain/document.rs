//! Medical documents selected for (simulated) data extraction.

use std::path::{Path, PathBuf};

/// Largest document accepted for analysis (10 MiB).
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Supported document formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Jpeg,
    Png,
    Pdf,
}

impl DocumentKind {
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Jpeg => "JPG",
            Self::Png => "PNG",
            Self::Pdf => "PDF",
        }
    }
}

/// A document accepted for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    pub path: PathBuf,
    pub kind: DocumentKind,
    pub size_bytes: u64,
}

impl UploadedDocument {
    /// File name for display.
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Size in megabytes, for display.
    #[must_use]
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_path(Path::new("scan.JPG")), Some(DocumentKind::Jpeg));
        assert_eq!(DocumentKind::from_path(Path::new("ecg.jpeg")), Some(DocumentKind::Jpeg));
        assert_eq!(DocumentKind::from_path(Path::new("labs.png")), Some(DocumentKind::Png));
        assert_eq!(DocumentKind::from_path(Path::new("report.pdf")), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_path(Path::new("notes.docx")), None);
        assert_eq!(DocumentKind::from_path(Path::new("README")), None);
    }
}
