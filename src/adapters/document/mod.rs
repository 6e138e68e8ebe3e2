//! Simulated document analysis.
//!
//! Accepts JPG/PNG/PDF files up to 10 MiB but performs no real extraction:
//! `analyze` fabricates a plausible set of health parameters. It exists so
//! the upload flow can be exercised end to end.

use std::path::Path;
use std::sync::Mutex;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::domain::{
    ChestPainType, DocumentKind, ExerciseAngina, FastingBloodSugar, PredictionInput, RestingEcg,
    Sex, StSlope, UploadedDocument, MAX_DOCUMENT_BYTES,
};
use crate::ports::{AnalysisError, DocumentAnalyzer};

/// Document analyzer that returns randomized values.
pub struct SimulatedDocumentAnalyzer {
    rng: Mutex<ChaCha20Rng>,
}

impl Default for SimulatedDocumentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedDocumentAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::from_entropy()),
        }
    }

    /// Deterministic analyzer for tests.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    fn fabricate(rng: &mut ChaCha20Rng) -> PredictionInput {
        let oldpeak_tenths: u32 = rng.gen_range(0..=30);

        PredictionInput {
            age: rng.gen_range(30..80),
            sex: if rng.gen_bool(0.5) { Sex::Male } else { Sex::Female },
            chest_pain_type: ChestPainType::AtypicalAngina,
            resting_bp: f64::from(rng.gen_range(120u32..160)),
            cholesterol: f64::from(rng.gen_range(200u32..300)),
            fasting_bs: if rng.gen_bool(0.3) {
                FastingBloodSugar::Elevated
            } else {
                FastingBloodSugar::Normal
            },
            rest_ecg: RestingEcg::Normal,
            max_hr: f64::from(rng.gen_range(140u32..200)),
            exercise_angina: if rng.gen_bool(0.4) {
                ExerciseAngina::Yes
            } else {
                ExerciseAngina::No
            },
            oldpeak: f64::from(oldpeak_tenths) / 10.0,
            st_slope: StSlope::Up,
        }
    }
}

impl DocumentAnalyzer for SimulatedDocumentAnalyzer {
    fn accept(&self, path: &Path) -> Result<UploadedDocument, AnalysisError> {
        let name = path.display().to_string();

        let kind = DocumentKind::from_path(path)
            .ok_or_else(|| AnalysisError::UnsupportedType(name.clone()))?;

        let metadata = std::fs::metadata(path).map_err(|e| AnalysisError::Unreadable {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        if !metadata.is_file() {
            return Err(AnalysisError::Unreadable {
                name,
                reason: "not a regular file".to_string(),
            });
        }
        if metadata.len() > MAX_DOCUMENT_BYTES {
            return Err(AnalysisError::TooLarge {
                name,
                size_bytes: metadata.len(),
            });
        }

        Ok(UploadedDocument {
            path: path.to_path_buf(),
            kind,
            size_bytes: metadata.len(),
        })
    }

    fn analyze(&self, documents: &[UploadedDocument]) -> Result<PredictionInput, AnalysisError> {
        if documents.is_empty() {
            return Err(AnalysisError::NoDocuments);
        }

        tracing::info!(
            "Simulating extraction from {} document(s); values are randomized",
            documents.len()
        );

        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(Self::fabricate(&mut rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &Path, name: &str, len: usize) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, vec![0u8; len]).expect("Should write file");
        path
    }

    #[test]
    fn test_accepts_supported_files() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let analyzer = SimulatedDocumentAnalyzer::with_seed(1);

        let doc = analyzer
            .accept(&write_file(dir.path(), "ecg.png", 128))
            .expect("Should accept");
        assert_eq!(doc.kind, DocumentKind::Png);
        assert_eq!(doc.size_bytes, 128);
        assert_eq!(doc.name(), "ecg.png");
    }

    #[test]
    fn test_rejects_unsupported_and_missing() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let analyzer = SimulatedDocumentAnalyzer::with_seed(1);

        let err = analyzer
            .accept(&write_file(dir.path(), "notes.txt", 10))
            .expect_err("Should reject");
        assert!(matches!(err, AnalysisError::UnsupportedType(_)));

        let err = analyzer
            .accept(&dir.path().join("missing.pdf"))
            .expect_err("Should reject");
        assert!(matches!(err, AnalysisError::Unreadable { .. }));
    }

    #[test]
    fn test_rejects_oversized_files() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let analyzer = SimulatedDocumentAnalyzer::with_seed(1);
        let path = write_file(dir.path(), "big.pdf", (MAX_DOCUMENT_BYTES + 1) as usize);

        let err = analyzer.accept(&path).expect_err("Should reject");
        assert!(matches!(err, AnalysisError::TooLarge { .. }));
    }

    #[test]
    fn test_analyze_requires_documents() {
        let analyzer = SimulatedDocumentAnalyzer::with_seed(1);
        assert_eq!(analyzer.analyze(&[]), Err(AnalysisError::NoDocuments));
    }

    #[test]
    fn test_fabricated_values_are_valid() {
        let analyzer = SimulatedDocumentAnalyzer::with_seed(42);
        let doc = UploadedDocument {
            path: "scan.pdf".into(),
            kind: DocumentKind::Pdf,
            size_bytes: 1,
        };

        for _ in 0..200 {
            let input = analyzer.analyze(std::slice::from_ref(&doc)).expect("Should fabricate");
            input.validate().expect("Fabricated input should be in range");
            assert!((30..80).contains(&input.age));
            assert!((200.0..300.0).contains(&input.cholesterol));
            assert_eq!(input.chest_pain_type, ChestPainType::AtypicalAngina);
            assert_eq!(input.st_slope, StSlope::Up);
        }
    }
}
