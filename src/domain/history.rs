//! Saved prediction history records.

use serde::{Deserialize, Serialize};

use super::{PredictionInput, PredictionResult};

/// Maximum number of records kept in the local history.
pub const HISTORY_CAPACITY: usize = 10;

/// One historical record pairing an input with its prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedResult {
    /// Unique identifier
    pub id: String,

    /// When the record was saved
    pub timestamp: chrono::DateTime<chrono::Utc>,

    pub prediction: PredictionResult,

    #[serde(rename = "formData")]
    pub input: PredictionInput,
}

impl SavedResult {
    /// Wrap a prediction and its input with a fresh identifier and timestamp.
    #[must_use]
    pub fn new(prediction: PredictionResult, input: PredictionInput) -> Self {
        Self {
            id: uuid_v4(),
            timestamp: chrono::Utc::now(),
            prediction,
            input,
        }
    }
}

/// Generate a random UUID v4 using a CSPRNG seeded from OS entropy.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let mut bytes: [u8; 16] = rng.gen();
    bytes[6] = (bytes[6] & 0x0f) | 0x40; // version 4
    bytes[8] = (bytes[8] & 0x3f) | 0x80; // RFC 4122 variant

    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::input::sample_input;
    use crate::domain::prediction::sample_result;

    #[test]
    fn test_saved_result_ids_are_unique() {
        let a = SavedResult::new(sample_result(), sample_input());
        let b = SavedResult::new(sample_result(), sample_input());

        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 36);
        assert_eq!(&a.id[14..15], "4");
        assert!(matches!(&a.id[19..20], "8" | "9" | "a" | "b"));
        assert_eq!(a.id.matches('-').count(), 4);
    }

    #[test]
    fn test_serialized_field_names() {
        let saved = SavedResult::new(sample_result(), sample_input());
        let json = serde_json::to_value(&saved).expect("Should serialize");

        assert!(json.get("formData").is_some());
        assert_eq!(json["prediction"]["risk"], "low");
        assert_eq!(json["formData"]["restECG"], "Normal");
    }
}
