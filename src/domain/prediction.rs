//! Prediction result types.
//!
//! Represents the response of the remote heart disease prediction service.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Binary risk classification returned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Low risk of heart disease
    Low,
    /// High risk, consultation recommended
    High,
}

impl RiskLevel {
    /// Interpret the wire value. Anything other than `high` is treated as low.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("high") {
            Self::High
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk of heart disease",
            Self::High => "High risk of heart disease",
        }
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Outcome of one prediction, as issued by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub risk: RiskLevel,

    /// Probability of heart disease, in percent (0 to 100)
    pub probability: f64,

    #[serde(default)]
    pub message: String,

    /// Issuance time exactly as the service reported it
    #[serde(default)]
    pub timestamp: String,

    /// Input echoed back by the service, kept opaque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_data: Option<serde_json::Value>,
}

impl PredictionResult {
    /// Probability clamped to the displayable 0-100 range.
    #[must_use]
    pub fn probability_percent(&self) -> f64 {
        if self.probability.is_finite() {
            self.probability.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    /// Parse the issuance timestamp.
    ///
    /// Accepts RFC 3339 and the offset-less ISO form some servers emit
    /// (interpreted as UTC).
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
pub(crate) fn sample_result() -> PredictionResult {
    PredictionResult {
        risk: RiskLevel::Low,
        probability: 23.4,
        message: "Low risk".to_string(),
        timestamp: "2025-01-01T00:00:00Z".to_string(),
        input_data: None,
    }
}
