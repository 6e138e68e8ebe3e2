//! Health parameters submitted to the prediction service.
//!
//! Eleven features from the UCI heart failure dataset. Categorical fields
//! serialize to the short codes the service expects (`M`, `ATA`, `Up`, ...).

use serde::{Deserialize, Serialize};

/// Biological sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Type of chest pain experienced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestPainType {
    #[serde(rename = "TA")]
    TypicalAngina,
    #[serde(rename = "ATA")]
    AtypicalAngina,
    #[serde(rename = "NAP")]
    NonAnginalPain,
    #[serde(rename = "ASY")]
    Asymptomatic,
}

impl ChestPainType {
    pub const ALL: [Self; 4] = [
        Self::TypicalAngina,
        Self::AtypicalAngina,
        Self::NonAnginalPain,
        Self::Asymptomatic,
    ];

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::TypicalAngina => "TA",
            Self::AtypicalAngina => "ATA",
            Self::NonAnginalPain => "NAP",
            Self::Asymptomatic => "ASY",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::TypicalAngina => "Typical Angina",
            Self::AtypicalAngina => "Atypical Angina",
            Self::NonAnginalPain => "Non-Anginal Pain",
            Self::Asymptomatic => "Asymptomatic",
        }
    }
}

/// Fasting blood sugar above 120 mg/dl.
///
/// Sent over the wire as the integer flag `1` (above) or `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FastingBloodSugar {
    Elevated,
    Normal,
}

impl FastingBloodSugar {
    pub const ALL: [Self; 2] = [Self::Elevated, Self::Normal];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Elevated => "Yes (greater than 120 mg/dl)",
            Self::Normal => "No (120 mg/dl or less)",
        }
    }

    #[must_use]
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Elevated)
    }
}

impl From<FastingBloodSugar> for u8 {
    fn from(value: FastingBloodSugar) -> Self {
        match value {
            FastingBloodSugar::Elevated => 1,
            FastingBloodSugar::Normal => 0,
        }
    }
}

impl TryFrom<u8> for FastingBloodSugar {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Elevated),
            0 => Ok(Self::Normal),
            other => Err(format!("fastingBS must be 0 or 1, got {other}")),
        }
    }
}

/// Resting electrocardiogram result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestingEcg {
    Normal,
    #[serde(rename = "ST")]
    StAbnormality,
    #[serde(rename = "LVH")]
    LeftVentricularHypertrophy,
}

impl RestingEcg {
    pub const ALL: [Self; 3] = [
        Self::Normal,
        Self::StAbnormality,
        Self::LeftVentricularHypertrophy,
    ];

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::StAbnormality => "ST",
            Self::LeftVentricularHypertrophy => "LVH",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::StAbnormality => "ST-T wave abnormality",
            Self::LeftVentricularHypertrophy => "Left ventricular hypertrophy",
        }
    }
}

/// Exercise induced angina.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseAngina {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

impl ExerciseAngina {
    pub const ALL: [Self; 2] = [Self::Yes, Self::No];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

/// Slope of the peak exercise ST segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StSlope {
    Up,
    Flat,
    Down,
}

impl StSlope {
    pub const ALL: [Self; 3] = [Self::Up, Self::Flat, Self::Down];

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Flat => "Flat",
            Self::Down => "Down",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Up => "Upsloping",
            Self::Flat => "Flat",
            Self::Down => "Downsloping",
        }
    }
}

/// Accepted ranges, shared by validation and the intake form sliders.
pub const AGE_RANGE: (u32, u32) = (1, 120);
pub const RESTING_BP_RANGE: (f64, f64) = (80.0, 200.0);
pub const CHOLESTEROL_RANGE: (f64, f64) = (0.0, 1000.0);
pub const MAX_HR_RANGE: (f64, f64) = (60.0, 220.0);
pub const OLDPEAK_RANGE: (f64, f64) = (0.0, 10.0);

/// Validated input for one prediction request.
///
/// Field names on the wire follow the service contract; note `restECG`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Age in whole years
    pub age: u32,

    pub sex: Sex,

    #[serde(rename = "chestPainType")]
    pub chest_pain_type: ChestPainType,

    /// Resting systolic blood pressure in mmHg
    #[serde(rename = "restingBP")]
    pub resting_bp: f64,

    /// Serum cholesterol in mg/dl
    pub cholesterol: f64,

    #[serde(rename = "fastingBS")]
    pub fasting_bs: FastingBloodSugar,

    #[serde(rename = "restECG", alias = "restingECG")]
    pub rest_ecg: RestingEcg,

    /// Maximum heart rate achieved, in bpm
    #[serde(rename = "maxHR")]
    pub max_hr: f64,

    #[serde(rename = "exerciseAngina")]
    pub exercise_angina: ExerciseAngina,

    /// ST depression induced by exercise
    pub oldpeak: f64,

    #[serde(rename = "stSlope")]
    pub st_slope: StSlope,
}

impl PredictionInput {
    /// Check every numeric field against its accepted range.
    ///
    /// # Errors
    /// Returns the first range violation, in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(AGE_RANGE.0..=AGE_RANGE.1).contains(&self.age) {
            return Err(ValidationError::Age);
        }
        if !in_range(self.cholesterol, CHOLESTEROL_RANGE) {
            return Err(ValidationError::Cholesterol);
        }
        if !in_range(self.oldpeak, OLDPEAK_RANGE) {
            return Err(ValidationError::Oldpeak);
        }
        if !in_range(self.resting_bp, RESTING_BP_RANGE) {
            return Err(ValidationError::RestingBp);
        }
        if !in_range(self.max_hr, MAX_HR_RANGE) {
            return Err(ValidationError::MaxHr);
        }
        Ok(())
    }
}

fn in_range(value: f64, (min, max): (f64, f64)) -> bool {
    (min..=max).contains(&value)
}

/// Reasons a submission is blocked before reaching the network.
///
/// Display strings are shown verbatim on the intake form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields before submitting.")]
    MissingFields(Vec<&'static str>),

    #[error("Please enter a valid age between 1 and 120 years.")]
    Age,

    #[error("Please enter a valid cholesterol level between 0 and 1000 mg/dl.")]
    Cholesterol,

    #[error("Please enter a valid oldpeak value between 0 and 10.")]
    Oldpeak,

    #[error("Please enter a valid resting blood pressure between 80 and 200 mmHg.")]
    RestingBp,

    #[error("Please enter a valid maximum heart rate between 60 and 220 bpm.")]
    MaxHr,
}

/// Unvalidated intake form contents.
///
/// Numeric fields typed by the user are kept as text; the two slider fields
/// always hold a value.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeDraft {
    pub age: String,
    pub sex: Option<Sex>,
    pub chest_pain_type: Option<ChestPainType>,
    pub resting_bp: f64,
    pub cholesterol: String,
    pub fasting_bs: Option<FastingBloodSugar>,
    pub rest_ecg: Option<RestingEcg>,
    pub max_hr: f64,
    pub exercise_angina: Option<ExerciseAngina>,
    pub oldpeak: String,
    pub st_slope: Option<StSlope>,
}

impl Default for IntakeDraft {
    fn default() -> Self {
        Self {
            age: String::new(),
            sex: None,
            chest_pain_type: None,
            resting_bp: 120.0,
            cholesterol: String::new(),
            fasting_bs: None,
            rest_ecg: None,
            max_hr: 150.0,
            exercise_angina: None,
            oldpeak: String::new(),
            st_slope: None,
        }
    }
}

impl IntakeDraft {
    /// Populate a draft from an already-built input (e.g. extracted values).
    #[must_use]
    pub fn from_input(input: &PredictionInput) -> Self {
        Self {
            age: input.age.to_string(),
            sex: Some(input.sex),
            chest_pain_type: Some(input.chest_pain_type),
            resting_bp: input.resting_bp,
            cholesterol: input.cholesterol.to_string(),
            fasting_bs: Some(input.fasting_bs),
            rest_ecg: Some(input.rest_ecg),
            max_hr: input.max_hr,
            exercise_angina: Some(input.exercise_angina),
            oldpeak: input.oldpeak.to_string(),
            st_slope: Some(input.st_slope),
        }
    }

    /// Names of required fields that are still empty, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.age.trim().is_empty() {
            missing.push("age");
        }
        if self.sex.is_none() {
            missing.push("sex");
        }
        if self.chest_pain_type.is_none() {
            missing.push("chestPainType");
        }
        if self.cholesterol.trim().is_empty() {
            missing.push("cholesterol");
        }
        if self.fasting_bs.is_none() {
            missing.push("fastingBS");
        }
        if self.rest_ecg.is_none() {
            missing.push("restECG");
        }
        if self.exercise_angina.is_none() {
            missing.push("exerciseAngina");
        }
        if self.oldpeak.trim().is_empty() {
            missing.push("oldpeak");
        }
        if self.st_slope.is_none() {
            missing.push("stSlope");
        }
        missing
    }

    /// Validate the draft and build the request input.
    ///
    /// Required-field checks run first; unparseable numbers are reported as
    /// out of range for their field.
    ///
    /// # Errors
    /// Returns the first [`ValidationError`] encountered.
    pub fn validate(&self) -> Result<PredictionInput, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let age = parse_age(&self.age).ok_or(ValidationError::Age)?;
        let cholesterol = parse_number(&self.cholesterol).ok_or(ValidationError::Cholesterol)?;
        let oldpeak = parse_number(&self.oldpeak).ok_or(ValidationError::Oldpeak)?;

        // Option fields were checked by missing_fields() above.
        let (
            Some(sex),
            Some(chest_pain_type),
            Some(fasting_bs),
            Some(rest_ecg),
            Some(exercise_angina),
            Some(st_slope),
        ) = (
            self.sex,
            self.chest_pain_type,
            self.fasting_bs,
            self.rest_ecg,
            self.exercise_angina,
            self.st_slope,
        )
        else {
            return Err(ValidationError::MissingFields(self.missing_fields()));
        };

        let input = PredictionInput {
            age,
            sex,
            chest_pain_type,
            resting_bp: self.resting_bp,
            cholesterol,
            fasting_bs,
            rest_ecg,
            max_hr: self.max_hr,
            exercise_angina,
            oldpeak,
            st_slope,
        };
        input.validate()?;
        Ok(input)
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_age(raw: &str) -> Option<u32> {
    let value = parse_number(raw)?;
    if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}

#[cfg(test)]
pub(crate) fn sample_input() -> PredictionInput {
    PredictionInput {
        age: 45,
        sex: Sex::Male,
        chest_pain_type: ChestPainType::AtypicalAngina,
        resting_bp: 130.0,
        cholesterol: 250.0,
        fasting_bs: FastingBloodSugar::Normal,
        rest_ecg: RestingEcg::Normal,
        max_hr: 150.0,
        exercise_angina: ExerciseAngina::No,
        oldpeak: 1.0,
        st_slope: StSlope::Up,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> IntakeDraft {
        IntakeDraft::from_input(&sample_input())
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(sample_input()).expect("Should serialize");

        assert_eq!(json["restECG"], "Normal");
        assert!(json.get("restingECG").is_none());
        assert_eq!(json["chestPainType"], "ATA");
        assert_eq!(json["restingBP"], 130.0);
        assert_eq!(json["fastingBS"], 0);
        assert_eq!(json["maxHR"], 150.0);
        assert_eq!(json["exerciseAngina"], "N");
        assert_eq!(json["stSlope"], "Up");
        assert_eq!(json["sex"], "M");
        assert_eq!(json["age"], 45);
    }

    #[test]
    fn test_accepts_echoed_input() {
        let echoed = r#"{"age":45,"sex":"M","chestPainType":"ATA","restingBP":130.0,
            "cholesterol":250.0,"fastingBS":0,"restECG":"Normal","maxHR":150.0,
            "exerciseAngina":"N","oldpeak":1.0,"stSlope":"Up"}"#;
        let input: PredictionInput = serde_json::from_str(echoed).expect("Should parse");
        assert_eq!(input, sample_input());
    }

    #[test]
    fn test_rejects_bad_fasting_flag() {
        let json = serde_json::to_string(&sample_input())
            .expect("Should serialize")
            .replace("\"fastingBS\":0", "\"fastingBS\":2");
        assert!(serde_json::from_str::<PredictionInput>(&json).is_err());
    }

    #[test]
    fn test_complete_draft_validates() {
        let input = complete_draft().validate().expect("Should validate");
        assert_eq!(input, sample_input());
    }

    #[test]
    fn test_missing_age_is_required_field_error() {
        let draft = IntakeDraft {
            age: String::new(),
            ..complete_draft()
        };

        let err = draft.validate().expect_err("Should fail");
        assert_eq!(err, ValidationError::MissingFields(vec!["age"]));
        assert_eq!(
            err.to_string(),
            "Please fill in all required fields before submitting."
        );
    }

    #[test]
    fn test_default_draft_lists_all_required_fields() {
        let missing = IntakeDraft::default().missing_fields();
        assert_eq!(missing.len(), 9);
        assert!(!missing.contains(&"restingBP"));
        assert!(!missing.contains(&"maxHR"));
    }

    #[test]
    fn test_cholesterol_out_of_range() {
        let draft = IntakeDraft {
            cholesterol: "1500".to_string(),
            ..complete_draft()
        };
        assert_eq!(draft.validate(), Err(ValidationError::Cholesterol));
    }

    #[test]
    fn test_age_bounds() {
        let cases = [
            ("0", false),
            ("1", true),
            ("120", true),
            ("121", false),
            ("45.5", false),
            ("abc", false),
        ];
        for (raw, ok) in cases {
            let draft = IntakeDraft {
                age: raw.to_string(),
                ..complete_draft()
            };
            assert_eq!(draft.validate().is_ok(), ok, "age {raw}");
        }
    }

    #[test]
    fn test_oldpeak_and_slider_ranges() {
        let draft = IntakeDraft {
            oldpeak: "10.5".to_string(),
            ..complete_draft()
        };
        assert_eq!(draft.validate(), Err(ValidationError::Oldpeak));

        let draft = IntakeDraft {
            resting_bp: 79.0,
            ..complete_draft()
        };
        assert_eq!(draft.validate(), Err(ValidationError::RestingBp));

        let draft = IntakeDraft {
            max_hr: 221.0,
            ..complete_draft()
        };
        assert_eq!(draft.validate(), Err(ValidationError::MaxHr));
    }
}
