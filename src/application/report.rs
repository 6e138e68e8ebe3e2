//! Report building and export.
//!
//! Layout is computed by pure functions into a [`ReportDocument`]; only
//! [`ReportService::export`] touches the filesystem, through a `ReportWriter`.

use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};

use crate::domain::{
    ExerciseAngina, PredictionInput, PredictionResult, ReportDocument, ReportLine, Rgb, RiskLevel,
    Sex,
};
use crate::ports::{ExportError, ReportWriter};

/// Fixed name of the exported report.
pub const REPORT_FILE_NAME: &str = "heart-disease-prediction.pdf";

pub const REPORT_TITLE: &str = "Heart Disease Prediction Report";

pub const DISCLAIMER: &str = "This prediction is for educational purposes only. Consult healthcare professionals for medical advice.";

const WARNING_COLOR: Rgb = Rgb(200, 50, 50);
const POSITIVE_COLOR: Rgb = Rgb(50, 150, 50);
const TEXT_COLOR: Rgb = Rgb(40, 40, 40);
const MUTED_COLOR: Rgb = Rgb(100, 100, 100);
const FOOTER_COLOR: Rgb = Rgb(150, 150, 150);

const LEFT_MARGIN_MM: f32 = 20.0;
const PARAMETERS_TOP_MM: f32 = 115.0;
const PARAMETER_SPACING_MM: f32 = 10.0;

/// Color of the risk line: the warning hue for high risk, positive otherwise.
#[must_use]
pub fn risk_color(risk: RiskLevel) -> Rgb {
    if risk.is_high() {
        WARNING_COLOR
    } else {
        POSITIVE_COLOR
    }
}

/// Probability as shown to users, e.g. `23.4%`.
#[must_use]
pub fn format_probability(probability: f64) -> String {
    format!("{probability:.1}%")
}

/// The eleven input parameter lines, in report order.
#[must_use]
pub fn parameter_lines(input: &PredictionInput) -> Vec<String> {
    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };

    vec![
        format!("Age: {} years", input.age),
        format!(
            "Sex: {}",
            match input.sex {
                Sex::Male => "Male",
                Sex::Female => "Female",
            }
        ),
        format!("Chest Pain Type: {}", input.chest_pain_type.code()),
        format!("Resting BP: {} mmHg", input.resting_bp),
        format!("Cholesterol: {} mg/dl", input.cholesterol),
        format!("Fasting Blood Sugar: {}", yes_no(input.fasting_bs.is_elevated())),
        format!("Resting ECG: {}", input.rest_ecg.code()),
        format!("Max Heart Rate: {} bpm", input.max_hr),
        format!(
            "Exercise Angina: {}",
            yes_no(input.exercise_angina == ExerciseAngina::Yes)
        ),
        format!("ST Depression: {}", input.oldpeak),
        format!("ST Slope: {}", input.st_slope.code()),
    ]
}

fn line(text: impl Into<String>, font_size: f32, color: Rgb, y_mm: f32) -> ReportLine {
    ReportLine {
        text: text.into(),
        font_size,
        color,
        x_mm: LEFT_MARGIN_MM,
        y_mm,
    }
}

/// Lay out the report for one prediction.
#[must_use]
pub fn build_report(
    prediction: &PredictionResult,
    input: &PredictionInput,
    generated_at: DateTime<Local>,
) -> ReportDocument {
    let mut lines = vec![
        line(REPORT_TITLE, 20.0, TEXT_COLOR, 30.0),
        line(
            format!("Generated on: {}", generated_at.format("%Y-%m-%d %H:%M")),
            12.0,
            MUTED_COLOR,
            45.0,
        ),
        line(
            format!("Risk Level: {}", prediction.risk),
            16.0,
            risk_color(prediction.risk),
            65.0,
        ),
        line(
            format!("Probability: {}", format_probability(prediction.probability)),
            12.0,
            TEXT_COLOR,
            80.0,
        ),
        line("Input Parameters:", 14.0, TEXT_COLOR, 100.0),
    ];

    let mut y = PARAMETERS_TOP_MM;
    for text in parameter_lines(input) {
        lines.push(line(text, 10.0, TEXT_COLOR, y));
        y += PARAMETER_SPACING_MM;
    }

    lines.push(line(DISCLAIMER, 8.0, FOOTER_COLOR, 250.0));

    ReportDocument {
        title: REPORT_TITLE.to_string(),
        lines,
    }
}

/// Visual tone of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Warning,
}

/// What the result screen shows for one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub headline: String,
    pub probability_label: String,
    /// Probability clamped to 0-100, for gauges
    pub probability_percent: f64,
    pub tone: Tone,
    pub assessed_at: String,
    pub recommendations_title: &'static str,
    pub recommendations: &'static [&'static str],
}

const HIGH_RISK_RECOMMENDATIONS: &[&str] = &[
    "Consult with a cardiologist as soon as possible",
    "Consider lifestyle modifications (diet, exercise, stress management)",
    "Monitor blood pressure and cholesterol levels regularly",
    "Follow your healthcare provider's recommendations",
];

const LOW_RISK_RECOMMENDATIONS: &[&str] = &[
    "Continue maintaining a healthy lifestyle",
    "Regular exercise and balanced diet",
    "Annual health check-ups recommended",
    "Monitor key health indicators regularly",
];

/// Derive the display summary for a prediction.
#[must_use]
pub fn summarize(prediction: &PredictionResult) -> ResultSummary {
    let high = prediction.risk.is_high();

    let headline = if prediction.message.trim().is_empty() {
        prediction.risk.description().to_string()
    } else {
        prediction.message.clone()
    };

    // Unparseable timestamps are shown as received.
    let assessed_at = prediction.issued_at().map_or_else(
        || prediction.timestamp.clone(),
        |t: DateTime<Utc>| {
            t.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        },
    );

    ResultSummary {
        headline,
        probability_label: format_probability(prediction.probability),
        probability_percent: prediction.probability_percent(),
        tone: if high { Tone::Warning } else { Tone::Positive },
        assessed_at,
        recommendations_title: if high {
            "Important Recommendations"
        } else {
            "Maintain Your Health"
        },
        recommendations: if high {
            HIGH_RISK_RECOMMENDATIONS
        } else {
            LOW_RISK_RECOMMENDATIONS
        },
    }
}

/// Writes prediction reports into a fixed output directory.
pub struct ReportService<W: ReportWriter> {
    writer: W,
    output_dir: PathBuf,
}

impl<W: ReportWriter> ReportService<W> {
    pub fn new(writer: W, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            writer,
            output_dir: output_dir.into(),
        }
    }

    /// Destination of every export.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE_NAME)
    }

    /// Render and write the report, replacing any previous export.
    ///
    /// # Errors
    /// Returns error if rendering or writing fails.
    pub fn export(
        &self,
        prediction: &PredictionResult,
        input: &PredictionInput,
    ) -> Result<PathBuf, ExportError> {
        let document = build_report(prediction, input, Local::now());
        let path = self.output_path();

        self.writer.write(&document, &path)?;
        tracing::info!("Exported {} report", self.writer.extension());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::pdf::PdfReportWriter;
    use crate::domain::{sample_input, sample_result};
    use chrono::TimeZone;
    use std::path::Path;

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 1, 1, 12, 30, 0)
            .single()
            .expect("Should be unambiguous")
    }

    fn high_result() -> PredictionResult {
        PredictionResult {
            risk: RiskLevel::High,
            probability: 77.0,
            message: "High risk of heart disease".to_string(),
            ..sample_result()
        }
    }

    #[test]
    fn test_summary_for_low_risk() {
        let summary = summarize(&sample_result());

        assert_eq!(summary.probability_label, "23.4%");
        assert_eq!(summary.tone, Tone::Positive);
        assert_eq!(summary.headline, "Low risk");
        assert_eq!(summary.recommendations_title, "Maintain Your Health");
        assert_eq!(summary.recommendations.len(), 4);
    }

    #[test]
    fn test_summary_for_high_risk() {
        let summary = summarize(&high_result());
        assert_eq!(summary.tone, Tone::Warning);
        assert_eq!(summary.probability_label, "77.0%");
        assert_eq!(summary.recommendations, HIGH_RISK_RECOMMENDATIONS);
    }

    #[test]
    fn test_summary_keeps_unparseable_timestamp() {
        let result = PredictionResult {
            timestamp: "yesterday".to_string(),
            message: String::new(),
            ..sample_result()
        };
        let summary = summarize(&result);
        assert_eq!(summary.assessed_at, "yesterday");
        assert_eq!(summary.headline, "Low risk of heart disease");
    }

    #[test]
    fn test_risk_color_switch() {
        assert_eq!(risk_color(RiskLevel::High), Rgb(200, 50, 50));
        assert_eq!(risk_color(RiskLevel::Low), Rgb(50, 150, 50));
    }

    #[test]
    fn test_parameter_lines() {
        let lines = parameter_lines(&sample_input());
        assert_eq!(
            lines,
            vec![
                "Age: 45 years",
                "Sex: Male",
                "Chest Pain Type: ATA",
                "Resting BP: 130 mmHg",
                "Cholesterol: 250 mg/dl",
                "Fasting Blood Sugar: No",
                "Resting ECG: Normal",
                "Max Heart Rate: 150 bpm",
                "Exercise Angina: No",
                "ST Depression: 1",
                "ST Slope: Up",
            ]
        );
    }

    #[test]
    fn test_report_layout() {
        let doc = build_report(&high_result(), &sample_input(), fixed_time());

        assert_eq!(doc.lines.len(), 5 + 11 + 1);
        assert_eq!(doc.lines[0].text, REPORT_TITLE);
        assert_eq!(doc.lines[1].text, "Generated on: 2025-01-01 12:30");

        let risk = doc.line_starting_with("Risk Level:").expect("Should have risk line");
        assert_eq!(risk.text, "Risk Level: HIGH");
        assert_eq!(risk.color, Rgb(200, 50, 50));
        assert!((risk.y_mm - 65.0).abs() < f32::EPSILON);

        let probability = doc.line_starting_with("Probability:").expect("Should have probability");
        assert_eq!(probability.text, "Probability: 77.0%");

        let age = doc.line_starting_with("Age:").expect("Should have age line");
        assert!((age.y_mm - 115.0).abs() < f32::EPSILON);
        let slope = doc.line_starting_with("ST Slope:").expect("Should have slope line");
        assert!((slope.y_mm - 215.0).abs() < f32::EPSILON);

        let footer = doc.lines.last().expect("Should have footer");
        assert_eq!(footer.text, DISCLAIMER);
        assert!((footer.font_size - 8.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_export_writes_fixed_file_name() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let service = ReportService::new(PdfReportWriter::new(), dir.path());

        let path = service
            .export(&sample_result(), &sample_input())
            .expect("Should export");
        assert_eq!(path, dir.path().join(REPORT_FILE_NAME));

        let again = service
            .export(&high_result(), &sample_input())
            .expect("Should overwrite");
        assert_eq!(path, again);

        let bytes = std::fs::read(&path).expect("Should read report");
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(std::fs::read_dir(dir.path()).expect("Should list").count(), 1);
    }

    #[test]
    fn test_export_into_unusable_directory_fails() {
        let blocker = tempfile::NamedTempFile::new().expect("Should create temp file");
        let service = ReportService::new(PdfReportWriter::new(), blocker.path());

        let err = service
            .export(&sample_result(), &sample_input())
            .expect_err("Should fail when the output directory is a file");
        assert!(matches!(err, ExportError::Io(_)));
        assert!(blocker.path().is_file());
    }

    struct BrokenWriter;

    impl ReportWriter for BrokenWriter {
        fn extension(&self) -> &'static str {
            "pdf"
        }

        fn write(&self, _document: &ReportDocument, _path: &Path) -> Result<(), ExportError> {
            Err(ExportError::Render("font unavailable".to_string()))
        }
    }

    #[test]
    fn test_render_failure_reaches_caller() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let service = ReportService::new(BrokenWriter, dir.path());

        let err = service
            .export(&high_result(), &sample_input())
            .expect_err("Should surface the render failure");
        assert!(matches!(&err, ExportError::Render(msg) if msg == "font unavailable"));
        assert_eq!(err.to_string(), "Failed to build report: font unavailable");
        assert!(!service.output_path().exists());
    }
}
