//! Health parameter intake form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::input::{MAX_HR_RANGE, RESTING_BP_RANGE};
use crate::domain::{
    ChestPainType, ExerciseAngina, FastingBloodSugar, IntakeDraft, PredictionInput, RestingEcg,
    Sex, StSlope, ValidationError,
};
use crate::tui::styles::MedicalTheme;

use super::{key_hints, render_footer, render_header};

/// Form fields in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Age,
    Sex,
    ChestPainType,
    RestingBp,
    Cholesterol,
    FastingBs,
    RestEcg,
    MaxHr,
    ExerciseAngina,
    Oldpeak,
    StSlope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    /// Free numeric text; `decimal` allows a fractional part
    Text { decimal: bool },
    Slider,
    Choice,
}

impl FieldId {
    pub const ALL: [Self; 11] = [
        Self::Age,
        Self::Sex,
        Self::ChestPainType,
        Self::RestingBp,
        Self::Cholesterol,
        Self::FastingBs,
        Self::RestEcg,
        Self::MaxHr,
        Self::ExerciseAngina,
        Self::Oldpeak,
        Self::StSlope,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Sex => "Sex",
            Self::ChestPainType => "Chest Pain Type",
            Self::RestingBp => "Resting Blood Pressure",
            Self::Cholesterol => "Cholesterol",
            Self::FastingBs => "Fasting Blood Sugar > 120 mg/dl",
            Self::RestEcg => "Resting ECG",
            Self::MaxHr => "Maximum Heart Rate",
            Self::ExerciseAngina => "Exercise Induced Angina",
            Self::Oldpeak => "ST Depression (Oldpeak)",
            Self::StSlope => "ST Slope",
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            Self::Age => "years (1-120)",
            Self::Cholesterol => "mg/dl (0-1000)",
            Self::Oldpeak => "0-10",
            _ => "←/→ to choose",
        }
    }

    /// Name used in validation results.
    fn wire_name(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::ChestPainType => "chestPainType",
            Self::RestingBp => "restingBP",
            Self::Cholesterol => "cholesterol",
            Self::FastingBs => "fastingBS",
            Self::RestEcg => "restECG",
            Self::MaxHr => "maxHR",
            Self::ExerciseAngina => "exerciseAngina",
            Self::Oldpeak => "oldpeak",
            Self::StSlope => "stSlope",
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Self::Age => FieldKind::Text { decimal: false },
            Self::Cholesterol | Self::Oldpeak => FieldKind::Text { decimal: true },
            Self::RestingBp | Self::MaxHr => FieldKind::Slider,
            _ => FieldKind::Choice,
        }
    }
}

/// Intake form state
#[derive(Default)]
pub struct IntakeFormState {
    pub draft: IntakeDraft,
    pub selected_field: usize,
    pub error_message: Option<String>,
    /// Required fields flagged by the last submission attempt
    missing: Vec<&'static str>,
}

impl IntakeFormState {
    #[must_use]
    pub fn selected(&self) -> FieldId {
        FieldId::ALL[self.selected_field]
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % FieldId::ALL.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = FieldId::ALL.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    fn text_mut(&mut self, field: FieldId) -> Option<&mut String> {
        match field {
            FieldId::Age => Some(&mut self.draft.age),
            FieldId::Cholesterol => Some(&mut self.draft.cholesterol),
            FieldId::Oldpeak => Some(&mut self.draft.oldpeak),
            _ => None,
        }
    }

    fn edited(&mut self, field: FieldId) {
        self.error_message = None;
        self.missing.retain(|name| *name != field.wire_name());
    }

    /// Add a character to the current text field
    pub fn input_char(&mut self, c: char) {
        let field = self.selected();
        let FieldKind::Text { decimal } = field.kind() else {
            return;
        };

        let accepted = c.is_ascii_digit() || (decimal && c == '.');
        if let Some(value) = self.text_mut(field).filter(|_| accepted) {
            if c == '.' && value.contains('.') {
                return;
            }
            value.push(c);
            self.edited(field);
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        let field = self.selected();
        if let Some(value) = self.text_mut(field) {
            value.pop();
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        let field = self.selected();
        let defaults = IntakeDraft::default();
        match field {
            FieldId::Sex => self.draft.sex = None,
            FieldId::ChestPainType => self.draft.chest_pain_type = None,
            FieldId::FastingBs => self.draft.fasting_bs = None,
            FieldId::RestEcg => self.draft.rest_ecg = None,
            FieldId::ExerciseAngina => self.draft.exercise_angina = None,
            FieldId::StSlope => self.draft.st_slope = None,
            FieldId::RestingBp => self.draft.resting_bp = defaults.resting_bp,
            FieldId::MaxHr => self.draft.max_hr = defaults.max_hr,
            FieldId::Age | FieldId::Cholesterol | FieldId::Oldpeak => {
                if let Some(value) = self.text_mut(field) {
                    value.zeroize();
                }
            }
        }
    }

    /// Move a slider or cycle a choice by `delta` steps.
    pub fn adjust(&mut self, delta: i32) {
        let field = self.selected();
        let d = &mut self.draft;
        match field {
            FieldId::RestingBp => d.resting_bp = step(d.resting_bp, delta, RESTING_BP_RANGE),
            FieldId::MaxHr => d.max_hr = step(d.max_hr, delta, MAX_HR_RANGE),
            FieldId::Sex => d.sex = cycle(d.sex, &Sex::ALL, delta),
            FieldId::ChestPainType => {
                d.chest_pain_type = cycle(d.chest_pain_type, &ChestPainType::ALL, delta);
            }
            FieldId::FastingBs => {
                d.fasting_bs = cycle(d.fasting_bs, &FastingBloodSugar::ALL, delta);
            }
            FieldId::RestEcg => d.rest_ecg = cycle(d.rest_ecg, &RestingEcg::ALL, delta),
            FieldId::ExerciseAngina => {
                d.exercise_angina = cycle(d.exercise_angina, &ExerciseAngina::ALL, delta);
            }
            FieldId::StSlope => d.st_slope = cycle(d.st_slope, &StSlope::ALL, delta),
            FieldId::Age | FieldId::Cholesterol | FieldId::Oldpeak => return,
        }
        self.edited(field);
    }

    /// Current value for display, `None` when the field is empty.
    #[must_use]
    pub fn display_value(&self, field: FieldId) -> Option<String> {
        let d = &self.draft;
        let text = |s: &String| (!s.is_empty()).then(|| s.clone());
        match field {
            FieldId::Age => text(&d.age),
            FieldId::Cholesterol => text(&d.cholesterol),
            FieldId::Oldpeak => text(&d.oldpeak),
            FieldId::RestingBp => Some(format!("{} mmHg", d.resting_bp)),
            FieldId::MaxHr => Some(format!("{} bpm", d.max_hr)),
            FieldId::Sex => d.sex.map(|v| v.label().to_string()),
            FieldId::ChestPainType => d.chest_pain_type.map(|v| v.label().to_string()),
            FieldId::FastingBs => d.fasting_bs.map(|v| v.label().to_string()),
            FieldId::RestEcg => d.rest_ecg.map(|v| v.label().to_string()),
            FieldId::ExerciseAngina => d.exercise_angina.map(|v| v.label().to_string()),
            FieldId::StSlope => d.st_slope.map(|v| v.label().to_string()),
        }
    }

    /// Validate the form, recording the error for display on failure.
    ///
    /// # Errors
    /// Returns the validation failure shown on the form.
    pub fn validate(&mut self) -> Result<PredictionInput, ValidationError> {
        match self.draft.validate() {
            Ok(input) => {
                self.error_message = None;
                self.missing.clear();
                Ok(input)
            }
            Err(e) => {
                self.missing = match &e {
                    ValidationError::MissingFields(fields) => fields.clone(),
                    _ => Vec::new(),
                };
                self.error_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Fill the form with values from another source (e.g. document analysis).
    pub fn load_input(&mut self, input: &PredictionInput) {
        self.clear_sensitive();
        self.draft = IntakeDraft::from_input(input);
    }

    /// Load sample data for testing
    pub fn load_sample_data(&mut self) {
        self.clear_sensitive();
        self.draft = IntakeDraft {
            age: "45".to_string(),
            sex: Some(Sex::Male),
            chest_pain_type: Some(ChestPainType::AtypicalAngina),
            resting_bp: 130.0,
            cholesterol: "250".to_string(),
            fasting_bs: Some(FastingBloodSugar::Normal),
            rest_ecg: Some(RestingEcg::Normal),
            max_hr: 150.0,
            exercise_angina: Some(ExerciseAngina::No),
            oldpeak: "1.0".to_string(),
            st_slope: Some(StSlope::Up),
        };
    }

    /// Wipe typed buffers from memory and reset the form.
    pub fn clear_sensitive(&mut self) {
        self.draft.age.zeroize();
        self.draft.cholesterol.zeroize();
        self.draft.oldpeak.zeroize();
        self.draft = IntakeDraft::default();
        self.error_message = None;
        self.missing.clear();
        self.selected_field = 0;
    }

    fn is_missing(&self, field: FieldId) -> bool {
        self.missing.contains(&field.wire_name())
    }
}

fn step(value: f64, delta: i32, (min, max): (f64, f64)) -> f64 {
    (value.round() + f64::from(delta)).clamp(min, max)
}

fn cycle<T: Copy + PartialEq>(current: Option<T>, options: &[T], delta: i32) -> Option<T> {
    let len = i32::try_from(options.len()).ok().filter(|&l| l > 0)?;
    let next = match current.and_then(|c| options.iter().position(|o| *o == c)) {
        Some(i) => (i32::try_from(i).unwrap_or(0) + delta).rem_euclid(len),
        None if delta >= 0 => 0,
        None => len - 1,
    };
    usize::try_from(next).ok().and_then(|i| options.get(i)).copied()
}

/// Render the intake form
pub fn render_intake_form(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_header(f, chunks[0], "Health Parameters", "Enter values manually");
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (FieldId::ALL.len() + 1) / 2;

    render_field_column(f, columns[0], &FieldId::ALL[..mid], 0, state);
    render_field_column(f, columns[1], &FieldId::ALL[mid..], mid, state);
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FieldId],
    offset: usize,
    state: &IntakeFormState,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == state.selected_field;
        let border_style = if state.is_missing(*field) {
            MedicalTheme::danger()
        } else if is_selected {
            MedicalTheme::border_focused()
        } else {
            MedicalTheme::border()
        };

        let title_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value_display = match state.display_value(*field) {
            Some(value) if matches!(field.kind(), FieldKind::Text { .. }) => {
                Span::styled(value, MedicalTheme::text())
            }
            Some(value) if is_selected => {
                Span::styled(format!("◀ {value} ▶"), MedicalTheme::text())
            }
            Some(value) => Span::styled(value, MedicalTheme::text()),
            None => Span::styled(field.hint(), MedicalTheme::text_muted()),
        };

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            value_display,
            if is_selected && matches!(field.kind(), FieldKind::Text { .. }) {
                Span::styled("▌", MedicalTheme::cursor())
            } else {
                Span::raw("")
            },
        ]))
        .block(block);

        f.render_widget(content, chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        key_hints(&[
            ("↑↓", "Navigate"),
            ("←→", "Adjust"),
            ("Enter", "Predict"),
            ("S", "Sample Data"),
            ("U", "Upload Documents"),
            ("Esc", "Cancel"),
        ])
    };

    render_footer(f, area, content);
}
