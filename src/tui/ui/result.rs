//! Prediction progress and result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::application::{parameter_lines, summarize, Tone};
use crate::domain::{PredictionInput, PredictionResult};
use crate::tui::styles::MedicalTheme;

use super::{key_hints, render_footer, render_header};

/// Result screen state
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// Nothing to show
    #[default]
    Idle,
    /// Simulated document extraction running
    Analyzing { progress: f64 },
    /// Waiting for the prediction service
    Submitting { progress: f64 },
    /// Prediction available
    Complete {
        result: PredictionResult,
        input: PredictionInput,
    },
}

/// Render the result screen
pub fn render_result_screen(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Prediction Results", "Heart disease risk assessment");

    match state {
        ResultState::Idle => {}
        ResultState::Analyzing { progress } => render_progress(
            f,
            chunks[1],
            "Analyzing",
            *progress,
            "Extracting health parameters from your documents...",
        ),
        ResultState::Submitting { progress } => render_progress(
            f,
            chunks[1],
            "Predicting",
            *progress,
            "Waiting for the prediction service...",
        ),
        ResultState::Complete { result, input } => render_complete(f, chunks[1], result, input),
    }

    let footer = match state {
        ResultState::Complete { .. } => key_hints(&[
            ("P", "Download PDF"),
            ("S", "Save Result"),
            ("N", "New Prediction"),
            ("Esc", "Dashboard"),
        ]),
        _ => Line::from(Span::styled("Processing...", MedicalTheme::text_muted())),
    };
    render_footer(f, chunks[2], footer);
}

fn render_progress(f: &mut Frame, area: Rect, stage: &str, progress: f64, description: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let stage_text = Paragraph::new(Line::from(vec![
        Span::styled("Stage: ", MedicalTheme::text_secondary()),
        Span::styled(stage.to_string(), MedicalTheme::focused()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(stage_text, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(MedicalTheme::info())
        .ratio(progress.clamp(0.0, 1.0))
        .label(format!("{:.0}%", progress * 100.0));
    f.render_widget(gauge, chunks[1]);

    let desc = Paragraph::new(Line::from(Span::styled(
        description.to_string(),
        MedicalTheme::text_muted(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(desc, chunks[2]);
}

fn render_complete(f: &mut Frame, area: Rect, result: &PredictionResult, input: &PredictionInput) {
    let summary = summarize(result);
    let tone_style = MedicalTheme::tone(summary.tone);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let block = Block::default()
        .title(Span::styled(" Risk Assessment Details ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(tone_style);
    let inner = block.inner(columns[0]);
    f.render_widget(block, columns[0]);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Headline
            Constraint::Length(3), // Probability
            Constraint::Length(2), // Assessment time
            Constraint::Min(0),    // Recommendations
        ])
        .margin(1)
        .split(inner);

    let icon = match summary.tone {
        Tone::Positive => "OK",
        Tone::Warning => "!",
    };
    let headline = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{icon} {}", result.risk),
            tone_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(summary.headline.clone(), tone_style)),
    ])
    .alignment(Alignment::Center);
    f.render_widget(headline, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Probability Score ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(tone_style)
        .ratio(summary.probability_percent / 100.0)
        .label(summary.probability_label.clone());
    f.render_widget(gauge, chunks[1]);

    let time = Paragraph::new(Line::from(vec![
        Span::styled("Assessment Time: ", MedicalTheme::text_secondary()),
        Span::styled(summary.assessed_at.clone(), MedicalTheme::text()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(time, chunks[2]);

    let mut recommendations = vec![Line::from(Span::styled(
        summary.recommendations_title,
        tone_style.add_modifier(Modifier::BOLD),
    ))];
    recommendations.extend(
        summary
            .recommendations
            .iter()
            .map(|r| Line::from(Span::styled(format!("• {r}"), MedicalTheme::text()))),
    );
    f.render_widget(
        Paragraph::new(recommendations).wrap(Wrap { trim: true }),
        chunks[3],
    );

    let params: Vec<Line> = parameter_lines(input)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, MedicalTheme::text_secondary())))
        .collect();
    f.render_widget(
        Paragraph::new(params).block(
            Block::default()
                .title(Span::styled(" Input Parameters ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        ),
        columns[1],
    );
}
