//! UI module: View components for the TUI.

pub mod dashboard;
pub mod intake;
pub mod result;
pub mod toast;
pub mod upload;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::DISCLAIMER;
use crate::tui::styles::MedicalTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            format!("DISCLAIMER: {DISCLAIMER}"),
            MedicalTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Predictions come from a remote model and are not a diagnosis.",
            MedicalTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// Header bar shared by all screens.
pub(crate) fn render_header(f: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(title.to_string(), MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled(subtitle.to_string(), MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

/// Footer line of `[key] description` hints.
pub(crate) fn key_hints(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let spans: Vec<Span<'static>> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!("[{key}] "), MedicalTheme::key_hint()),
                Span::styled(format!("{desc} "), MedicalTheme::key_desc()),
            ]
        })
        .collect();
    Line::from(spans)
}

pub(crate) fn render_footer(f: &mut Frame, area: Rect, content: Line<'_>) {
    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
