//! Dashboard view: recent predictions and quick actions.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::application::format_probability;
use crate::domain::{SavedResult, HISTORY_CAPACITY};
use crate::tui::styles::{MedicalTheme, LOGO_SMALL};

use super::{key_hints, render_header};

/// Dashboard state for rendering.
#[derive(Debug, Default)]
pub struct DashboardState {
    /// Snapshot of the history, newest first
    pub history: Vec<SavedResult>,
    pub selected: usize,
    /// Waiting for confirmation before clearing history
    pub confirm_clear: bool,
    pub api_url: String,
}

impl DashboardState {
    pub fn set_history(&mut self, history: Vec<SavedResult>) {
        self.history = history;
        self.selected = self.selected.min(self.history.len().saturating_sub(1));
    }

    pub fn next(&mut self) {
        if !self.history.is_empty() {
            self.selected = (self.selected + 1) % self.history.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.history.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.history.len() - 1);
        }
    }

    #[must_use]
    pub fn selected_result(&self) -> Option<&SavedResult> {
        self.history.get(self.selected)
    }
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0], LOGO_SMALL, "Heart Disease Risk Prediction");

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35), // Status and actions
            Constraint::Percentage(65), // History
        ])
        .split(chunks[1]);

    render_side_panels(f, columns[0], state);
    render_history(f, columns[1], state);
}

fn render_side_panels(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .margin(1)
        .split(area);

    let status = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("  Service: ", MedicalTheme::text_secondary()),
            Span::styled(state.api_url.clone(), MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("  Saved results: ", MedicalTheme::text_secondary()),
            Span::styled(
                format!("{}/{}", state.history.len(), HISTORY_CAPACITY),
                MedicalTheme::text(),
            ),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Status ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(status, chunks[0]);

    let actions: Vec<Line> = [
        ("N", "New Prediction"),
        ("U", "Upload Documents"),
        ("Enter", "Open Result"),
        ("C", "Clear History"),
        ("Q", "Quit"),
    ]
    .into_iter()
    .map(|hint| key_hints(&[hint]))
    .collect();

    let actions = Paragraph::new(actions).block(
        Block::default()
            .title(Span::styled(" Quick Actions ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(actions, chunks[1]);
}

fn render_history(f: &mut Frame, area: Rect, state: &DashboardState) {
    let title = if state.confirm_clear {
        Span::styled(" Clear all saved results? [Y]es / [N]o ", MedicalTheme::danger())
    } else {
        Span::styled(" Recent Results ", MedicalTheme::subtitle())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    if state.history.is_empty() {
        let empty_msg = Paragraph::new(Line::from(vec![Span::styled(
            "No saved results yet. Press [N] to start.",
            MedicalTheme::text_muted(),
        )]))
        .block(block);
        f.render_widget(empty_msg, area);
        return;
    }

    let items: Vec<ListItem> = state
        .history
        .iter()
        .enumerate()
        .map(|(i, saved)| {
            let marker = if i == state.selected { "▶ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, MedicalTheme::focused()),
                Span::styled(
                    saved
                        .timestamp
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string(),
                    MedicalTheme::text_secondary(),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("{:<5}", saved.prediction.risk.to_string()),
                    MedicalTheme::risk_level(saved.prediction.risk),
                ),
                Span::raw("  "),
                Span::styled(
                    format_probability(saved.prediction.probability),
                    MedicalTheme::text(),
                ),
                Span::styled(
                    format!("  age {}", saved.input.age),
                    MedicalTheme::text_muted(),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
