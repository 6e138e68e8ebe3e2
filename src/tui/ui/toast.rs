//! Transient notifications shown over the current screen.

use std::time::{Duration, Instant};

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

const TOAST_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Debug, Clone)]
pub struct Toast {
    pub title: &'static str,
    pub body: String,
    pub is_error: bool,
    shown_at: Instant,
}

impl Toast {
    pub fn info(title: &'static str, body: impl Into<String>) -> Self {
        Self {
            title,
            body: body.into(),
            is_error: false,
            shown_at: Instant::now(),
        }
    }

    pub fn error(title: &'static str, body: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::info(title, body)
        }
    }

    #[must_use]
    pub fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= TOAST_LIFETIME
    }
}

/// Draw `toast` in the top-right corner of `area`.
pub fn render_toast(f: &mut Frame, area: Rect, toast: &Toast) {
    let width = area.width.min(50);
    let height = area.height.min(5);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height,
    };

    let style = MedicalTheme::toast(toast.is_error);
    let content = Paragraph::new(vec![
        Line::from(Span::styled(toast.title, style)),
        Line::from(Span::styled(toast.body.clone(), style)),
    ])
    .style(style)
    .alignment(Alignment::Left)
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).border_style(style));

    f.render_widget(Clear, rect);
    f.render_widget(content, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expiry() {
        let toast = Toast::error("Prediction Error", "model offline");
        assert!(toast.is_error);
        assert!(!toast.expired(Instant::now()));
        assert!(toast.expired(Instant::now() + TOAST_LIFETIME));
    }
}
