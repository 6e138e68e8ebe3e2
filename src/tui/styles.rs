//! Color palette and preset styles for the HeartGuard screens.
//!
//! Risk colors mirror the exported report: red for an elevated risk,
//! green for a low one.

use ratatui::style::{Color, Modifier, Style};

use crate::application::Tone;
use crate::domain::RiskLevel;

/// Inline logo for headers
pub const LOGO_SMALL: &str = "HeartGuard";

pub struct MedicalTheme;

impl MedicalTheme {
    /// Accent for titles, focus and key hints
    pub const ACCENT: Color = Color::Rgb(45, 212, 191); // #2DD4BF
    pub const ACCENT_DARK: Color = Color::Rgb(15, 118, 110); // #0F766E

    pub const BORDER: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const BACKGROUND: Color = Color::Rgb(15, 23, 42); // #0F172A

    /// Low risk, saved, exported
    pub const HEALTHY: Color = Color::Rgb(50, 150, 50);
    /// High risk, failures
    pub const ALERT: Color = Color::Rgb(220, 60, 60);
    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Self::focused()
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::ALERT)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Highlighted row or field
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::ACCENT_DARK)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Self::focused()
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Self::text_secondary()
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    #[must_use]
    pub fn risk_level(level: RiskLevel) -> Style {
        let color = if level.is_high() {
            Self::ALERT
        } else {
            Self::HEALTHY
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn tone(tone: Tone) -> Style {
        match tone {
            Tone::Positive => Self::risk_level(RiskLevel::Low),
            Tone::Warning => Self::risk_level(RiskLevel::High),
        }
    }

    /// Transient notification box
    #[must_use]
    pub fn toast(is_error: bool) -> Style {
        let bg = if is_error { Self::ALERT } else { Self::ACCENT_DARK };
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }
}
