//! Layout model for exported reports.
//!
//! A report is a flat list of positioned text lines. Building it is pure;
//! turning it into a file is the job of a `ReportWriter`.

/// Page width of an A4 sheet in millimetres.
pub const PAGE_WIDTH_MM: f32 = 210.0;

/// Page height of an A4 sheet in millimetres.
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// One line of text placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    pub color: Rgb,
    /// Left offset in millimetres
    pub x_mm: f32,
    /// Baseline offset from the top edge in millimetres
    pub y_mm: f32,
}

/// A single-page report ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub lines: Vec<ReportLine>,
}

impl ReportDocument {
    /// Find the first line starting with `prefix`.
    #[must_use]
    pub fn line_starting_with(&self, prefix: &str) -> Option<&ReportLine> {
        self.lines.iter().find(|l| l.text.starts_with(prefix))
    }
}
