//! Medical document selection for automatic data extraction.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::domain::UploadedDocument;
use crate::tui::styles::MedicalTheme;

use super::{key_hints, render_footer, render_header};

/// Upload screen state
#[derive(Debug, Default)]
pub struct UploadState {
    /// Path being typed
    pub path_input: String,
    pub documents: Vec<UploadedDocument>,
    pub selected: usize,
}

impl UploadState {
    pub fn input_char(&mut self, c: char) {
        if !c.is_control() {
            self.path_input.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        self.path_input.pop();
    }

    /// Take the typed path, leaving the input empty.
    pub fn take_path(&mut self) -> Option<String> {
        let path = self.path_input.trim().to_string();
        self.path_input.clear();
        (!path.is_empty()).then_some(path)
    }

    pub fn add(&mut self, document: UploadedDocument) {
        self.documents.push(document);
        self.selected = self.documents.len() - 1;
    }

    pub fn remove_selected(&mut self) {
        if self.selected < self.documents.len() {
            self.documents.remove(self.selected);
        }
        self.selected = self.selected.min(self.documents.len().saturating_sub(1));
    }

    pub fn next(&mut self) {
        if !self.documents.is_empty() {
            self.selected = (self.selected + 1) % self.documents.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.documents.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.documents.len() - 1);
        }
    }
}

const SUPPORTED_DOCUMENTS: [(&str, &str); 5] = [
    ("Blood Report", "Complete blood count, lipid profile, etc."),
    ("ECG Report", "Electrocardiogram results"),
    ("TMT Report", "Treadmill test results"),
    ("Prescription", "Doctor's prescription with medical history"),
    ("Other Medical Document", "Any other relevant medical document"),
];

pub fn render_upload(f: &mut Frame, area: Rect, state: &UploadState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(7), // Supported documents
            Constraint::Length(3), // Path input
            Constraint::Min(0),    // Selected files
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(
        f,
        chunks[0],
        "Upload Medical Documents",
        "PDF, JPG, PNG - Max 10MB each",
    );

    let supported: Vec<Line> = SUPPORTED_DOCUMENTS
        .iter()
        .map(|(label, desc)| {
            Line::from(vec![
                Span::styled(format!("  {label}: "), MedicalTheme::text()),
                Span::styled(*desc, MedicalTheme::text_muted()),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(supported).block(
            Block::default()
                .title(Span::styled(" Supported Documents ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        ),
        chunks[1],
    );

    let input = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(state.path_input.clone(), MedicalTheme::text()),
        Span::styled("▌", MedicalTheme::cursor()),
    ]))
    .block(
        Block::default()
            .title(Span::styled(" File path ", MedicalTheme::focused()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );
    f.render_widget(input, chunks[2]);

    let block = Block::default()
        .title(Span::styled(
            format!(" Uploaded Files ({}) ", state.documents.len()),
            MedicalTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    if state.documents.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "Type a file path and press [Enter] to add it.",
                MedicalTheme::text_muted(),
            ))
            .block(block),
            chunks[3],
        );
    } else {
        let items: Vec<ListItem> = state
            .documents
            .iter()
            .enumerate()
            .map(|(i, doc)| {
                let style = if i == state.selected {
                    MedicalTheme::selected()
                } else {
                    MedicalTheme::text()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {} ", doc.kind.label()), MedicalTheme::info()),
                    Span::styled(doc.name(), style),
                    Span::styled(format!("  {:.2} MB", doc.size_mb()), MedicalTheme::text_muted()),
                ]))
            })
            .collect();
        f.render_widget(List::new(items).block(block), chunks[3]);
    }

    render_footer(
        f,
        chunks[4],
        key_hints(&[
            ("Enter", "Add file / Process when empty"),
            ("↑↓", "Select"),
            ("Del", "Remove"),
            ("Esc", "Manual Entry"),
        ]),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentKind;

    fn doc(name: &str) -> UploadedDocument {
        UploadedDocument {
            path: name.into(),
            kind: DocumentKind::Pdf,
            size_bytes: 1024,
        }
    }

    #[test]
    fn test_take_path_trims_and_clears() {
        let mut state = UploadState::default();
        for c in "  /tmp/ecg.pdf ".chars() {
            state.input_char(c);
        }
        assert_eq!(state.take_path().as_deref(), Some("/tmp/ecg.pdf"));
        assert!(state.path_input.is_empty());
        assert!(state.take_path().is_none());
    }

    #[test]
    fn test_selection_and_removal() {
        let mut state = UploadState::default();
        state.add(doc("a.pdf"));
        state.add(doc("b.pdf"));
        assert_eq!(state.selected, 1);

        state.next();
        assert_eq!(state.selected, 0);
        state.prev();
        assert_eq!(state.selected, 1);

        state.remove_selected();
        assert_eq!(state.documents.len(), 1);
        assert_eq!(state.selected, 0);

        state.remove_selected();
        assert!(state.documents.is_empty());
        state.remove_selected();
        assert_eq!(state.selected, 0);
    }
}
