//! PDF adapter: Implementation of `ReportWriter` using printpdf.
//!
//! Lines are placed with Helvetica on a single A4 page. Layout coordinates
//! are measured from the top edge; PDF measures from the bottom, so `y` is
//! flipped here.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use printpdf::{BuiltinFont, Color, Mm, PdfDocument};

use crate::domain::report::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::domain::{ReportDocument, Rgb};
use crate::ports::{ExportError, ReportWriter};

/// Writes reports as single-page PDF files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfReportWriter;

impl PdfReportWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Render `document` into PDF bytes.
    ///
    /// # Errors
    /// Returns `ExportError::Render` if printpdf rejects the document.
    pub fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, ExportError> {
        let (doc, page, layer) = PdfDocument::new(
            document.title.as_str(),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Report",
        );

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Render(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);

        for line in &document.lines {
            layer.set_fill_color(pdf_color(line.color));
            layer.use_text(
                line.text.as_str(),
                line.font_size,
                Mm(line.x_mm),
                Mm(PAGE_HEIGHT_MM - line.y_mm),
                &font,
            );
        }

        let mut writer = BufWriter::new(Vec::new());
        doc.save(&mut writer)
            .map_err(|e| ExportError::Render(e.to_string()))?;
        writer
            .into_inner()
            .map_err(|e| ExportError::Render(e.to_string()))
    }
}

fn pdf_color(Rgb(r, g, b): Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

impl ReportWriter for PdfReportWriter {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn write(&self, document: &ReportDocument, path: &Path) -> Result<(), ExportError> {
        // Render fully before touching the destination so a failure leaves
        // the previous export intact.
        let bytes = self.render(document)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = File::create(path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;

        tracing::debug!("Wrote {} byte report to {}", bytes.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReportLine;

    fn tiny_document() -> ReportDocument {
        ReportDocument {
            title: "Test Report".to_string(),
            lines: vec![ReportLine {
                text: "Risk Level: LOW".to_string(),
                font_size: 16.0,
                color: Rgb(50, 150, 50),
                x_mm: 20.0,
                y_mm: 65.0,
            }],
        }
    }

    #[test]
    fn test_render_produces_pdf() {
        let bytes = PdfReportWriter::new()
            .render(&tiny_document())
            .expect("Should render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("nested").join("report.pdf");
        let writer = PdfReportWriter::new();

        writer.write(&tiny_document(), &path).expect("Should write");
        std::fs::write(&path, b"stale").expect("Should clobber");
        writer.write(&tiny_document(), &path).expect("Should overwrite");

        let bytes = std::fs::read(&path).expect("Should read back");
        assert!(bytes.starts_with(b"%PDF"));
    }
}
