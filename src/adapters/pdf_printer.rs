//! PDF rendering through `printpdf` builtin Helvetica fonts.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::domain::AppError;
use crate::domain::pdf_layout::{
    BODY_FONT_SIZE, DocumentLayout, PAGE_HEIGHT_PT, PAGE_WIDTH_PT, PlacedLine, TITLE_FONT_SIZE,
};
use crate::ports::PdfWriter;

#[derive(Debug, Clone, Copy, Default)]
pub struct PrintPdfWriter;

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn draw(layer: &PdfLayerReference, line: &PlacedLine, size: f32, font: &IndirectFontRef) {
    layer.use_text(line.text.clone(), size, mm(line.x), mm(line.y), font);
}

impl PdfWriter for PrintPdfWriter {
    fn write(&self, layout: &DocumentLayout, path: &Path) -> Result<(), AppError> {
        let fail =
            |reason: String| AppError::PdfExport { path: path.display().to_string(), reason };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| fail(e.to_string()))?;
        }

        let (doc, first_page, first_layer) = PdfDocument::new(
            layout.title.text.as_str(),
            mm(PAGE_WIDTH_PT),
            mm(PAGE_HEIGHT_PT),
            "Layer 1",
        );
        let title_font =
            doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(|e| fail(e.to_string()))?;
        let body_font =
            doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| fail(e.to_string()))?;

        let first = doc.get_page(first_page).get_layer(first_layer);
        draw(&first, &layout.title, TITLE_FONT_SIZE, &title_font);

        for (index, page) in layout.pages.iter().enumerate() {
            let layer = if index == 0 {
                first.clone()
            } else {
                let (page_ref, layer_ref) = doc.add_page(
                    mm(PAGE_WIDTH_PT),
                    mm(PAGE_HEIGHT_PT),
                    format!("Layer {}", index + 1),
                );
                doc.get_page(page_ref).get_layer(layer_ref)
            };
            for line in &page.lines {
                draw(&layer, line, BODY_FONT_SIZE, &body_font);
            }
        }

        let file = File::create(path).map_err(|e| fail(e.to_string()))?;
        doc.save(&mut BufWriter::new(file)).map_err(|e| fail(e.to_string()))?;
        tracing::debug!(path = %path.display(), pages = layout.pages.len(), "wrote pdf");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pdf_layout::layout_document;
    use tempfile::tempdir;

    #[test]
    fn writes_a_pdf_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("lesson.pdf");
        let layout = layout_document("Educational Content", "Grade 3: Addition\n\nWarm-up");

        PrintPdfWriter.write(&layout, &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn multi_page_layout_is_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("long.pdf");
        let text = (0..120).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let layout = layout_document("Educational Content", &text);
        assert!(layout.pages.len() > 1);

        PrintPdfWriter.write(&layout, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn unwritable_destination_reports_pdf_export_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("lesson.pdf");

        let err = PrintPdfWriter.write(&layout_document("t", "body"), &path).unwrap_err();
        assert!(matches!(err, AppError::PdfExport { .. }));
        assert!(err.to_string().starts_with("Error generating PDF at"));
    }
}
