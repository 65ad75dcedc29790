use std::path::Path;

use crate::domain::AppError;
use crate::domain::pdf_layout::DocumentLayout;

/// Port for rendering a laid-out document to a PDF file.
pub trait PdfWriter {
    fn write(&self, layout: &DocumentLayout, path: &Path) -> Result<(), AppError>;
}
