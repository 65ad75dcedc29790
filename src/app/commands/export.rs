//! PDF export of generated content.

use std::path::{Path, PathBuf};

use crate::domain::pdf_layout::layout_document;
use crate::domain::{AppError, ExportConfig};
use crate::ports::PdfWriter;

/// Where an export should be written.
#[derive(Debug, Clone, Default)]
pub struct ExportTarget {
    /// Explicit output path.
    pub path: Option<PathBuf>,
    /// Place the file in the user's Desktop directory.
    pub desktop: bool,
}

/// Resolve the output path for an export.
///
/// Without an explicit path the configured default file name is used. With
/// `desktop` set only the file name is kept and the file goes to `~/Desktop`.
pub fn resolve_destination(
    target: &ExportTarget,
    config: &ExportConfig,
) -> Result<PathBuf, AppError> {
    destination_with(target, config, || {
        dirs::desktop_dir().or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
    })
}

fn destination_with(
    target: &ExportTarget,
    config: &ExportConfig,
    desktop_dir: impl FnOnce() -> Option<PathBuf>,
) -> Result<PathBuf, AppError> {
    let path = target.path.clone().unwrap_or_else(|| PathBuf::from(&config.default_filename));
    if !target.desktop {
        return Ok(path);
    }

    let desktop = desktop_dir()
        .ok_or_else(|| AppError::config_error("Could not locate the Desktop directory"))?;
    let file_name = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.default_filename));
    Ok(desktop.join(file_name))
}

/// Lay out `text` under `title` and write it to `destination`.
pub fn execute<W: PdfWriter>(
    writer: &W,
    text: &str,
    title: &str,
    destination: &Path,
) -> Result<PathBuf, AppError> {
    let layout = layout_document(title, text);
    tracing::debug!(
        path = %destination.display(),
        pages = layout.pages.len(),
        lines = layout.line_count(),
        "exporting pdf"
    );
    writer.write(&layout, destination)?;
    Ok(destination.to_path_buf())
}
