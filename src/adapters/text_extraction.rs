//! Plain-text extraction for reference documents.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::domain::AppError;
use crate::domain::DocumentKind;

const DOCX_BODY_PART: &str = "word/document.xml";

/// Extract the text of `path`, dispatching on `kind`.
pub fn extract_text(path: &Path, kind: DocumentKind) -> Result<String, AppError> {
    match kind {
        DocumentKind::Txt => {
            let bytes = fs::read(path)?;
            String::from_utf8(bytes).map_err(|e| extraction_error(path, e))
        }
        DocumentKind::Pdf => {
            let bytes = fs::read(path)?;
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| extraction_error(path, e))
        }
        DocumentKind::Docx => {
            let file = File::open(path)?;
            let mut archive = zip::ZipArchive::new(file).map_err(|e| extraction_error(path, e))?;
            let mut xml = String::new();
            archive
                .by_name(DOCX_BODY_PART)
                .map_err(|e| extraction_error(path, e))?
                .read_to_string(&mut xml)?;
            docx_paragraphs(&xml).map_err(|e| extraction_error(path, e))
        }
    }
}

fn extraction_error(path: &Path, reason: impl std::fmt::Display) -> AppError {
    AppError::DocumentExtraction { path: path.display().to_string(), reason: reason.to_string() }
}

/// Join the text runs of every `w:p` paragraph, one paragraph per line.
fn docx_paragraphs(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) if e.name().as_ref() == b"w:t" => in_text = false,
            Event::End(e) if e.name().as_ref() == b"w:p" => {
                paragraphs.push(std::mem::take(&mut current));
            }
            Event::Empty(e) if e.name().as_ref() == b"w:p" => paragraphs.push(String::new()),
            Event::Empty(e) if e.name().as_ref() == b"w:tab" => current.push('\t'),
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
