//! Reference documents and keyword-overlap context selection.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Blocks kept when the selected context exceeds its word budget.
const MAX_BLOCKS_WHEN_TRUNCATED: usize = 5;
/// Query words must be longer than this many characters to count as keywords.
const MIN_KEYWORD_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Txt,
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Classify a path by its (case-insensitive) extension.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("txt") => Ok(DocumentKind::Txt),
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("docx") => Ok(DocumentKind::Docx),
            Some(other) => Err(AppError::UnsupportedDocumentFormat(format!(".{}", other))),
            None => Err(AppError::UnsupportedDocumentFormat("(no extension)".to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Txt => "txt",
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    pub raw_text: String,
    pub kind: DocumentKind,
    pub imported_at: DateTime<Utc>,
}

/// Listing entry for an imported document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub id: String,
    pub name: String,
    pub kind: DocumentKind,
    /// Length of the extracted text in characters.
    pub size: usize,
}

impl From<&UploadedDocument> for DocumentSummary {
    fn from(doc: &UploadedDocument) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.name.clone(),
            kind: doc.kind,
            size: doc.raw_text.chars().count(),
        }
    }
}

/// Lower-cased query words long enough to be used for matching.
pub fn query_keywords(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_KEYWORD_CHARS)
        .map(str::to_lowercase)
        .collect()
}

/// Select paragraphs from `documents` that mention any keyword of `query`.
///
/// Paragraphs are blank-line delimited. Each match is emitted as
/// `From <name>:\n<paragraph>` and matches are joined by blank lines. When the
/// result exceeds `0.75 * max_tokens` words only the first five blocks are kept.
/// This is a heuristic; it gives no recall or precision guarantee.
pub fn select_relevant_context<'a, I>(documents: I, query: &str, max_tokens: usize) -> String
where
    I: IntoIterator<Item = &'a UploadedDocument>,
{
    let keywords = query_keywords(query);
    if keywords.is_empty() {
        return String::new();
    }

    let mut sections = Vec::new();
    for doc in documents {
        for paragraph in doc.raw_text.split("\n\n") {
            let lower = paragraph.to_lowercase();
            if keywords.iter().any(|keyword| lower.contains(keyword.as_str())) {
                sections.push(format!("From {}:\n{}", doc.name, paragraph));
            }
        }
    }

    let context = sections.join("\n\n");
    let word_budget = max_tokens as f64 * 0.75;
    if context.split_whitespace().count() as f64 > word_budget {
        let blocks: Vec<&str> = context.split("\n\n").take(MAX_BLOCKS_WHEN_TRUNCATED).collect();
        return blocks.join("\n\n");
    }
    context
}
