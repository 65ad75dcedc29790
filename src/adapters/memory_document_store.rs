use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::domain::{
    AppError, DocumentKind, DocumentSummary, UploadedDocument, select_relevant_context,
};

use super::text_extraction::extract_text;

#[derive(Debug, Default)]
struct StoreState {
    documents: Vec<UploadedDocument>,
    last_id: u64,
}

/// In-memory store of imported reference documents.
///
/// Ids are `doc_<n>` from a counter that only grows, so an id is never handed
/// out twice even after its document is removed.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    state: Mutex<StoreState>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Import a `.txt`, `.pdf` or `.docx` file and return its id.
    pub fn import(&self, path: &Path) -> Result<String, AppError> {
        let kind = DocumentKind::from_path(path)?;
        let raw_text = extract_text(path, kind)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let id = self.insert(name, path, raw_text, kind);
        tracing::info!(
            id = %id,
            path = %path.display(),
            kind = %kind,
            "imported reference document"
        );
        Ok(id)
    }

    /// Add already-extracted text under `name`.
    pub fn import_text(&self, name: &str, text: &str) -> String {
        self.insert(name.to_string(), Path::new(name), text.to_string(), DocumentKind::Txt)
    }

    fn insert(&self, name: String, path: &Path, raw_text: String, kind: DocumentKind) -> String {
        let mut state = self.lock();
        state.last_id += 1;
        let id = format!("doc_{}", state.last_id);
        state.documents.push(UploadedDocument {
            id: id.clone(),
            name,
            path: path.to_path_buf(),
            raw_text,
            kind,
            imported_at: Utc::now(),
        });
        id
    }

    /// Paragraphs relevant to `query` from the documents named by `ids`, or from all
    /// documents when `ids` is `None`. Unknown ids are skipped.
    pub fn context(&self, query: &str, ids: Option<&[String]>, max_tokens: usize) -> String {
        let state = self.lock();
        let selected = state
            .documents
            .iter()
            .filter(|doc| ids.is_none_or(|ids| ids.iter().any(|id| id == &doc.id)));
        select_relevant_context(selected, query, max_tokens)
    }

    pub fn list(&self) -> Vec<DocumentSummary> {
        self.lock().documents.iter().map(DocumentSummary::from).collect()
    }

    pub fn content(&self, id: &str) -> Result<String, AppError> {
        self.lock()
            .documents
            .iter()
            .find(|doc| doc.id == id)
            .map(|doc| doc.raw_text.clone())
            .ok_or_else(|| AppError::DocumentNotFound(id.to_string()))
    }

    /// Remove a document; returns whether it was present.
    pub fn remove(&self, id: &str) -> bool {
        let mut state = self.lock();
        let before = state.documents.len();
        state.documents.retain(|doc| doc.id != id);
        state.documents.len() != before
    }
}
