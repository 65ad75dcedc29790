use std::path::PathBuf;

use crate::adapters::memory_document_store::MemoryDocumentStore;
use crate::domain::AppError;

pub(super) fn run_documents(
    files: &[PathBuf],
    query: Option<&str>,
    max_tokens: usize,
) -> Result<(), AppError> {
    let store = MemoryDocumentStore::new();
    for path in files {
        store.import(path)?;
    }

    for doc in store.list() {
        println!("{}  {}  ({}, {} chars)", doc.id, doc.name, doc.kind, doc.size);
    }

    if let Some(query) = query {
        let context = store.context(query, None, max_tokens);
        if context.is_empty() {
            println!("\nNo paragraphs match '{}'.", query);
        } else {
            println!("\n{}", context);
        }
    }
    Ok(())
}
