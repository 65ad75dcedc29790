mod completion_client;
mod credential_store;
mod pdf_writer;

pub use completion_client::{CompletionClient, CompletionRequest};
pub use credential_store::{API_KEY_VAR, CredentialStore};
pub use pdf_writer::PdfWriter;
