pub mod catalogs;
pub mod completion_client_http;
pub mod completion_client_retrying;
pub mod credentials_env_file;
pub mod memory_document_store;
pub mod pdf_printer;
pub mod text_extraction;
