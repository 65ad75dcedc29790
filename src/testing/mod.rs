mod fake_completion_client;
mod memory_credential_store;

pub use fake_completion_client::FakeCompletionClient;
pub use memory_credential_store::MemoryCredentialStore;
