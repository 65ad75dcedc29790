use std::sync::Mutex;

use crate::domain::AppError;
use crate::ports::CredentialStore;

#[derive(Default)]
pub struct MemoryCredentialStore {
    key: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn with_key(key: &str) -> Self {
        Self { key: Mutex::new(Some(key.to_string())) }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load_api_key(&self) -> Result<Option<String>, AppError> {
        Ok(self.key.lock().unwrap().clone())
    }

    fn save_api_key(&self, key: &str) -> Result<(), AppError> {
        *self.key.lock().unwrap() = Some(key.to_string());
        Ok(())
    }
}
