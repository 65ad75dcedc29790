use crate::domain::AppError;

/// Environment variable holding the completion service key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Port for reading and persisting the completion service key.
pub trait CredentialStore {
    /// The stored key, or `None` when neither the environment nor the store holds one.
    fn load_api_key(&self) -> Result<Option<String>, AppError>;

    /// Persist `key` so later runs find it.
    fn save_api_key(&self, key: &str) -> Result<(), AppError>;

    /// The stored key, or `ApiKeyMissing`.
    fn require_api_key(&self) -> Result<String, AppError> {
        self.load_api_key()?.ok_or_else(|| AppError::ApiKeyMissing(API_KEY_VAR.to_string()))
    }
}
