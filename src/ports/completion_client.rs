//! Completion service port definition.

use crate::domain::AppError;

/// One chat-completion call: a system role message and a user prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_message: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Ask the service for a JSON object reply.
    pub structured_output: bool,
}

/// Port for text completion.
pub trait CompletionClient {
    /// Send one request and return the reply text.
    fn complete(&self, request: &CompletionRequest) -> Result<String, AppError>;
}

impl<C: CompletionClient + ?Sized> CompletionClient for std::sync::Arc<C> {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AppError> {
        (**self).complete(request)
    }
}
