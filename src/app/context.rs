use crate::adapters::catalogs::read_prompt_template;
use crate::domain::{AppError, CompletionConfig, PromptBuilder, StagePrompt};
use crate::ports::{CompletionClient, CompletionRequest};

/// Dependencies shared by every pipeline stage.
pub struct Pipeline<C: CompletionClient> {
    client: C,
    settings: CompletionConfig,
    prompts: PromptBuilder,
}

impl<C: CompletionClient> Pipeline<C> {
    /// Create a pipeline that renders prompts from the embedded template catalog.
    pub fn new(client: C, settings: CompletionConfig) -> Self {
        Self { client, settings, prompts: PromptBuilder::new(read_prompt_template) }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn settings(&self) -> &CompletionConfig {
        &self.settings
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Send a rendered stage prompt with the configured temperature.
    pub(crate) fn complete(
        &self,
        prompt: StagePrompt,
        model: &str,
        max_tokens: u32,
        structured_output: bool,
    ) -> Result<String, AppError> {
        let request = CompletionRequest {
            model: model.to_string(),
            system_message: prompt.system.to_string(),
            user_prompt: prompt.user,
            max_tokens,
            temperature: self.settings.temperature,
            structured_output,
        };
        tracing::debug!(
            model,
            max_tokens,
            prompt_chars = request.user_prompt.len(),
            "sending completion request"
        );
        self.client.complete(&request)
    }
}
