//! Template rendering for stage prompts.

use std::collections::HashMap;

use minijinja::{Environment, UndefinedBehavior};

use crate::domain::AppError;

/// Variables substituted into a prompt template.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    /// Variable name to value mapping.
    pub variables: HashMap<String, String>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable to the context.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}

/// Trait for rendering templates.
///
/// Keeps the template engine out of the prompt builders.
pub trait TemplateRenderer {
    /// Render `template` with `context`; `template_name` is used for error reporting.
    fn render(
        &self,
        template: &str,
        context: &PromptContext,
        template_name: &str,
    ) -> Result<String, AppError>;
}

/// `minijinja` renderer with strict undefined handling.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinijinjaRenderer;

impl TemplateRenderer for MinijinjaRenderer {
    fn render(
        &self,
        template: &str,
        context: &PromptContext,
        template_name: &str,
    ) -> Result<String, AppError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        env.render_str(template, &context.variables).map_err(|err| AppError::PromptRender {
            template: template_name.to_string(),
            reason: err.to_string(),
        })
    }
}
