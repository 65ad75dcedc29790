//! Application configuration models.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;

/// Chat models offered by the interactive front end, with a short description each.
pub const MODEL_CHOICES: [(&str, &str); 5] = [
    ("gpt-3.5-turbo", "Fast, efficient, good balance (4K context)"),
    ("gpt-3.5-turbo-16k", "Extended context for longer tasks (16K)"),
    ("gpt-4o", "Latest GPT-4 model, best quality, JSON support"),
    ("gpt-4", "High quality for complex tasks"),
    ("gpt-4-turbo", "Fast GPT-4 with JSON support"),
];

/// Configuration loaded from `mathplan.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Completion service configuration.
    #[serde(default)]
    pub completion: CompletionConfig,
    /// PDF export configuration.
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.completion.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

/// Completion service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionConfig {
    /// Chat-completions endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: Url,
    /// Model used for plan, enhancement, worksheet and refinement stages.
    #[serde(default = "default_model")]
    pub model: String,
    /// Model used for the research stage, which needs a larger context window.
    #[serde(default = "default_research_model")]
    pub research_model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum attempts per completion call.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay between retries in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            research_model: default_research_model(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            temperature: default_temperature(),
        }
    }
}

impl CompletionConfig {
    /// Use one model for every stage, research included.
    pub fn use_model(&mut self, model: &str) {
        self.model = model.to_string();
        self.research_model = model.to_string();
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidConfig("timeout_secs must be greater than 0".to_string()));
        }
        if self.max_retries == 0 {
            return Err(AppError::InvalidConfig("max_retries must be greater than 0".to_string()));
        }
        if self.retry_delay_ms == 0 {
            return Err(AppError::InvalidConfig(
                "retry_delay_ms must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(AppError::InvalidConfig(format!(
                "temperature must be between 0 and 1 (got {})",
                self.temperature
            )));
        }
        if self.model.trim().is_empty() || self.research_model.trim().is_empty() {
            return Err(AppError::InvalidConfig("model names must not be empty".to_string()));
        }
        Ok(())
    }
}

fn default_api_url() -> Url {
    Url::parse("https://api.openai.com/v1/chat/completions")
        .expect("Default API URL must be valid")
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_research_model() -> String {
    "gpt-3.5-turbo-16k".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

/// PDF export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// File name used when no output path is given.
    #[serde(default = "default_filename")]
    pub default_filename: String,
    /// Title line drawn at the top of the first page.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { default_filename: default_filename(), title: default_title() }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.default_filename.trim().is_empty() {
            return Err(AppError::InvalidConfig("default_filename must not be empty".to_string()));
        }
        Ok(())
    }
}

fn default_filename() -> String {
    "lesson_plan.pdf".to_string()
}

fn default_title() -> String {
    "Educational Content".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn use_model_covers_research_too() {
        let mut config = CompletionConfig::default();
        config.use_model("gpt-4o");

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.research_model, "gpt-4o");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_models_are_offered() {
        let config = CompletionConfig::default();
        let offered: Vec<&str> = MODEL_CHOICES.iter().map(|(name, _)| *name).collect();

        assert!(offered.contains(&config.model.as_str()));
        assert!(offered.contains(&config.research_model.as_str()));
    }
}
