//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together configuration,
//! credentials, adapters and the pipeline stages.

use std::path::{Path, PathBuf};

use crate::adapters::completion_client_http::HttpCompletionClient;
use crate::adapters::completion_client_retrying::{RetryPolicy, RetryingCompletionClient};
use crate::adapters::credentials_env_file::{ENV_FILE, EnvFileCredentialStore};
use crate::adapters::pdf_printer::PrintPdfWriter;
use crate::app::Pipeline;
use crate::app::commands::{enhance, export, plan, refine, research, worksheet};
use crate::domain::configuration::{CONFIG_FILE, load_config};
use crate::domain::{
    AppConfig, ArtifactKind, CompletionConfig, Difficulty, ExportConfig, GenerationRequest,
    Generated, LessonArtifact, ResearchBatch, TopicCandidate, WorksheetArtifact,
};
use crate::ports::{CompletionClient, CredentialStore};

pub use crate::app::commands::export::ExportTarget;
pub use crate::app::commands::plan::PlanInput;
pub use crate::domain::AppError;

/// Pipeline backed by the HTTP client with retries.
pub type HttpPipeline = Pipeline<RetryingCompletionClient>;

/// Load `mathplan.toml` from `path`, or from the working directory when `path` is `None`.
///
/// An explicitly named file must exist; the default file is optional.
pub fn load_app_config(path: Option<&Path>) -> Result<AppConfig, AppError> {
    match path {
        Some(path) if !path.exists() => Err(AppError::config_error(format!(
            "Configuration file not found: {}",
            path.display()
        ))),
        Some(path) => load_config(path),
        None => load_config(Path::new(CONFIG_FILE)),
    }
}

/// Credential store reading `OPENAI_API_KEY` from the environment or `./.env`.
pub fn credential_store() -> EnvFileCredentialStore {
    EnvFileCredentialStore::new(ENV_FILE)
}

/// Build a pipeline talking to the configured endpoint.
///
/// Fails with `ApiKeyMissing` when no key is available.
pub fn connect(
    config: &CompletionConfig,
    credentials: &impl CredentialStore,
) -> Result<HttpPipeline, AppError> {
    let api_key = credentials.require_api_key()?;
    let http = HttpCompletionClient::new(api_key, config)?;
    let client = RetryingCompletionClient::new(Box::new(http), RetryPolicy::from_config(config));
    Ok(Pipeline::new(client, config.clone()))
}

/// Research candidate topics.
pub fn research<C: CompletionClient>(
    ctx: &Pipeline<C>,
    request: &GenerationRequest,
) -> Result<Generated<ResearchBatch>, AppError> {
    research::execute(ctx, request)
}

/// Select a topic by zero-based index.
pub fn select(batch: &ResearchBatch, index: usize) -> Result<&TopicCandidate, AppError> {
    batch.select(index)
}

/// Generate a summary or full lesson plan.
pub fn generate_plan<C: CompletionClient>(
    ctx: &Pipeline<C>,
    input: PlanInput<'_>,
) -> Result<Generated<LessonArtifact>, AppError> {
    plan::execute(ctx, input)
}

/// Rewrite a lesson plan into the master lesson format.
pub fn enhance<C: CompletionClient>(
    ctx: &Pipeline<C>,
    lesson: &LessonArtifact,
    topic: &str,
    grade: i64,
) -> Result<Generated<LessonArtifact>, AppError> {
    enhance::execute(ctx, lesson, topic, grade)
}

/// Generate a worksheet aligned with `lesson`.
pub fn generate_worksheet<C: CompletionClient>(
    ctx: &Pipeline<C>,
    topic: &TopicCandidate,
    context: &str,
    lesson: &LessonArtifact,
    difficulty: Difficulty,
) -> Result<Generated<WorksheetArtifact>, AppError> {
    worksheet::execute(ctx, topic, context, lesson, difficulty)
}

/// Revise a lesson plan or worksheet according to teacher feedback.
pub fn refine<C: CompletionClient>(
    ctx: &Pipeline<C>,
    body: &str,
    feedback: &str,
    kind: ArtifactKind,
) -> Result<Generated<String>, AppError> {
    refine::execute(ctx, body, feedback, kind)
}

/// Write `text` to a PDF and return the path written.
pub fn export_pdf(
    text: &str,
    target: &ExportTarget,
    config: &ExportConfig,
) -> Result<PathBuf, AppError> {
    let destination = export::resolve_destination(target, config)?;
    export::execute(&PrintPdfWriter, text, &config.title, &destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryCredentialStore;
    use tempfile::tempdir;

    #[test]
    fn connect_requires_api_key() {
        let err =
            connect(&CompletionConfig::default(), &MemoryCredentialStore::default()).err().unwrap();
        assert!(matches!(err, AppError::ApiKeyMissing(_)));
    }

    #[test]
    fn connect_with_key_builds_pipeline() {
        let credentials = MemoryCredentialStore::with_key("sk-test");
        let ctx = connect(&CompletionConfig::default(), &credentials).unwrap();
        assert_eq!(ctx.settings().max_retries, 3);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(load_app_config(Some(&missing)), Err(AppError::Configuration(_))));
    }

    #[test]
    fn export_pdf_writes_to_explicit_path() {
        let dir = tempdir().unwrap();
        let target = ExportTarget { path: Some(dir.path().join("plan.pdf")), desktop: false };

        let written = export_pdf("Grade 3: Addition", &target, &ExportConfig::default()).unwrap();

        assert!(written.exists());
    }
}
