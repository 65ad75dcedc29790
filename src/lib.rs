//! mathplan: research topics, generate lesson plans and worksheets for
//! elementary mathematics, and export them to PDF.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use adapters::memory_document_store::MemoryDocumentStore;
pub use app::Pipeline;
pub use app::api::{
    ExportTarget, HttpPipeline, PlanInput, connect, credential_store, enhance, export_pdf,
    generate_plan, generate_worksheet, load_app_config, refine, research, select,
};
pub use domain::{
    AppConfig, AppError, ArtifactKind, CompletionConfig, Difficulty, ExportConfig,
    GenerationRequest, GenerationStatus, Generated, LessonArtifact, LessonKind, LessonSection,
    ResearchBatch, TimeAllocation, TopicCandidate, TopicContext, WorksheetArtifact,
};
pub use ports::{CompletionClient, CompletionRequest, CredentialStore};
