pub mod configuration;
pub mod document;
pub mod error;
pub mod generated;
pub mod lesson;
pub mod pdf_layout;
pub mod prompt;
pub mod request;
pub mod research_parse;
pub mod time_allocation;
pub mod topic;

pub use configuration::{AppConfig, CompletionConfig, ExportConfig, MODEL_CHOICES};
pub use document::{DocumentKind, DocumentSummary, UploadedDocument, select_relevant_context};
pub use error::AppError;
pub use generated::{GenerationStatus, Generated};
pub use lesson::{
    ArtifactKind, Difficulty, LESSON_ERROR_PREFIX, LessonArtifact, LessonKind,
    WORKSHEET_ERROR_PREFIX, WorksheetArtifact,
};
pub use prompt::{LessonPlanInputs, PromptBuilder, StagePrompt};
pub use request::{GenerationRequest, ValidatedRequest};
pub use research_parse::{ParsedResearch, parse_research};
pub use time_allocation::{LessonSection, TimeAllocation};
pub use topic::{ResearchBatch, TopicCandidate, TopicContext};
