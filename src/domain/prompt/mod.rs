pub mod builders;
pub mod template;

pub use builders::{
    CatalogReader, EXCERPT_CHAR_BUDGET, LessonPlanInputs, PromptBuilder, StagePrompt,
    truncate_chars,
};
pub use template::{MinijinjaRenderer, PromptContext, TemplateRenderer};
