//! Per-stage prompt construction.
//!
//! Each builder embeds every input value verbatim. Only lesson-plan and
//! reference-document excerpts are cut to [`EXCERPT_CHAR_BUDGET`] characters.

use crate::domain::{
    AppError, ArtifactKind, Difficulty, TimeAllocation, TopicCandidate, ValidatedRequest,
};

use super::template::{MinijinjaRenderer, PromptContext, TemplateRenderer};

/// Character budget for lesson-plan and reference-document excerpts.
pub const EXCERPT_CHAR_BUDGET: usize = 1500;

pub const RESEARCH_SYSTEM_MESSAGE: &str =
    "You are an expert mathematics curriculum specialist for elementary education.";
pub const LESSON_PLAN_SYSTEM_MESSAGE: &str = "You are an expert mathematics educator with \
    experience in elementary education, cognitive science research, and evidence-based \
    instructional design.";
pub const ENHANCE_SYSTEM_MESSAGE: &str =
    "You are an experienced mathematics teacher for elementary school.";
pub const WORKSHEET_SYSTEM_MESSAGE: &str = "You are an expert mathematics educator specializing \
    in creating aligned worksheets that reinforce classroom lessons exactly as they were taught.";
const REFINE_LESSON_SYSTEM_MESSAGE: &str =
    "You are an expert educator specializing in improving lesson plans based on teacher feedback.";
const REFINE_WORKSHEET_SYSTEM_MESSAGE: &str = "You are an expert educator specializing in \
    improving educational worksheets based on feedback.";

const SUMMARY_INSTRUCTION: &str =
    "\n\nNow summarize the lesson plan into 1-2 sentences for each section.";

const RESEARCH_TEMPLATE: &str = "research.j2";
const LESSON_PLAN_TEMPLATE: &str = "lesson_plan.j2";
const ENHANCE_TEMPLATE: &str = "enhance.j2";
const WORKSHEET_TEMPLATE: &str = "worksheet.j2";
const REFINE_TEMPLATE: &str = "refine.j2";

/// Reads a template by file name from a catalog.
pub type CatalogReader = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// System and user messages for one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePrompt {
    pub system: &'static str,
    pub user: String,
}

/// Inputs for a lesson-plan prompt.
#[derive(Debug, Clone)]
pub struct LessonPlanInputs<'a> {
    pub request: &'a ValidatedRequest,
    pub topic: &'a TopicCandidate,
    /// Rendered topic context block.
    pub context: &'a str,
    /// Reference-document excerpt; may be empty.
    pub reference: &'a str,
    pub allocation: &'a TimeAllocation,
    pub summary_only: bool,
}

/// Renders stage prompts from catalog templates.
pub struct PromptBuilder {
    catalog: CatalogReader,
    renderer: MinijinjaRenderer,
}

impl std::fmt::Debug for PromptBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptBuilder").finish_non_exhaustive()
    }
}

impl PromptBuilder {
    pub fn new<R>(catalog: R) -> Self
    where
        R: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self { catalog: Box::new(catalog), renderer: MinijinjaRenderer }
    }

    fn render(&self, name: &str, context: &PromptContext) -> Result<String, AppError> {
        let template = (self.catalog)(name).ok_or_else(|| AppError::PromptRender {
            template: name.to_string(),
            reason: "template not found in catalog".to_string(),
        })?;
        self.renderer.render(&template, context, name)
    }

    pub fn research(&self, grade: u8, curriculum: &str) -> Result<StagePrompt, AppError> {
        let context = PromptContext::new()
            .with_var("grade", grade.to_string())
            .with_var("curriculum", curriculum);
        let user = self.render(RESEARCH_TEMPLATE, &context)?;
        Ok(StagePrompt { system: RESEARCH_SYSTEM_MESSAGE, user })
    }

    pub fn lesson_plan(&self, inputs: &LessonPlanInputs<'_>) -> Result<StagePrompt, AppError> {
        let allocation = inputs.allocation;
        let context = PromptContext::new()
            .with_var("grade", inputs.request.grade.to_string())
            .with_var("curriculum", inputs.request.curriculum.as_str())
            .with_var("duration", inputs.request.duration_label.as_str())
            .with_var("topic", inputs.topic.outcome_or_title())
            .with_var("context", inputs.context)
            .with_var("reference", truncate_chars(inputs.reference, EXCERPT_CHAR_BUDGET))
            .with_var("introduction_minutes", allocation.introduction.to_string())
            .with_var("main_activity_minutes", allocation.main_activity.to_string())
            .with_var("practice_minutes", allocation.practice.to_string())
            .with_var("assessment_minutes", allocation.assessment.to_string())
            .with_var("conclusion_minutes", allocation.conclusion.to_string());

        let mut user = self.render(LESSON_PLAN_TEMPLATE, &context)?;
        if inputs.summary_only {
            user.push_str(SUMMARY_INSTRUCTION);
        }
        Ok(StagePrompt { system: LESSON_PLAN_SYSTEM_MESSAGE, user })
    }

    pub fn enhance(
        &self,
        lesson_plan: &str,
        topic: &str,
        grade: u8,
    ) -> Result<StagePrompt, AppError> {
        let context = PromptContext::new()
            .with_var("grade", grade.to_string())
            .with_var("topic", topic)
            .with_var("lesson_plan", lesson_plan);
        let user = self.render(ENHANCE_TEMPLATE, &context)?;
        Ok(StagePrompt { system: ENHANCE_SYSTEM_MESSAGE, user })
    }

    pub fn worksheet(
        &self,
        learning_outcome: &str,
        context: &str,
        lesson_plan: Option<&str>,
        difficulty: Difficulty,
    ) -> Result<StagePrompt, AppError> {
        let excerpt = lesson_plan.map(|body| truncate_chars(body, EXCERPT_CHAR_BUDGET));
        let context = PromptContext::new()
            .with_var("learning_outcome", learning_outcome)
            .with_var("context", context)
            .with_var("lesson_plan", excerpt.unwrap_or_default())
            .with_var("difficulty_label", difficulty.as_str().to_uppercase())
            .with_var("difficulty_instructions", difficulty.instructions());
        let user = self.render(WORKSHEET_TEMPLATE, &context)?;
        Ok(StagePrompt { system: WORKSHEET_SYSTEM_MESSAGE, user })
    }

    pub fn refine(
        &self,
        kind: ArtifactKind,
        original: &str,
        feedback: &str,
    ) -> Result<StagePrompt, AppError> {
        let context = PromptContext::new()
            .with_var("kind", kind.label())
            .with_var("kind_heading", kind.label().to_uppercase())
            .with_var("original", original)
            .with_var("feedback", feedback);
        let user = self.render(REFINE_TEMPLATE, &context)?;
        let system = match kind {
            ArtifactKind::LessonPlan => REFINE_LESSON_SYSTEM_MESSAGE,
            ArtifactKind::Worksheet => REFINE_WORKSHEET_SYSTEM_MESSAGE,
        };
        Ok(StagePrompt { system, user })
    }
}

/// Keep at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
