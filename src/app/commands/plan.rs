//! Lesson plan generation stage.

use crate::app::Pipeline;
use crate::domain::{
    AppError, GenerationRequest, Generated, LESSON_ERROR_PREFIX, LessonArtifact, LessonKind,
    LessonPlanInputs, TimeAllocation, TopicCandidate,
};
use crate::ports::CompletionClient;

const FULL_MAX_TOKENS: u32 = 3500;
const SUMMARY_MAX_TOKENS: u32 = 1000;

/// Inputs for one lesson plan.
#[derive(Debug, Clone, Copy)]
pub struct PlanInput<'a> {
    pub topic: &'a TopicCandidate,
    pub request: &'a GenerationRequest,
    /// Topic context block, usually [`TopicCandidate::context_block`].
    pub context: &'a str,
    /// Excerpt selected from reference documents; empty when none were imported.
    pub reference: &'a str,
    pub summary_only: bool,
}

/// Generate a summary or full lesson plan for the selected topic.
///
/// The request is validated first and nothing is sent when it is invalid. A
/// failed completion yields a lesson whose body starts with
/// [`LESSON_ERROR_PREFIX`], tagged failed.
pub fn execute<C: CompletionClient>(
    ctx: &Pipeline<C>,
    input: PlanInput<'_>,
) -> Result<Generated<LessonArtifact>, AppError> {
    let validated = input.request.validate()?;
    let allocation = TimeAllocation::allocate(validated.duration_minutes);
    let kind = if input.summary_only { LessonKind::Summary } else { LessonKind::Full };
    tracing::debug!(
        topic = %input.topic.title,
        minutes = validated.duration_minutes,
        ?kind,
        "generating lesson plan"
    );

    let prompt = ctx.prompts().lesson_plan(&LessonPlanInputs {
        request: &validated,
        topic: input.topic,
        context: input.context,
        reference: input.reference,
        allocation: &allocation,
        summary_only: input.summary_only,
    })?;
    let max_tokens = if input.summary_only { SUMMARY_MAX_TOKENS } else { FULL_MAX_TOKENS };

    let lesson = |body: String| LessonArtifact {
        body,
        source_topic: input.topic.clone(),
        duration_minutes: validated.duration_minutes,
        section_time_allocations: allocation.as_map(),
        kind,
    };

    match ctx.complete(prompt, &validated.model, max_tokens, false) {
        Ok(body) => Ok(Generated::ok(lesson(body))),
        Err(err) => {
            tracing::warn!(error = %err, "lesson plan generation failed");
            let body = format!("{} {}", LESSON_ERROR_PREFIX, err);
            Ok(Generated::failed(lesson(body), err.to_string()))
        }
    }
}
