//! Rewrites a lesson plan into the master lesson format.

use crate::app::Pipeline;
use crate::domain::request::validate_grade;
use crate::domain::{AppError, Generated, LessonArtifact, LessonKind};
use crate::ports::CompletionClient;

const ENHANCE_MAX_TOKENS: u32 = 3000;

/// Re-prompt the model to restructure `lesson` into the seven-part format.
///
/// A lesson whose generation already failed is returned unchanged without a
/// request. When the rewrite fails the original lesson comes back tagged
/// degraded.
pub fn execute<C: CompletionClient>(
    ctx: &Pipeline<C>,
    lesson: &LessonArtifact,
    topic: &str,
    grade: i64,
) -> Result<Generated<LessonArtifact>, AppError> {
    let grade = validate_grade(grade)?;

    if lesson.is_error() {
        tracing::warn!("lesson plan generation failed earlier, skipping enhancement");
        return Ok(Generated::failed(
            lesson.clone(),
            "Lesson plan generation failed; enhancement skipped.",
        ));
    }

    let prompt = ctx.prompts().enhance(&lesson.body, topic, grade)?;
    match ctx.complete(prompt, &ctx.settings().model, ENHANCE_MAX_TOKENS, false) {
        Ok(body) => Ok(Generated::ok(lesson.with_body(body, LessonKind::Enhanced))),
        Err(err) => {
            tracing::warn!(error = %err, "enhancement failed, keeping original lesson plan");
            Ok(Generated::degraded(
                lesson.clone(),
                format!("Enhancement failed ({}); showing the original lesson plan.", err),
            ))
        }
    }
}
