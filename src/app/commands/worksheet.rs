//! Worksheet generation aligned with a lesson plan.

use crate::app::Pipeline;
use crate::domain::{
    AppError, Difficulty, Generated, LessonArtifact, TopicCandidate, WORKSHEET_ERROR_PREFIX,
    WorksheetArtifact,
};
use crate::ports::CompletionClient;

const WORKSHEET_MAX_TOKENS: u32 = 2000;

/// Generate a worksheet for `topic` at `difficulty`, aligned with `lesson`.
///
/// A lesson whose generation failed is not quoted in the prompt. A failed
/// completion yields a body starting with [`WORKSHEET_ERROR_PREFIX`], tagged
/// failed.
pub fn execute<C: CompletionClient>(
    ctx: &Pipeline<C>,
    topic: &TopicCandidate,
    context: &str,
    lesson: &LessonArtifact,
    difficulty: Difficulty,
) -> Result<Generated<WorksheetArtifact>, AppError> {
    tracing::debug!(topic = %topic.title, %difficulty, "generating worksheet");

    let aligned = (!lesson.is_error()).then_some(lesson.body.as_str());
    let prompt = ctx.prompts().worksheet(topic.outcome_or_title(), context, aligned, difficulty)?;

    let worksheet =
        |body: String| WorksheetArtifact { body, difficulty, aligned_lesson: lesson.clone() };

    match ctx.complete(prompt, &ctx.settings().model, WORKSHEET_MAX_TOKENS, false) {
        Ok(body) => Ok(Generated::ok(worksheet(body))),
        Err(err) => {
            tracing::warn!(error = %err, "worksheet generation failed");
            Ok(Generated::failed(
                worksheet(format!("{} {}", WORKSHEET_ERROR_PREFIX, err)),
                err.to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{
        CompletionConfig, GenerationStatus, LESSON_ERROR_PREFIX, LessonKind, ResearchBatch,
    };
    use crate::testing::FakeCompletionClient;

    fn lesson(body: &str) -> LessonArtifact {
        LessonArtifact {
            body: body.to_string(),
            source_topic: ResearchBatch::fallback().topics.remove(0),
            duration_minutes: 45,
            section_time_allocations: BTreeMap::new(),
            kind: LessonKind::Enhanced,
        }
    }

    #[test]
    fn worksheet_quotes_lesson_and_difficulty() {
        let ctx = Pipeline::new(
            FakeCompletionClient::with_replies(["Worksheet: 34 + 67"]),
            CompletionConfig::default(),
        );
        let topic = ResearchBatch::fallback().topics.remove(0);
        let lesson = lesson("I Do: model 34 + 67 on the board");

        let context = topic.context_block();
        let result = execute(&ctx, &topic, &context, &lesson, Difficulty::Easy).unwrap();

        assert!(result.is_ok());
        assert_eq!(result.value.body, "Worksheet: 34 + 67");
        assert_eq!(result.value.difficulty, Difficulty::Easy);
        assert_eq!(result.value.aligned_lesson, lesson);

        let sent = &ctx.client().requests()[0];
        assert_eq!(sent.max_tokens, 2000);
        assert!(sent.user_prompt.contains("Add two-digit numbers"));
        assert!(sent.user_prompt.contains("I Do: model 34 + 67 on the board"));
        assert!(sent.user_prompt.contains("DIFFICULTY LEVEL: EASY"));
    }

    #[test]
    fn failed_lesson_is_not_quoted() {
        let ctx =
            Pipeline::new(FakeCompletionClient::with_replies(["ok"]), CompletionConfig::default());
        let topic = ResearchBatch::fallback().topics.remove(0);
        let lesson = lesson(&format!("{} offline", LESSON_ERROR_PREFIX));

        execute(&ctx, &topic, "", &lesson, Difficulty::Mixed).unwrap();

        assert!(!ctx.client().requests()[0].user_prompt.contains("offline"));
    }

    #[test]
    fn failure_yields_error_body() {
        let ctx = Pipeline::new(FakeCompletionClient::new(), CompletionConfig::default());
        let topic = ResearchBatch::fallback().topics.remove(1);

        let result = execute(&ctx, &topic, "", &lesson("body"), Difficulty::Hard).unwrap();

        assert_eq!(result.status, GenerationStatus::Failed);
        assert!(result.value.is_error());
        assert!(result.value.body.starts_with("Error generating worksheet: "));
    }
}
