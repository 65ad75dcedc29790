//! Feedback-driven revision of a lesson plan or worksheet.

use crate::app::Pipeline;
use crate::domain::{AppError, ArtifactKind, Generated};
use crate::ports::CompletionClient;

fn max_tokens(kind: ArtifactKind) -> u32 {
    match kind {
        ArtifactKind::LessonPlan => 3500,
        ArtifactKind::Worksheet => 2000,
    }
}

/// Revise `body` according to `feedback`.
///
/// A failed completion yields `Error refining <kind>: <reason>`, tagged failed.
pub fn execute<C: CompletionClient>(
    ctx: &Pipeline<C>,
    body: &str,
    feedback: &str,
    kind: ArtifactKind,
) -> Result<Generated<String>, AppError> {
    tracing::debug!(kind = kind.label(), "refining artifact");
    let prompt = ctx.prompts().refine(kind, body, feedback)?;

    match ctx.complete(prompt, &ctx.settings().model, max_tokens(kind), false) {
        Ok(revised) => Ok(Generated::ok(revised)),
        Err(err) => {
            tracing::warn!(error = %err, kind = kind.label(), "refinement failed");
            let body = format!("Error refining {}: {}", kind.label(), err);
            Ok(Generated::failed(body, err.to_string()))
        }
    }
}
