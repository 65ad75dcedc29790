//! Topic research stage.

use crate::app::Pipeline;
use crate::domain::{AppError, GenerationRequest, Generated, ResearchBatch, parse_research};
use crate::ports::CompletionClient;

const RESEARCH_MAX_TOKENS: u32 = 4000;

/// Ask `request.model` for candidate topics for the requested grade and curriculum.
///
/// An invalid grade is an error and no request is sent. A failed request or an
/// unusable reply yields the fallback batch tagged degraded.
pub fn execute<C: CompletionClient>(
    ctx: &Pipeline<C>,
    request: &GenerationRequest,
) -> Result<Generated<ResearchBatch>, AppError> {
    let grade = request.validate_grade()?;
    tracing::debug!(
        grade,
        curriculum = %request.curriculum,
        model = %request.model,
        "researching topics"
    );

    let prompt = ctx.prompts().research(grade, &request.curriculum)?;
    let raw = match ctx.complete(prompt, &request.model, RESEARCH_MAX_TOKENS, true) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(error = %err, "research request failed, using fallback topics");
            return Ok(Generated::degraded(
                ResearchBatch::fallback(),
                format!("Research request failed ({}); using default topics.", err),
            ));
        }
    };

    let parsed = parse_research(&raw);
    if let Some(reason) = parsed.reason {
        tracing::warn!(error = %reason, "research reply unusable, using fallback topics");
        return Ok(Generated::degraded(
            parsed.batch,
            format!("{}; using default topics.", reason),
        ));
    }

    Ok(Generated::ok(parsed.batch))
}
