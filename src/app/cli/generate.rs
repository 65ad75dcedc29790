//! Non-interactive generation commands.

use std::fs;
use std::path::{Path, PathBuf};

use crate::adapters::memory_document_store::MemoryDocumentStore;
use crate::app::api::{self, ExportTarget, HttpPipeline, PlanInput};
use crate::domain::{
    AppConfig, AppError, ArtifactKind, Difficulty, GenerationRequest, GenerationStatus,
    LessonArtifact, LessonKind, ResearchBatch, TopicCandidate, TopicContext,
};

use super::{ClassArgs, OutputArgs, Session, report};

/// Token budget for reference-document context in the plan prompt.
pub(super) const REFERENCE_MAX_TOKENS: usize = 2000;

pub(super) struct PlanArgs {
    pub class: ClassArgs,
    pub duration: String,
    /// One-based topic number.
    pub topic: usize,
    pub summary: bool,
    pub enhance: bool,
    pub references: Vec<PathBuf>,
    pub worksheet: Option<Difficulty>,
    pub output: OutputArgs,
}

pub(super) fn connect(session: Session<'_>) -> Result<(AppConfig, HttpPipeline), AppError> {
    let config = session.load_config()?;
    let ctx = api::connect(&config.completion, &api::credential_store())?;
    Ok((config, ctx))
}

pub(super) fn print_topics(batch: &ResearchBatch) {
    for (index, topic) in batch.topics.iter().enumerate() {
        println!("{}. {}", index + 1, topic.title);
        if !topic.description.is_empty() {
            println!("   {}", topic.description);
        }
        if !topic.learning_outcome.is_empty() {
            println!("   Outcome: {}", topic.learning_outcome);
        }
    }
}

pub(super) fn print_section(heading: &str, body: &str) {
    println!("\n=== {} ===\n", heading);
    println!("{}", body);
}

/// Text written to the PDF: the lesson, followed by the worksheet when present.
pub(super) fn export_text(lesson: &str, worksheet: Option<&str>) -> String {
    match worksheet {
        Some(worksheet) => format!("{}\n\nWORKSHEET\n\n{}", lesson, worksheet),
        None => lesson.to_string(),
    }
}

pub(super) fn export(config: &AppConfig, text: &str, output: &OutputArgs) -> Result<(), AppError> {
    let target = ExportTarget { path: output.output.clone(), desktop: output.desktop };
    let written = api::export_pdf(text, &target, &config.export)?;
    println!("✅ Saved PDF to {}", written.display());
    Ok(())
}

/// Research request for the same class, addressed to the research model.
pub(super) fn research_request(
    config: &AppConfig,
    request: &GenerationRequest,
) -> GenerationRequest {
    GenerationRequest { model: config.completion.research_model.clone(), ..request.clone() }
}

pub(super) fn run_research(session: Session<'_>, class: &ClassArgs) -> Result<(), AppError> {
    let (config, ctx) = connect(session)?;
    let request = GenerationRequest::new(
        class.grade,
        &class.curriculum,
        "",
        &config.completion.research_model,
    );

    let research = api::research(&ctx, &request)?;
    report("Research", &research);
    print_topics(&research.value);
    Ok(())
}

pub(super) fn run_plan(session: Session<'_>, args: PlanArgs) -> Result<i32, AppError> {
    let (config, ctx) = connect(session)?;
    let request = GenerationRequest::new(
        args.class.grade,
        &args.class.curriculum,
        &args.duration,
        &config.completion.model,
    );
    request.validate()?;

    let documents = MemoryDocumentStore::new();
    for path in &args.references {
        documents.import(path)?;
    }

    let research = api::research(&ctx, &research_request(&config, &request))?;
    report("Research", &research);
    let topic = api::select(&research.value, args.topic - 1)?.clone();
    println!("📘 Topic: {}", topic.title);

    let context = topic.context_block();
    let query = format!("{} {}", topic.title, topic.outcome_or_title());
    let reference = documents.context(&query, None, REFERENCE_MAX_TOKENS);
    let input = PlanInput {
        topic: &topic,
        request: &request,
        context: &context,
        reference: &reference,
        summary_only: false,
    };

    if args.summary {
        let summary = api::generate_plan(&ctx, PlanInput { summary_only: true, ..input })?;
        report("Summary", &summary);
        print_section("LESSON SUMMARY", &summary.value.body);
    }

    let full = api::generate_plan(&ctx, input)?;
    report("Lesson plan", &full);
    if full.status == GenerationStatus::Failed {
        print_section("LESSON PLAN", &full.value.body);
        return Ok(1);
    }

    let lesson = if args.enhance {
        let enhanced =
            api::enhance(&ctx, &full.value, topic.outcome_or_title(), args.class.grade)?;
        report("Enhancement", &enhanced);
        enhanced.into_value()
    } else {
        full.into_value()
    };
    print_section("LESSON PLAN", &lesson.body);

    let mut worksheet_body = None;
    if let Some(difficulty) = args.worksheet {
        let worksheet = api::generate_worksheet(&ctx, &topic, &context, &lesson, difficulty)?;
        report("Worksheet", &worksheet);
        print_section("WORKSHEET", &worksheet.value.body);
        if worksheet.status == GenerationStatus::Failed {
            return Ok(1);
        }
        worksheet_body = Some(worksheet.value.body);
    }

    if args.output.requested() {
        export(&config, &export_text(&lesson.body, worksheet_body.as_deref()), &args.output)?;
    }
    Ok(0)
}

pub(super) fn run_worksheet(
    session: Session<'_>,
    lesson_path: &Path,
    outcome: &str,
    difficulty: Difficulty,
    output: &OutputArgs,
) -> Result<i32, AppError> {
    let body = fs::read_to_string(lesson_path)?;
    let (config, ctx) = connect(session)?;

    let topic = TopicCandidate {
        title: outcome.to_string(),
        description: String::new(),
        learning_outcome: outcome.to_string(),
        context: TopicContext::default(),
    };
    let lesson = LessonArtifact {
        body,
        source_topic: topic.clone(),
        duration_minutes: 0,
        section_time_allocations: Default::default(),
        kind: LessonKind::Full,
    };

    let worksheet = api::generate_worksheet(&ctx, &topic, "", &lesson, difficulty)?;
    report("Worksheet", &worksheet);
    print_section("WORKSHEET", &worksheet.value.body);
    if !worksheet.is_ok() {
        return Ok(1);
    }

    if output.requested() {
        export(&config, &worksheet.value.body, output)?;
    }
    Ok(0)
}

pub(super) fn run_refine(
    session: Session<'_>,
    input: &Path,
    feedback: &str,
    kind: ArtifactKind,
    output: Option<&Path>,
) -> Result<i32, AppError> {
    let body = fs::read_to_string(input)?;
    let (_, ctx) = connect(session)?;

    let revised = api::refine(&ctx, &body, feedback, kind)?;
    report("Refinement", &revised);
    if !revised.is_ok() {
        println!("{}", revised.value);
        return Ok(1);
    }

    match output {
        Some(path) => {
            fs::write(path, &revised.value)?;
            println!("✅ Saved revised {} to {}", kind.label(), path.display());
        }
        None => println!("{}", revised.value),
    }
    Ok(0)
}

pub(super) fn run_export(
    session: Session<'_>,
    input: &Path,
    output: &OutputArgs,
    title: Option<String>,
) -> Result<(), AppError> {
    let mut config = session.load_config()?;
    if let Some(title) = title {
        config.export.title = title;
    }
    let text = fs::read_to_string(input)?;
    export(&config, &text, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_text_appends_worksheet() {
        assert_eq!(export_text("Lesson", None), "Lesson");
        assert_eq!(export_text("Lesson", Some("Q1")), "Lesson\n\nWORKSHEET\n\nQ1");
    }

    #[test]
    fn research_request_keeps_class_and_swaps_model() {
        let config = AppConfig::default();
        let request = GenerationRequest::new(4, "Indian NCERT", "60 minutes", "gpt-3.5-turbo");

        let research = research_request(&config, &request);

        assert_eq!(research.model, "gpt-3.5-turbo-16k");
        assert_eq!(research.grade, 4);
        assert_eq!(research.curriculum, "Indian NCERT");
        assert_eq!(research.duration, "60 minutes");
    }
}
