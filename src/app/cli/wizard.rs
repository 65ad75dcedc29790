//! Interactive session: research, plan, refine, worksheet and export.

use std::path::{Path, PathBuf};

use crate::adapters::memory_document_store::MemoryDocumentStore;
use crate::app::api::{self, HttpPipeline, PlanInput};
use crate::domain::request::{MAX_GRADE, MIN_GRADE};
use crate::domain::{
    AppConfig, AppError, ArtifactKind, Difficulty, GenerationRequest, GenerationStatus,
    LessonArtifact, MODEL_CHOICES, TopicCandidate,
};
use crate::ports::CredentialStore;

use super::generate::{
    REFERENCE_MAX_TOKENS, export_text, print_section, print_topics, research_request,
};
use super::{OutputArgs, Session, prompt, report};

/// Presets end with an "Other" entry that asks for free text.
const CURRICULA: [&str; 4] = ["UK NCETM", "US Common Core", "Indian NCERT", "Other"];
const DURATIONS: [&str; 4] = ["30 minutes", "45 minutes", "60 minutes", "Other"];

const REVIEW: [&str; 4] =
    ["Generate the full lesson plan", "Choose a different topic", "Start over", "Exit"];

const ACTIONS: [&str; 5] =
    ["Refine lesson plan", "Generate worksheet", "Refine worksheet", "Export to PDF", "Finish"];

/// What to do after reviewing a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Review {
    FullPlan,
    OtherTopic,
    StartOver,
    Exit,
}

impl Review {
    fn from_index(index: Option<usize>) -> Self {
        match index {
            Some(0) => Review::FullPlan,
            Some(1) => Review::OtherTopic,
            Some(2) => Review::StartOver,
            _ => Review::Exit,
        }
    }
}

pub(super) fn run_wizard(session: Session<'_>) -> Result<(), AppError> {
    let mut config = session.load_config()?;
    let credentials = api::credential_store();
    if credentials.load_api_key()?.is_none() {
        println!("No OpenAI API key found.");
        let Some(key) = prompt::api_key()? else { return Ok(()) };
        credentials.save_api_key(&key)?;
        println!("✅ Saved API key to {}", credentials.path().display());
    }

    if session.model.is_none() {
        let labels: Vec<String> =
            MODEL_CHOICES.iter().map(|(name, about)| format!("{} ({})", name, about)).collect();
        let default = default_model_index(&config);
        let Some(choice) = prompt::select("Model for topic research", &labels, default)? else {
            return Ok(());
        };
        config.completion.use_model(MODEL_CHOICES[choice].0);
    }
    let ctx = api::connect(&config.completion, &credentials)?;

    let documents = MemoryDocumentStore::new();
    let Some(paths) =
        prompt::optional_text("Reference documents (comma-separated paths, blank to skip)")?
    else {
        return Ok(());
    };
    for path in paths.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match documents.import(Path::new(path)) {
            Ok(id) => println!("✅ Imported {} as {}", path, id),
            Err(err) => println!("⚠️  Skipped {}: {}", path, err),
        }
    }

    'session: loop {
        let Some(request) = class_request(&config)? else { return Ok(()) };

        println!("Researching topics...");
        let research = api::research(&ctx, &research_request(&config, &request))?;
        report("Research", &research);
        print_topics(&research.value);
        let titles: Vec<&str> = research.value.topics.iter().map(|t| t.title.as_str()).collect();

        let mut default_topic = 0;
        loop {
            let Some(index) = prompt::select("Topic", &titles, default_topic)? else {
                return Ok(());
            };
            let topic = api::select(&research.value, index)?.clone();
            let context = topic.context_block();
            let query = format!("{} {}", topic.title, topic.outcome_or_title());
            let reference = documents.context(&query, None, REFERENCE_MAX_TOKENS);
            let input = PlanInput {
                topic: &topic,
                request: &request,
                context: &context,
                reference: &reference,
                summary_only: true,
            };

            let summary = api::generate_plan(&ctx, input)?;
            report("Summary", &summary);
            print_section("LESSON SUMMARY", &summary.value.body);

            match Review::from_index(prompt::select("What next?", &REVIEW, 0)?) {
                Review::FullPlan => {}
                Review::OtherTopic => {
                    default_topic = index;
                    continue;
                }
                Review::StartOver => continue 'session,
                Review::Exit => return Ok(()),
            }

            let full = api::generate_plan(&ctx, PlanInput { summary_only: false, ..input })?;
            report("Lesson plan", &full);
            let outcome = topic.outcome_or_title();
            let enhanced = api::enhance(&ctx, &full.value, outcome, request.grade)?;
            report("Enhancement", &enhanced);
            if enhanced.status == GenerationStatus::Failed {
                print_section("LESSON PLAN", &enhanced.value.body);
                return Ok(());
            }
            let lesson = enhanced.into_value();
            print_section("LESSON PLAN", &lesson.body);
            return follow_up(&ctx, &config, &topic, &context, lesson);
        }
    }
}

/// Ask for grade, curriculum and duration. `None` when the user cancels.
fn class_request(config: &AppConfig) -> Result<Option<GenerationRequest>, AppError> {
    let grades: Vec<String> = (MIN_GRADE..=MAX_GRADE).map(|g| format!("Grade {}", g)).collect();
    let Some(grade_index) = prompt::select("Grade level", &grades, 0)? else { return Ok(None) };
    let Some(curriculum) = preset("Curriculum", &CURRICULA, 1)? else { return Ok(None) };
    let Some(duration) = preset("Class duration", &DURATIONS, 1)? else { return Ok(None) };

    let grade = MIN_GRADE + grade_index as i64;
    let request = GenerationRequest::new(grade, curriculum, duration, &config.completion.model);
    request.validate()?;
    Ok(Some(request))
}

/// Pick one of `presets`, asking for free text when the trailing "Other" is chosen.
fn preset(label: &str, presets: &[&str], default: usize) -> Result<Option<String>, AppError> {
    let Some(index) = prompt::select(label, presets, default)? else { return Ok(None) };
    if let Some(choice) = preset_choice(presets, index) {
        return Ok(Some(choice.to_string()));
    }
    loop {
        let Some(value) = prompt::optional_text(label)? else { return Ok(None) };
        let value = value.trim();
        if !value.is_empty() {
            return Ok(Some(value.to_string()));
        }
        println!("Please enter a value.");
    }
}

/// The preset at `index`, or `None` for the trailing free-text entry.
fn preset_choice<'a>(presets: &[&'a str], index: usize) -> Option<&'a str> {
    (index + 1 < presets.len()).then(|| presets[index])
}

fn default_model_index(config: &AppConfig) -> usize {
    MODEL_CHOICES
        .iter()
        .position(|(name, _)| *name == config.completion.research_model)
        .unwrap_or(0)
}

/// Refinement, worksheet and export loop for a finished lesson plan.
fn follow_up(
    ctx: &HttpPipeline,
    config: &AppConfig,
    topic: &TopicCandidate,
    context: &str,
    mut lesson: LessonArtifact,
) -> Result<(), AppError> {
    let mut worksheet: Option<String> = None;
    loop {
        let Some(action) = prompt::select("Next step", &ACTIONS, 0)? else { return Ok(()) };
        match action {
            0 => {
                let Some(feedback) = prompt::optional_text("Feedback for the lesson plan")? else {
                    continue;
                };
                let revised = api::refine(ctx, &lesson.body, &feedback, ArtifactKind::LessonPlan)?;
                report("Refinement", &revised);
                if revised.is_ok() {
                    lesson.body = revised.into_value();
                    print_section("LESSON PLAN", &lesson.body);
                }
            }
            1 => {
                let labels: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();
                let default = Difficulty::ALL.len() - 1;
                let Some(choice) = prompt::select("Difficulty", &labels, default)? else {
                    continue;
                };
                let difficulty = Difficulty::ALL[choice];
                let generated =
                    api::generate_worksheet(ctx, topic, context, &lesson, difficulty)?;
                report("Worksheet", &generated);
                print_section("WORKSHEET", &generated.value.body);
                if generated.is_ok() {
                    worksheet = Some(generated.value.body);
                }
            }
            2 => {
                let Some(current) = worksheet.as_deref() else {
                    println!("Generate a worksheet first.");
                    continue;
                };
                let Some(feedback) = prompt::optional_text("Feedback for the worksheet")? else {
                    continue;
                };
                let revised = api::refine(ctx, current, &feedback, ArtifactKind::Worksheet)?;
                report("Refinement", &revised);
                if revised.is_ok() {
                    print_section("WORKSHEET", &revised.value);
                    worksheet = Some(revised.into_value());
                }
            }
            3 => {
                let Some(path) = prompt::text("PDF file name", &config.export.default_filename)?
                else {
                    continue;
                };
                let desktop = prompt::confirm("Save to your Desktop?", false)?.unwrap_or(false);
                let output = OutputArgs { output: Some(PathBuf::from(path)), desktop };
                let text = export_text(&lesson.body, worksheet.as_deref());
                if let Err(err) = super::generate::export(config, &text, &output) {
                    println!("❌ {}", err);
                }
            }
            _ => return Ok(()),
        }
    }
}
