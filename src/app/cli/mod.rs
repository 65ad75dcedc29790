//! CLI Adapter.

mod documents;
mod generate;
mod prompt;
mod wizard;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::app::api;
use crate::domain::{AppConfig, AppError, ArtifactKind, Difficulty, Generated, GenerationStatus};

const LOG_ENV: &str = "MATHPLAN_LOG";

#[derive(Parser)]
#[command(name = "mathplan")]
#[command(version)]
#[command(
    about = "Generate elementary mathematics lesson plans and worksheets",
    long_about = None
)]
struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Only show errors in logs
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Configuration file (defaults to ./mathplan.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Chat model for every stage, overriding both configured models
    #[arg(long, global = true)]
    model: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

/// Global options shared by every command.
#[derive(Debug, Clone, Copy)]
struct Session<'a> {
    config: Option<&'a Path>,
    model: Option<&'a str>,
}

impl Session<'_> {
    /// Load the configuration and apply the `--model` override.
    fn load_config(&self) -> Result<AppConfig, AppError> {
        let mut config = api::load_app_config(self.config)?;
        if let Some(model) = self.model {
            config.completion.use_model(model);
            config.completion.validate()?;
        }
        Ok(config)
    }
}

/// Grade level and curriculum shared by the generation commands.
#[derive(Args, Debug, Clone)]
struct ClassArgs {
    /// Grade level (1-5)
    #[arg(short, long, allow_negative_numbers = true)]
    grade: i64,
    /// Curriculum standard to align with
    #[arg(short, long, default_value = "US Common Core")]
    curriculum: String,
}

/// PDF destination flags.
#[derive(Args, Debug, Clone, Default)]
struct OutputArgs {
    /// Write a PDF to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Place the PDF in ~/Desktop
    #[arg(long)]
    desktop: bool,
}

impl OutputArgs {
    fn requested(&self) -> bool {
        self.output.is_some() || self.desktop
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest topics for a grade and curriculum
    #[clap(visible_alias = "rs")]
    Research {
        #[command(flatten)]
        class: ClassArgs,
    },
    /// Research, pick a topic and generate a complete lesson plan
    #[clap(visible_alias = "p")]
    Plan {
        #[command(flatten)]
        class: ClassArgs,
        /// Class duration, e.g. "45 minutes"
        #[arg(short, long, default_value = "45 minutes")]
        duration: String,
        /// Topic number from the research list (1-based)
        #[arg(
            short,
            long,
            default_value_t = 1,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        topic: u64,
        /// Also print the summary plan
        #[arg(long)]
        summary: bool,
        /// Skip the master-format rewrite
        #[arg(long)]
        no_enhance: bool,
        /// Reference documents (.txt, .pdf, .docx) to draw context from
        #[arg(short, long = "reference")]
        references: Vec<PathBuf>,
        /// Also generate a worksheet at this difficulty (easy, medium, hard, mixed)
        #[arg(short, long)]
        worksheet: Option<Difficulty>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Step through research, planning, worksheets and export interactively
    #[clap(visible_alias = "w")]
    Wizard,
    /// Generate a worksheet aligned with an existing lesson plan
    #[clap(visible_alias = "ws")]
    Worksheet {
        /// Text file holding the lesson plan
        #[arg(short, long)]
        lesson: PathBuf,
        /// Learning outcome the worksheet practises
        #[arg(long)]
        outcome: String,
        /// Difficulty: easy, medium, hard or mixed
        #[arg(short, long, default_value = "mixed")]
        difficulty: Difficulty,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Revise a lesson plan or worksheet using feedback
    #[clap(visible_alias = "rf")]
    Refine {
        /// Text file holding the artifact to revise
        input: PathBuf,
        /// What to change
        #[arg(short, long)]
        feedback: String,
        /// Kind of artifact
        #[arg(short, long, value_enum, default_value_t = RefineKind::LessonPlan)]
        kind: RefineKind,
        /// Write the revised text to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export a text file to PDF
    #[clap(visible_alias = "x")]
    Export {
        /// Text file to export
        input: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
        /// Title drawn on the first page
        #[arg(long)]
        title: Option<String>,
    },
    /// Save the OpenAI API key to ./.env
    Configure {
        /// Key to save; prompted for when omitted
        #[arg(long)]
        key: Option<String>,
    },
    /// Import reference documents and preview the context they provide
    #[clap(visible_alias = "d")]
    Documents {
        /// Files to import (.txt, .pdf, .docx)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Query used to select relevant paragraphs
        #[arg(long)]
        query: Option<String>,
        /// Token budget for the selected context
        #[arg(long, default_value_t = 2000)]
        max_tokens: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RefineKind {
    LessonPlan,
    Worksheet,
}

impl From<RefineKind> for ArtifactKind {
    fn from(kind: RefineKind) -> Self {
        match kind {
            RefineKind::LessonPlan => ArtifactKind::LessonPlan,
            RefineKind::Worksheet => ArtifactKind::Worksheet,
        }
    }
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let session = Session { config: cli.config.as_deref(), model: cli.model.as_deref() };
    let result: Result<i32, AppError> = match cli.command {
        Commands::Research { class } => generate::run_research(session, &class).map(|_| 0),
        Commands::Plan {
            class,
            duration,
            topic,
            summary,
            no_enhance,
            references,
            worksheet,
            output,
        } => generate::run_plan(
            session,
            generate::PlanArgs {
                class,
                duration,
                topic: topic as usize,
                summary,
                enhance: !no_enhance,
                references,
                worksheet,
                output,
            },
        ),
        Commands::Wizard => wizard::run_wizard(session).map(|_| 0),
        Commands::Worksheet { lesson, outcome, difficulty, output } => {
            generate::run_worksheet(session, &lesson, &outcome, difficulty, &output)
        }
        Commands::Refine { input, feedback, kind, output } => {
            generate::run_refine(session, &input, &feedback, kind.into(), output.as_deref())
        }
        Commands::Export { input, output, title } => {
            generate::run_export(session, &input, &output, title).map(|_| 0)
        }
        Commands::Configure { key } => run_configure(key).map(|_| 0),
        Commands::Documents { files, query, max_tokens } => {
            documents::run_documents(&files, query.as_deref(), max_tokens).map(|_| 0)
        }
    };

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // A subscriber may already be installed when embedded in another binary.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_configure(key: Option<String>) -> Result<(), AppError> {
    let key = match key {
        Some(key) => key,
        None => match prompt::api_key()? {
            Some(key) => key,
            None => return Ok(()),
        },
    };
    if key.trim().is_empty() {
        return Err(AppError::config_error("API key must not be empty"));
    }

    let store = api::credential_store();
    crate::ports::CredentialStore::save_api_key(&store, &key)?;
    println!("✅ Saved API key to {}", store.path().display());
    Ok(())
}

/// Print the degradation note of a stage result, if any.
fn report<T>(stage: &str, result: &Generated<T>) {
    match (result.status, result.note.as_deref()) {
        (GenerationStatus::Ok, _) | (_, None) => {}
        (GenerationStatus::Degraded, Some(note)) => println!("⚠️  {}: {}", stage, note),
        (GenerationStatus::Failed, Some(note)) => println!("❌ {} failed: {}", stage, note),
    }
}
