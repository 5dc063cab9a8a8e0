use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_matcher_lib::core::keyword_matcher;
use resume_matcher_lib::core::models::{
    MatcherSettings, DEFAULT_API_BASE_URL, DEFAULT_MODEL, DEFAULT_TABLE_KEYWORD_LIMIT,
    DEFAULT_TIMEOUT_SECONDS,
};
use resume_matcher_lib::{CoreError, MatchSession, MatcherService};

#[derive(Debug, Parser)]
#[command(
    name = "resume-matcher",
    version,
    about = "Match resumes against a job description with Gemini and a keyword fallback"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score resumes against a job description and print the shortlist
    Match(MatchArgs),
    /// Manage the Gemini API key stored in the OS keychain
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Print the normalized keyword set of a text as JSON
    Tokenize { text: String },
    /// Run the keyword-overlap matcher directly and print JSON
    Fallback {
        #[arg(long)]
        jd_text: String,
        #[arg(long)]
        resume_text: String,
    },
}

#[derive(Debug, Args)]
struct MatchArgs {
    /// Job description file (.txt or .pdf)
    #[arg(long, conflicts_with = "jd_text")]
    jd: Option<PathBuf>,
    /// Job description given inline
    #[arg(long)]
    jd_text: Option<String>,
    /// Resume files (.txt, .pdf, .docx)
    resumes: Vec<PathBuf>,
    /// Write the shortlist as CSV to this path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print each candidate's extracted resume text after the table
    #[arg(long)]
    show_text: bool,
    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Gemini model name
    #[arg(long, env = "RESUME_MATCHER_MODEL", default_value = DEFAULT_MODEL)]
    model: String,
    #[arg(long, env = "RESUME_MATCHER_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,
    /// Remote request timeout in seconds
    #[arg(long, env = "RESUME_MATCHER_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    timeout: u64,
    /// Keywords shown per cell in the table
    #[arg(
        long,
        env = "RESUME_MATCHER_TABLE_KEYWORD_LIMIT",
        default_value_t = DEFAULT_TABLE_KEYWORD_LIMIT
    )]
    table_keyword_limit: usize,
}

impl MatchArgs {
    fn settings(&self) -> MatcherSettings {
        MatcherSettings {
            model: self.model.clone(),
            api_base_url: self.api_base_url.clone(),
            request_timeout_seconds: self.timeout,
            table_keyword_limit: self.table_keyword_limit,
        }
    }
}

#[derive(Debug, Subcommand)]
enum KeyAction {
    Save { key: String },
    Clear,
    Status,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("resume_matcher_lib=info,resume_matcher=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(Cli::parse()).await {
        let validation = err
            .downcast_ref::<CoreError>()
            .is_some_and(CoreError::is_validation);
        eprintln!("{err:#}");
        std::process::exit(if validation { 2 } else { 1 });
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Match(args) => run_match(args).await,
        Command::Key { action } => run_key(action),
        Command::Tokenize { text } => {
            let set = keyword_matcher::tokenize(&text);
            println!("{}", serde_json::to_string_pretty(set.as_slice())?);
            Ok(())
        }
        Command::Fallback {
            jd_text,
            resume_text,
        } => {
            let result = keyword_matcher::fallback_match(&jd_text, &resume_text);
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

async fn run_match(args: MatchArgs) -> anyhow::Result<()> {
    let service = MatcherService::new(args.settings());
    let mut session = MatchSession::new();
    if !service.load_api_key(&mut session)? {
        return Err(CoreError::MissingApiKey.into());
    }

    let job_description = match (&args.jd, &args.jd_text) {
        (Some(path), _) => {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read JD file {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|v| v.to_str())
                .unwrap_or_default();
            service.load_job_description(file_name, &bytes)?
        }
        (None, Some(text)) => text.trim().to_string(),
        (None, None) => String::new(),
    };

    let summary = service
        .match_files(&mut session, &job_description, &args.resumes)
        .await?;
    for skipped in &summary.skipped {
        eprintln!("skipped {}: {}", skipped.file_name, skipped.reason);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(session.shortlist())?);
    } else {
        print!("{}", service.render_table(&session));
    }

    if args.show_text {
        for resume in session.resumes() {
            println!("\n=== Resume viewer: {} ===\n{}", resume.file_name, resume.text);
        }
    }

    if let Some(output) = args.output.as_deref() {
        service.export_csv(&session, output).await?;
        info!(path = %output.display(), "CSV written");
    }

    Ok(())
}

fn run_key(action: KeyAction) -> anyhow::Result<()> {
    let service = MatcherService::new(MatcherSettings::default());
    match action {
        KeyAction::Save { key } => {
            let mut session = MatchSession::new();
            service.save_api_key(&mut session, &key)?;
            println!("API key saved locally.");
        }
        KeyAction::Clear => {
            service.clear_api_key()?;
            println!("API key removed.");
        }
        KeyAction::Status => {
            let configured = service.api_key_configured()?;
            println!(
                "{}",
                if configured {
                    "API key configured."
                } else {
                    "No API key configured."
                }
            );
        }
    }
    Ok(())
}
