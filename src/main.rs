//! CLI entry point for the GPA grader.
//!
//! Provides subcommands for grading a single submission, rendering its report,
//! and grading a CSV batch of students.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gpa_grader::{
    config::Settings,
    grading::{GradeEngine, StudentSubmission},
    output::{print_pretty, write_json, write_text_file},
    service::{GradeService, bulk_upload, report},
    store::CsvResultStore,
};
use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gpa_grader")]
#[command(about = "Compute GPAs and degree classifications from course scores", long_about = None)]
struct Cli {
    /// CSV file that computed results are appended to [env: GPA_RESULTS_PATH]
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    /// JSON grading scale to use instead of the built-in 5.0 scale [env: GPA_SCALE_PATH]
    #[arg(long, global = true, value_name = "PATH")]
    scale: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade one JSON submission and store the result
    Calculate {
        /// Submission JSON file, or `-` for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
    /// Render the report for one JSON submission
    Report {
        /// Submission JSON file, or `-` for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit positioned lines as JSON instead of plain text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Grade every row of a CSV table (header row required)
    BulkUpload {
        /// CSV file, or `-` for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let mut settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = settings
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"))
        .to_path_buf();
    let log_file_name = settings
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("gpa_grader.log"))
        .to_os_string();

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    if let Some(store) = cli.store {
        settings.results_path = store;
    }
    if let Some(scale) = cli.scale {
        settings.scale_path = Some(scale);
    }
    print_pretty(&settings);

    let engine = GradeEngine::new(settings.grading_scale()?);

    match cli.command {
        Commands::Calculate { input } => {
            let submission = read_submission(&input)?;
            let store = CsvResultStore::open(&settings.results_path).with_context(|| {
                format!(
                    "Failed to open result store: {}",
                    settings.results_path.display()
                )
            })?;
            let mut service = GradeService::new(engine, store);

            let response = service.calculate(&submission)?;
            write_json(std::io::stdout().lock(), &response)?;
        }
        Commands::Report {
            input,
            output,
            json,
        } => {
            let submission = read_submission(&input)?;
            let report = report(&engine, &submission)?;

            let rendered = if json {
                serde_json::to_string_pretty(&report)? + "\n"
            } else {
                report.to_string()
            };

            match output {
                Some(path) => write_text_file(&path, &rendered)?,
                None => print!("{rendered}"),
            }
        }
        Commands::BulkUpload { input } => {
            let bytes = read_input(&input)?;
            let response = bulk_upload(&engine, bytes.as_slice())?;

            if !response.failures.is_empty() {
                warn!(
                    failures = response.failures.len(),
                    "Some rows could not be graded"
                );
            }
            info!(results = response.results.len(), "Bulk upload graded");

            write_json(std::io::stdout().lock(), &response)?;
        }
    }

    Ok(())
}

/// Reads a file, or stdin when the path is `-`.
#[tracing::instrument(fields(source = %path.display()))]
fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin().lock().read_to_end(&mut bytes)?;
        Ok(bytes)
    } else {
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn read_submission(path: &Path) -> Result<StudentSubmission> {
    let bytes = read_input(path)?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("Invalid submission JSON: {}", path.display()))
}
