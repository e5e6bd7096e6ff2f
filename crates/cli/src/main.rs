//! stagepipe CLI entry point.
//!
//! Usage:
//!   stagepipe <cmd> [args...] [:: <cmd> [args...]]...
//!
//! Runs the stages as a pipeline, forwards the last stage's output to stdout
//! and writes a JSON report of every stage to stderr.
//!
//! Fatal faults (a stage that cannot start, a failed output copy, an
//! unwritable report, unusable arguments) print a single `stagepipe: <error>`
//! line to stderr, not stdout, in place of the report and exit with 1.
//! Arguments that are not valid UTF-8 are converted lossily before
//! tokenizing.

use clap::error::ErrorKind;
use clap::Parser;
use sp_core::error::PipelineResult;
use sp_core::{report, PipelineEngine};
use sp_protocol::Report;
use std::ffi::OsString;
use std::process::{ExitCode, Stdio};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Run commands as a pipeline and report how every stage exited.
#[derive(Parser, Debug)]
#[command(name = "stagepipe", version, about, long_about = None)]
struct Cli {
    /// Stage command lines, separated by `::` tokens
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "TOKENS",
        value_parser = clap::value_parser!(OsString)
    )]
    tokens: Vec<OsString>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            eprintln!("stagepipe: {}", first_line(&e.to_string()));
            return Ok(ExitCode::FAILURE);
        }
    };

    match run(&stage_tokens(&cli.tokens)).await {
        Ok(report) => Ok(ExitCode::from(report.exit_status())),
        Err(e) => {
            // Fatal faults replace the report with a single line.
            eprintln!("stagepipe: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Stage tokens as text; bytes that are not UTF-8 become U+FFFD.
fn stage_tokens(tokens: &[OsString]) -> Vec<String> {
    tokens
        .iter()
        .map(|t| t.to_string_lossy().into_owned())
        .collect()
}

fn first_line(message: &str) -> &str {
    let line = message.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line)
}

/// Stderr carries the report, so logging stays off unless RUST_LOG asks for it.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(tokens: &[String]) -> PipelineResult<Report> {
    let engine = PipelineEngine::from_args(tokens);
    tracing::info!(stages = engine.commands().len(), "running pipeline");

    let mut stdout = tokio::io::stdout();
    let report = engine.run(Stdio::inherit(), &mut stdout).await?;
    tracing::info!(failed = report.failed(), "pipeline finished");

    report::emit(&report, &mut std::io::stderr().lock())?;
    Ok(report)
}
