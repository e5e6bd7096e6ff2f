//! Pipeline execution engine.
//!
//! The PipelineEngine starts every stage of a pipeline with its stdin wired
//! to the previous stage's stdout, streams the last stage's output to the
//! caller, then waits on each stage in declaration order and aggregates the
//! results into a [`Report`].

use crate::error::{PipelineError, PipelineResult};
use crate::stage::Stage;
use crate::tokenizer::{split_stages, DELIMITER};
use sp_protocol::report_models::Report;
use std::process::Stdio;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::process::ChildStdout;

/// The main pipeline execution engine.
///
/// Holds the ordered stage command lines. Every call to [`run`] starts a
/// fresh set of subprocesses; nothing is shared between runs.
///
/// [`run`]: PipelineEngine::run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineEngine {
    commands: Vec<String>,
}

impl PipelineEngine {
    /// Create an engine for the given stage command lines.
    ///
    /// An empty list is treated as a single empty stage, which fails to
    /// start.
    pub fn new(commands: Vec<String>) -> Self {
        let commands = if commands.is_empty() {
            vec![String::new()]
        } else {
            commands
        };
        Self { commands }
    }

    /// Create an engine from a flat argument list separated by `::` tokens.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(split_stages(args, DELIMITER))
    }

    /// The stage command lines, in declaration order.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Execute the pipeline and return the aggregated report.
    ///
    /// This is the main entry point for pipeline execution. It:
    /// 1. Starts every stage in order, chaining stdout to the next stdin
    /// 2. Copies the last stage's stdout into `output` until end of stream
    /// 3. Waits on every stage in declaration order
    /// 4. Returns the report, marked failed if any stage was not clean
    ///
    /// # Arguments
    ///
    /// * `stdin` - Input for the first stage
    /// * `output` - Destination for the last stage's output
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A stage fails to start (including an empty command)
    /// - Forwarding the final output fails
    ///
    /// Stages already started when an error occurs are killed and reaped
    /// before the error is returned. A stage exiting non-zero is not an
    /// error; it is recorded in the report.
    pub async fn run<W>(&self, stdin: Stdio, output: &mut W) -> PipelineResult<Report>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut stages = Vec::with_capacity(self.commands.len());

        let last_stdout = match self.start_stages(stdin, &mut stages) {
            Ok(stdout) => stdout,
            Err(e) => {
                abort(stages).await;
                return Err(e);
            }
        };

        match forward_output(last_stdout, output).await {
            Ok(copied) => tracing::debug!(bytes = copied, "pipeline output drained"),
            Err(e) => {
                abort(stages).await;
                return Err(PipelineError::StreamFault(e));
            }
        }

        Ok(wait_all(stages).await)
    }

    /// Start every stage, pushing each onto `stages` as soon as it runs.
    ///
    /// Returns the read end of the last stage's stdout.
    fn start_stages(&self, stdin: Stdio, stages: &mut Vec<Stage>) -> PipelineResult<ChildStdout> {
        let mut stdin = Some(stdin);
        let mut last_stdout = None;

        for (index, command) in self.commands.iter().enumerate() {
            let input = match last_stdout.take() {
                Some(upstream) => into_stdio(upstream, command)?,
                None => stdin.take().unwrap_or_else(Stdio::null),
            };

            tracing::debug!(stage = index, command = %command, "starting stage");
            let (stage, stdout) = Stage::spawn(command.clone(), input)?;
            stages.push(stage);
            last_stdout = Some(stdout);
        }

        last_stdout.ok_or_else(|| PipelineError::PipeUnavailable {
            command: self.commands.last().cloned().unwrap_or_default(),
            stream: "stdout",
        })
    }
}

/// Hand a stage's stdout read end over as the next stage's stdin.
fn into_stdio(upstream: ChildStdout, command: &str) -> PipelineResult<Stdio> {
    upstream
        .try_into()
        .map_err(|source| PipelineError::StartFailure {
            command: command.to_string(),
            source,
        })
}

async fn forward_output<W>(mut stdout: ChildStdout, output: &mut W) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let copied = tokio::io::copy(&mut stdout, output).await?;
    output.flush().await?;
    Ok(copied)
}

async fn wait_all(stages: Vec<Stage>) -> Report {
    let mut summaries = Vec::with_capacity(stages.len());
    let mut failed = false;

    for stage in stages {
        let outcome = stage.wait().await;
        failed |= !outcome.clean;
        summaries.push(outcome.summary);
    }

    Report::new(summaries, failed)
}

async fn abort(stages: Vec<Stage>) {
    tracing::debug!(started = stages.len(), "aborting pipeline");
    for stage in stages {
        stage.kill().await;
    }
}
