//! Runtime record for one pipeline stage.
//!
//! A [`Stage`] owns the live subprocess and the task that accumulates its
//! error stream. Its stdout read end is handed back to the caller on spawn so
//! it can become the next stage's stdin or be drained to the final output.

use crate::error::{PipelineError, PipelineResult};
use crate::tokenizer::split_command_line;
use sp_protocol::StageSummary;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::task::JoinHandle;

/// A started pipeline stage.
pub struct Stage {
    command: String,
    child: Child,
    stderr_buffer: JoinHandle<Vec<u8>>,
}

/// Result of waiting on a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    /// What goes into the report for this stage.
    pub summary: StageSummary,

    /// Whether the stage exited with status 0 and no wait-level fault.
    pub clean: bool,
}

impl Stage {
    /// Start the subprocess for `command`, reading from `stdin`.
    ///
    /// Stdout and stderr are both piped. Stderr is drained into a private
    /// buffer by a background task; stdout is returned to the caller.
    pub fn spawn(command: String, stdin: Stdio) -> PipelineResult<(Self, ChildStdout)> {
        let (program, args) = split_command_line(&command);

        // The Command (and the parent's copy of `stdin`) is dropped at the end
        // of this statement, so the upstream pipe is only held by the child.
        // A child dropped without being waited on is killed, and the runtime
        // reaps it in the background.
        let spawned = Command::new(program)
            .args(&args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(source) => return Err(PipelineError::StartFailure { command, source }),
        };

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            (stdout, _) => {
                if let Err(e) = child.start_kill() {
                    tracing::warn!(command = %command, error = %e, "failed to kill stage");
                }
                let stream = if stdout.is_none() { "stdout" } else { "stderr" };
                return Err(PipelineError::PipeUnavailable { command, stream });
            }
        };

        tracing::debug!(command = %command, pid = ?child.id(), "stage started");

        let stage = Self {
            command,
            child,
            stderr_buffer: capture_stderr(stderr),
        };
        Ok((stage, stdout))
    }

    /// The literal command line of this stage.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Wait for the subprocess to terminate and summarize it.
    ///
    /// Captured stderr is only kept for non-clean stages.
    pub async fn wait(mut self) -> StageOutcome {
        let status = self.child.wait().await;
        let captured = match self.stderr_buffer.await {
            Ok(buffer) => buffer,
            Err(e) => {
                tracing::warn!(command = %self.command, error = %e, "stderr capture task failed");
                Vec::new()
            }
        };

        match status {
            Ok(status) if status.success() => {
                tracing::debug!(command = %self.command, "stage exited cleanly");
                StageOutcome {
                    summary: StageSummary::clean(self.command),
                    clean: true,
                }
            }
            Ok(status) => {
                // No code means the process was terminated by a signal.
                let exit_code = status.code().unwrap_or(-1);
                tracing::debug!(command = %self.command, exit_code, "stage failed");
                StageOutcome {
                    summary: StageSummary::failed(
                        self.command,
                        exit_code,
                        String::from_utf8_lossy(&captured),
                    ),
                    clean: false,
                }
            }
            Err(e) => {
                tracing::debug!(command = %self.command, error = %e, "waiting on stage failed");
                StageOutcome {
                    summary: StageSummary::failed(
                        self.command,
                        0,
                        String::from_utf8_lossy(&captured),
                    ),
                    clean: false,
                }
            }
        }
    }

    /// Kill the subprocess and reap it.
    pub async fn kill(mut self) {
        if let Err(e) = self.child.kill().await {
            tracing::warn!(command = %self.command, error = %e, "failed to kill stage");
        }
        self.stderr_buffer.abort();
    }
}

fn capture_stderr(mut stderr: ChildStderr) -> JoinHandle<Vec<u8>> {
    tokio::spawn(async move {
        let mut buffer = Vec::new();
        if let Err(e) = stderr.read_to_end(&mut buffer).await {
            tracing::warn!(error = %e, "stderr capture ended early");
        }
        buffer
    })
}
