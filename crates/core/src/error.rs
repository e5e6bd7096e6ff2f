//! Error types for pipeline execution.
//!
//! A stage that merely exits non-zero is not an error here: that outcome is
//! recorded in the stage's summary. Every variant below aborts the run.

use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The subprocess for a stage could not be started.
    ///
    /// An empty stage command ends up here, since it yields an empty
    /// executable name.
    #[error("failed to start stage '{command}': {source}")]
    StartFailure {
        command: String,
        source: std::io::Error,
    },

    /// A spawned stage did not hand back one of its piped streams.
    #[error("stage '{command}' has no {stream} pipe")]
    PipeUnavailable {
        command: String,
        stream: &'static str,
    },

    /// Copying the last stage's output to the caller failed.
    #[error("failed to forward pipeline output: {0}")]
    StreamFault(#[source] std::io::Error),

    /// The report could not be serialized.
    #[error("failed to serialize report: {0}")]
    ReportFault(#[from] serde_json::Error),

    /// The serialized report could not be written.
    #[error("failed to write report: {0}")]
    ReportWrite(#[source] std::io::Error),
}
