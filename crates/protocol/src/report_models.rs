//! Pipeline report models.
//!
//! This module defines the structures written to the diagnostic channel once
//! every stage of a pipeline run has been waited on.

use serde::{Deserialize, Serialize};

/// Summary of a single pipeline stage after it has terminated.
///
/// A stage that exited cleanly always carries `exit_code == 0` and an empty
/// `stderr`, whatever the subprocess actually wrote to its error stream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct StageSummary {
    /// The literal command line of the stage (executable plus arguments).
    pub command: String,

    /// OS exit code of a non-clean stage.
    ///
    /// Zero for clean stages and for stages whose wait failed without an
    /// exit status. `-1` when the subprocess was terminated by a signal.
    pub exit_code: i32,

    /// Captured error output of a non-clean stage.
    pub stderr: String,
}

impl StageSummary {
    /// Summary of a stage that terminated cleanly.
    pub fn clean(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            exit_code: 0,
            stderr: String::new(),
        }
    }

    /// Summary of a stage that terminated non-cleanly.
    pub fn failed(command: impl Into<String>, exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }
}

/// The aggregate report of a pipeline run.
///
/// Stages appear in the order they were declared on the command line, not
/// the order in which they terminated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(from = "ReportDocument")]
pub struct Report {
    pub stages: Vec<StageSummary>,

    /// Whether at least one stage terminated non-cleanly.
    ///
    /// Tracked separately from the summaries because a wait-level fault
    /// leaves `exit_code` at zero.
    #[serde(skip)]
    failed: bool,
}

/// The serialized form of a [`Report`], which carries no failed flag.
#[derive(Deserialize)]
struct ReportDocument {
    stages: Vec<StageSummary>,
}

impl From<ReportDocument> for Report {
    /// A parsed report counts as failed when any stage carries an exit code
    /// or captured stderr. A wait-level fault that left neither cannot be
    /// told apart from a clean stage.
    fn from(document: ReportDocument) -> Self {
        let failed = document
            .stages
            .iter()
            .any(|stage| stage.exit_code != 0 || !stage.stderr.is_empty());
        Self::new(document.stages, failed)
    }
}

impl Report {
    /// Build a report from ordered stage summaries and the aggregated outcome.
    pub fn new(stages: Vec<StageSummary>, failed: bool) -> Self {
        Self { stages, failed }
    }

    /// True when any stage terminated non-cleanly.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Process exit status for this run: 0 on success, 1 otherwise.
    ///
    /// The failure status is fixed and never derived from a stage's own
    /// exit code.
    pub fn exit_status(&self) -> u8 {
        if self.failed {
            1
        } else {
            0
        }
    }
}
