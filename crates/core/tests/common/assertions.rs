//! Custom assertion helpers for engine tests.

use sp_protocol::report_models::{Report, StageSummary};

/// Assert that a stage summary matches the expected values.
#[allow(dead_code)]
pub fn assert_stage(summary: &StageSummary, command: &str, exit_code: i32, stderr: &str) {
    assert_eq!(summary.command, command, "unexpected command");
    assert_eq!(
        summary.exit_code, exit_code,
        "unexpected exit code for '{command}'"
    );
    assert_eq!(summary.stderr, stderr, "unexpected stderr for '{command}'");
}

/// Assert that the report succeeded and every stage is clean.
#[allow(dead_code)]
pub fn assert_all_clean(report: &Report) {
    assert!(!report.failed(), "report should not be failed: {report:?}");
    assert_eq!(report.exit_status(), 0);
    for stage in &report.stages {
        assert_stage(stage, &stage.command, 0, "");
    }
}

/// Commands of the report, in report order.
#[allow(dead_code)]
pub fn report_commands(report: &Report) -> Vec<&str> {
    report.stages.iter().map(|s| s.command.as_str()).collect()
}
