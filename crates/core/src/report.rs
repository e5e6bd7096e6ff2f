//! Report emission.
//!
//! The report is rendered as indented JSON and written once, after every
//! stage has been waited on.

use crate::error::{PipelineError, PipelineResult};
use sp_protocol::report_models::Report;
use std::io::Write;

/// Render the report as two-space indented JSON without a trailing newline.
pub fn render(report: &Report) -> PipelineResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render the report and write it to `writer` in one piece.
pub fn emit<W: Write + ?Sized>(report: &Report, writer: &mut W) -> PipelineResult<()> {
    let rendered = render(report)?;
    writer
        .write_all(rendered.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(PipelineError::ReportWrite)
}
