//! # sp-core
//!
//! Pipeline execution engine for stagepipe.
//!
//! This crate provides:
//! - Splitting of a flat argument list into stage command lines
//! - Spawning of pipe-connected stage subprocesses with stderr capture
//! - The pipeline engine that drains final output and aggregates results
//! - Rendering of the final report
//!
//! ## Modules
//!
//! - [`tokenizer`]: Stage delimiter handling and command-line splitting
//! - [`stage`]: Runtime record for one subprocess
//! - [`engine`]: Pipeline execution engine
//! - [`report`]: Report rendering and emission
//! - [`error`]: Errors that abort a run

pub mod engine;
pub mod error;
pub mod report;
pub mod stage;
pub mod tokenizer;

pub use engine::PipelineEngine;
pub use error::{PipelineError, PipelineResult};
