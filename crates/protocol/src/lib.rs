//! # sp-protocol
//!
//! Data models shared by the stagepipe engine and its consumers.
//!
//! ## Modules
//!
//! - [`report_models`]: Per-stage summaries and the aggregate run report
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde
//! - Independent compilation: No dependencies on other stagepipe crates

pub mod report_models;

// Re-export all public types for convenience
pub use report_models::*;
