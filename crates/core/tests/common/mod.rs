//! Common test utilities and helpers for engine tests.
//!
//! This module provides shared functionality across the integration tests:
//! - Test fixtures (temporary stage scripts)
//! - Custom assertions on reports

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
