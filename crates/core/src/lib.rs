//! wafer-core
//!
//! Core library for extracting failing-chip records from wafer test CSVs and
//! comparing failure coverage between two wafers.
//!
//! This crate defines the measurement data model, the wafer CSV parser, the
//! failure extractor, the coverage comparator, the per-test-item summary
//! aggregator, and the CSV report writers.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, notebooks, etc.).

pub mod model;
pub mod parse;
pub mod extract;
pub mod compare;
pub mod summary;
pub mod report;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
