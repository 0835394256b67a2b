//! Failure extraction.
//!
//! Filters a parsed wafer down to its failing measurements. This stage is a
//! pure function; writing the `<wafer>_failures.csv` artifact is the report
//! module's job so extraction stays trivially testable.

use crate::model::{FailureRecord, WaferDataset};

/// Extract the failing measurements of a wafer, preserving file row order.
///
/// A wafer with no failing dies yields an empty vector, not an error.
pub fn extract_failures(dataset: &WaferDataset) -> Vec<FailureRecord> {
    dataset
        .measurements
        .iter()
        .filter(|m| m.status.is_fail())
        .map(FailureRecord::from)
        .collect()
}
