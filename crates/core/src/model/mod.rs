//! Core data model for wafer test measurements and derived failure views.
//!
//! This module defines:
//! - `Status`: the enumerated pass/fail outcome of a single measurement.
//! - `DieCoord` / `MeasurementKey`: the identity types used for ordering
//!   and for joining two wafers in compare mode.
//! - `Measurement` / `WaferDataset`: one parsed row and the full parsed file.
//! - `FailureRecord`: the derived view of a failing measurement.
//!
//! Everything here is immutable once constructed; the parser builds a
//! `WaferDataset` and every later stage only reads from it.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Pass/fail outcome of a single test measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    /// Parse a status cell as it appears in a wafer CSV.
    ///
    /// Accepts `PASS` / `FAIL` in any case. Anything else is unrecognized and
    /// must be surfaced as a parse error by the caller; there is no implicit
    /// default.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "PASS" => Some(Status::Pass),
            "FAIL" => Some(Status::Fail),
            _ => None,
        }
    }

    pub fn is_fail(self) -> bool {
        matches!(self, Status::Fail)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::Fail => write!(f, "FAIL"),
        }
    }
}

/// Coordinates of a die site on the wafer.
///
/// Ordering is (x, then y) so that reports sorted by key come out in a
/// stable, reproducible order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DieCoord {
    pub x: i32,
    pub y: i32,
}

impl DieCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for DieCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Join identity for compare mode: one die site under one test item.
///
/// Ordering is (die, then test item), which fixes the row order of the
/// coverage report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MeasurementKey {
    pub die: DieCoord,
    pub test_item: String,
}

impl MeasurementKey {
    pub fn new(die: DieCoord, test_item: impl Into<String>) -> Self {
        Self { die, test_item: test_item.into() }
    }
}

/// One row of wafer test data: a die, a test item, the pass/fail status, and
/// the optionally recorded measured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub die: DieCoord,
    pub test_item: String,
    pub status: Status,
    pub value: Option<f64>,
}

impl Measurement {
    pub fn new(
        die: DieCoord,
        test_item: impl Into<String>,
        status: Status,
        value: Option<f64>,
    ) -> Self {
        Self { die, test_item: test_item.into(), status, value }
    }

    pub fn key(&self) -> MeasurementKey {
        MeasurementKey::new(self.die, self.test_item.clone())
    }
}

/// A fully parsed wafer CSV: the source identifier plus its measurements in
/// file row order. Created by the parser; read-only thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaferDataset {
    /// Where this dataset came from (input path as given by the user).
    pub source: String,
    pub measurements: Vec<Measurement>,
}

impl WaferDataset {
    pub fn new(source: impl Into<String>, measurements: Vec<Measurement>) -> Self {
        Self { source: source.into(), measurements }
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Distinct test-item namespace of this wafer.
    ///
    /// Used by the comparator to detect wafers whose identifier spaces do not
    /// overlap at all (a schema mismatch rather than a meaningful comparison).
    pub fn test_items(&self) -> BTreeSet<&str> {
        self.measurements.iter().map(|m| m.test_item.as_str()).collect()
    }

    /// Resolved status per measurement key.
    ///
    /// A key can appear more than once in poorly formatted files; FAIL
    /// dominates, so a die that failed a test anywhere counts as failing.
    pub fn status_map(&self) -> BTreeMap<MeasurementKey, Status> {
        let mut map = BTreeMap::new();
        for m in &self.measurements {
            let entry = map.entry(m.key()).or_insert(m.status);
            if m.status.is_fail() {
                *entry = Status::Fail;
            }
        }
        map
    }

    /// Resolved status for a single key, or `None` if the key never appears.
    pub fn status_of(&self, key: &MeasurementKey) -> Option<Status> {
        let mut seen = None;
        for m in &self.measurements {
            if m.die == key.die && m.test_item == key.test_item {
                if m.status.is_fail() {
                    return Some(Status::Fail);
                }
                seen = Some(m.status);
            }
        }
        seen
    }
}

/// Derived view of a failing measurement: the die, the test item, and the
/// measured value if one was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub die: DieCoord,
    pub test_item: String,
    pub value: Option<f64>,
}

impl FailureRecord {
    pub fn new(die: DieCoord, test_item: impl Into<String>, value: Option<f64>) -> Self {
        Self { die, test_item: test_item.into(), value }
    }
}

impl From<&Measurement> for FailureRecord {
    fn from(m: &Measurement) -> Self {
        FailureRecord::new(m.die, m.test_item.clone(), m.value)
    }
}
