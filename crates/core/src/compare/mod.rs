//! Coverage comparison between two wafers.
//!
//! Joins two parsed wafers over the union of their failing keys and resolves
//! each key's status on both sides. The key universe is failing keys only:
//! the report exists to answer "which failures does one wafer's test catch in
//! the other", so dies that pass everywhere on both wafers carry no signal.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{MeasurementKey, Status, WaferDataset};

/// Status of a coverage key within one wafer.
///
/// `Absent` means the (die, test item) key does not appear in that wafer's
/// dataset at all; it is deliberately distinct from `Pass`, which means the
/// die was measured for that item and passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStatus {
    Pass,
    Fail,
    Absent,
}

impl From<Option<Status>> for CoverageStatus {
    fn from(status: Option<Status>) -> Self {
        match status {
            Some(Status::Pass) => CoverageStatus::Pass,
            Some(Status::Fail) => CoverageStatus::Fail,
            None => CoverageStatus::Absent,
        }
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageStatus::Pass => write!(f, "PASS"),
            CoverageStatus::Fail => write!(f, "FAIL"),
            CoverageStatus::Absent => write!(f, "ABSENT"),
        }
    }
}

/// One joined row of the coverage table: a failing key and its status on
/// each side. Invariant: at least one side is `Fail`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRow {
    pub key: MeasurementKey,
    pub status_a: CoverageStatus,
    pub status_b: CoverageStatus,
}

impl CoverageRow {
    pub fn failed_in_a(&self) -> bool {
        self.status_a == CoverageStatus::Fail
    }

    pub fn failed_in_b(&self) -> bool {
        self.status_b == CoverageStatus::Fail
    }

    pub fn failed_in_both(&self) -> bool {
        self.failed_in_a() && self.failed_in_b()
    }
}

/// Result of comparing two wafers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Joined coverage rows, sorted ascending by (die x, die y, test item).
    pub rows: Vec<CoverageRow>,
    /// True when both wafers have test items but the namespaces are disjoint.
    ///
    /// Callers should warn and continue; the rows are empty in that case and
    /// the run still succeeds with degenerate output tables.
    pub schema_mismatch: bool,
    /// Share of wafer A's failing keys that also fail in wafer B, as a
    /// percentage. 0.0 when A has no failures.
    pub overall_coverage_pct: f64,
}

/// Compare failure coverage of wafer `a` against wafer `b`.
pub fn compare_coverage(a: &WaferDataset, b: &WaferDataset) -> CoverageReport {
    let items_a = a.test_items();
    let items_b = b.test_items();
    let schema_mismatch =
        !items_a.is_empty() && !items_b.is_empty() && items_a.is_disjoint(&items_b);
    if schema_mismatch {
        return CoverageReport { rows: Vec::new(), schema_mismatch, overall_coverage_pct: 0.0 };
    }

    let status_a = a.status_map();
    let status_b = b.status_map();

    // Union of failing keys from both sides; BTreeSet gives the sorted,
    // deterministic row order for free.
    let mut keys: BTreeSet<&MeasurementKey> = BTreeSet::new();
    keys.extend(status_a.iter().filter(|(_, s)| s.is_fail()).map(|(k, _)| k));
    keys.extend(status_b.iter().filter(|(_, s)| s.is_fail()).map(|(k, _)| k));

    let rows: Vec<CoverageRow> = keys
        .into_iter()
        .map(|key| CoverageRow {
            key: key.clone(),
            status_a: status_a.get(key).copied().into(),
            status_b: status_b.get(key).copied().into(),
        })
        .collect();

    let failed_a = rows.iter().filter(|r| r.failed_in_a()).count();
    let failed_both = rows.iter().filter(|r| r.failed_in_both()).count();
    let overall_coverage_pct = if failed_a == 0 {
        0.0
    } else {
        failed_both as f64 / failed_a as f64 * 100.0
    };

    CoverageReport { rows, schema_mismatch, overall_coverage_pct }
}
