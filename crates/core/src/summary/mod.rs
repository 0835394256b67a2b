//! Per-test-item aggregation of the coverage table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::compare::CoverageRow;

/// Aggregated coverage for one test item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub test_item: String,
    /// Keys failing in wafer A under this item.
    pub failed_a: usize,
    /// Keys failing in wafer B under this item.
    pub failed_b: usize,
    /// Keys failing in both wafers under this item.
    pub failed_both: usize,
    /// `failed_both` over the keys failing in either wafer, as a percentage.
    /// 0.0 when the item has no failing keys at all.
    pub coverage_pct: f64,
}

#[derive(Default)]
struct Tally {
    failing_keys: usize,
    failed_a: usize,
    failed_b: usize,
    failed_both: usize,
}

/// Group coverage rows by test item and compute per-item coverage.
///
/// Output is sorted ascending by test item.
pub fn summarize(rows: &[CoverageRow]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<&str, Tally> = BTreeMap::new();
    for row in rows {
        let tally = groups.entry(row.key.test_item.as_str()).or_default();
        // Every coverage row fails on at least one side, so the group size is
        // the "failing in A or B" denominator.
        tally.failing_keys += 1;
        if row.failed_in_a() {
            tally.failed_a += 1;
        }
        if row.failed_in_b() {
            tally.failed_b += 1;
        }
        if row.failed_in_both() {
            tally.failed_both += 1;
        }
    }

    groups
        .into_iter()
        .map(|(test_item, tally)| SummaryRow {
            test_item: test_item.to_string(),
            failed_a: tally.failed_a,
            failed_b: tally.failed_b,
            failed_both: tally.failed_both,
            coverage_pct: if tally.failing_keys == 0 {
                0.0
            } else {
                tally.failed_both as f64 / tally.failing_keys as f64 * 100.0
            },
        })
        .collect()
}
