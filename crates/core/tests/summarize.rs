use wafer_core::compare::{compare_coverage, CoverageRow, CoverageStatus};
use wafer_core::model::{DieCoord, Measurement, MeasurementKey, Status, WaferDataset};
use wafer_core::summary::summarize;

fn m(x: i32, y: i32, item: &str, status: Status) -> Measurement {
    Measurement::new(DieCoord::new(x, y), item, status, None)
}

fn row(x: i32, y: i32, item: &str, a: CoverageStatus, b: CoverageStatus) -> CoverageRow {
    CoverageRow { key: MeasurementKey::new(DieCoord::new(x, y), item), status_a: a, status_b: b }
}

/// End-to-end over the comparator: one item, A fails 1 key, B fails 2,
/// overlap 1 → coverage 50%.
#[test]
fn single_item_scenario_matches_expected_counts() {
    let wafer_a = WaferDataset::new(
        "a.csv",
        vec![m(1, 1, "T1", Status::Fail), m(2, 2, "T1", Status::Pass)],
    );
    let wafer_b = WaferDataset::new(
        "b.csv",
        vec![m(1, 1, "T1", Status::Fail), m(2, 2, "T1", Status::Fail)],
    );

    let report = compare_coverage(&wafer_a, &wafer_b);
    let summary = summarize(&report.rows);

    assert_eq!(summary.len(), 1);
    let t1 = &summary[0];
    assert_eq!(t1.test_item, "T1");
    assert_eq!(t1.failed_a, 1);
    assert_eq!(t1.failed_b, 2);
    assert_eq!(t1.failed_both, 1);
    assert!((t1.coverage_pct - 50.0).abs() < 1e-9);
}

#[test]
fn fully_overlapping_failures_report_100_percent() {
    let rows = vec![
        row(1, 1, "T1", CoverageStatus::Fail, CoverageStatus::Fail),
        row(2, 2, "T1", CoverageStatus::Fail, CoverageStatus::Fail),
    ];

    let summary = summarize(&rows);
    assert_eq!(summary.len(), 1);
    assert!((summary[0].coverage_pct - 100.0).abs() < 1e-9);
}

#[test]
fn items_are_sorted_ascending() {
    let rows = vec![
        row(1, 1, "Vth", CoverageStatus::Fail, CoverageStatus::Absent),
        row(1, 1, "Idd", CoverageStatus::Absent, CoverageStatus::Fail),
        row(1, 1, "Leak", CoverageStatus::Fail, CoverageStatus::Pass),
    ];

    let summary = summarize(&rows);
    let items: Vec<_> = summary.iter().map(|s| s.test_item.as_str()).collect();
    assert_eq!(items, vec!["Idd", "Leak", "Vth"]);
}

#[test]
fn absent_and_pass_sides_count_as_not_failed() {
    let rows = vec![
        row(1, 1, "T1", CoverageStatus::Fail, CoverageStatus::Absent),
        row(2, 2, "T1", CoverageStatus::Pass, CoverageStatus::Fail),
        row(3, 3, "T1", CoverageStatus::Fail, CoverageStatus::Fail),
    ];

    let summary = summarize(&rows);
    let t1 = &summary[0];
    assert_eq!(t1.failed_a, 2);
    assert_eq!(t1.failed_b, 2);
    assert_eq!(t1.failed_both, 1);
    // 1 of 3 failing keys fails on both sides.
    assert!((t1.coverage_pct - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn coverage_pct_stays_within_bounds() {
    let rows = vec![
        row(1, 1, "T1", CoverageStatus::Fail, CoverageStatus::Fail),
        row(2, 2, "T1", CoverageStatus::Fail, CoverageStatus::Absent),
        row(1, 1, "T2", CoverageStatus::Absent, CoverageStatus::Fail),
        row(1, 1, "T3", CoverageStatus::Fail, CoverageStatus::Fail),
    ];

    for row in summarize(&rows) {
        assert!(
            (0.0..=100.0).contains(&row.coverage_pct),
            "{} out of range: {}",
            row.test_item,
            row.coverage_pct
        );
    }
}

#[test]
fn empty_coverage_yields_empty_summary() {
    assert!(summarize(&[]).is_empty());
}
