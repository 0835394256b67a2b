use std::fs;
use std::path::Path;

use tempfile::tempdir;
use wafer_core::compare::{CoverageRow, CoverageStatus};
use wafer_core::model::{DieCoord, FailureRecord, MeasurementKey};
use wafer_core::report::{
    write_coverage_report, write_failure_report, write_summary_report, ReportConfig, ReportError,
};
use wafer_core::summary::SummaryRow;

fn failure(x: i32, y: i32, item: &str, value: Option<f64>) -> FailureRecord {
    FailureRecord::new(DieCoord::new(x, y), item, value)
}

fn coverage_row(x: i32, y: i32, item: &str, a: CoverageStatus, b: CoverageStatus) -> CoverageRow {
    CoverageRow { key: MeasurementKey::new(DieCoord::new(x, y), item), status_a: a, status_b: b }
}

#[test]
fn failure_report_writes_expected_rows() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("wafer_a_failures.csv");

    let failures =
        vec![failure(1, 2, "T1", Some(0.5)), failure(3, 4, "T2", None)];
    write_failure_report(&path, &failures).expect("write");

    let contents = fs::read_to_string(&path).expect("read back");
    assert_eq!(contents, "die_x,die_y,test_item,value\n1,2,T1,0.5\n3,4,T2,\n");
}

#[test]
fn empty_failure_report_is_header_only() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("clean_failures.csv");

    write_failure_report(&path, &[]).expect("write");

    let contents = fs::read_to_string(&path).expect("read back");
    assert_eq!(contents, "die_x,die_y,test_item,value\n");
}

#[test]
fn coverage_report_writes_all_three_status_tokens() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("coverage.csv");

    let rows = vec![
        coverage_row(1, 1, "T1", CoverageStatus::Fail, CoverageStatus::Fail),
        coverage_row(2, 2, "T1", CoverageStatus::Pass, CoverageStatus::Fail),
        coverage_row(3, 3, "T2", CoverageStatus::Fail, CoverageStatus::Absent),
    ];
    write_coverage_report(&path, &rows).expect("write");

    let contents = fs::read_to_string(&path).expect("read back");
    assert_eq!(
        contents,
        "die_x,die_y,test_item,status_a,status_b\n\
         1,1,T1,FAIL,FAIL\n\
         2,2,T1,PASS,FAIL\n\
         3,3,T2,FAIL,ABSENT\n"
    );
}

#[test]
fn summary_report_formats_two_decimal_percentages() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("summary.csv");

    let rows = vec![
        SummaryRow { test_item: "T1".into(), failed_a: 1, failed_b: 2, failed_both: 1, coverage_pct: 50.0 },
        SummaryRow { test_item: "T2".into(), failed_a: 3, failed_b: 3, failed_both: 3, coverage_pct: 100.0 },
        SummaryRow { test_item: "T3".into(), failed_a: 1, failed_b: 2, failed_both: 1, coverage_pct: 100.0 / 3.0 },
    ];
    write_summary_report(&path, &rows).expect("write");

    let contents = fs::read_to_string(&path).expect("read back");
    assert_eq!(
        contents,
        "test_item,failed_a,failed_b,failed_both,coverage_pct\n\
         T1,1,2,1,50.00\n\
         T2,3,3,3,100.00\n\
         T3,1,2,1,33.33\n"
    );
}

#[test]
fn rewriting_the_same_report_is_byte_identical() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("wafer_failures.csv");
    let failures = vec![failure(1, 1, "T1", Some(2.5))];

    write_failure_report(&path, &failures).expect("first write");
    let first = fs::read(&path).expect("read first");

    write_failure_report(&path, &failures).expect("second write");
    let second = fs::read(&path).expect("read second");

    assert_eq!(first, second);
}

#[test]
fn unwritable_output_path_is_a_create_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("no_such_dir").join("out.csv");

    let err = write_failure_report(&path, &[]).expect_err("should fail to create");
    assert!(matches!(err, ReportError::Create { .. }), "got {err:?}");
    assert!(err.to_string().contains("out.csv"));
}

#[test]
fn failure_report_path_uses_input_stem() {
    let config = ReportConfig::with_out_dir("reports");
    let path = config.failure_report_path(Path::new("data/wafer_a.csv"));
    assert_eq!(path, Path::new("reports").join("wafer_a_failures.csv"));
}

#[test]
fn default_config_uses_standard_compare_filenames() {
    let config = ReportConfig::default();
    assert_eq!(config.coverage_path(), Path::new(".").join("coverage.csv"));
    assert_eq!(config.summary_path(), Path::new(".").join("summary.csv"));
}
