//! CSV report writers and output configuration.
//!
//! Output filenames are explicit configuration carried in `ReportConfig`
//! rather than process-wide constants, so frontends can redirect everything
//! into a chosen directory. All writers emit a header row even when there is
//! no data, and re-running them on identical inputs rewrites byte-identical
//! files.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compare::CoverageRow;
use crate::model::FailureRecord;
use crate::summary::SummaryRow;

/// Error type for report writing.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The output file could not be created.
    #[error("Failed to create {path}: {source}")]
    Create {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// A row could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Buffered output could not be flushed to disk.
    #[error("Failed to flush {path}: {source}")]
    Flush {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Where report files go and what the compare-mode artifacts are called.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory all report files are written into.
    pub out_dir: PathBuf,
    /// Filename of the joined coverage table (compare mode).
    pub coverage_file: String,
    /// Filename of the per-test-item summary (compare mode).
    pub summary_file: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            coverage_file: "coverage.csv".to_string(),
            summary_file: "summary.csv".to_string(),
        }
    }
}

impl ReportConfig {
    /// Default filenames, custom output directory.
    pub fn with_out_dir(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into(), ..Self::default() }
    }

    pub fn coverage_path(&self) -> PathBuf {
        self.out_dir.join(&self.coverage_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.out_dir.join(&self.summary_file)
    }

    /// Path of the single-wafer failure report for a given input file:
    /// `<out_dir>/<stem>_failures.csv`.
    pub fn failure_report_path(&self, input: &Path) -> PathBuf {
        let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("wafer");
        self.out_dir.join(format!("{stem}_failures.csv"))
    }
}

fn open_writer(path: &Path) -> ReportResult<csv::Writer<File>> {
    csv::Writer::from_path(path)
        .map_err(|source| ReportError::Create { path: path.display().to_string(), source })
}

fn write_row<I, T>(wtr: &mut csv::Writer<File>, path: &Path, row: I) -> ReportResult<()>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    wtr.write_record(row)
        .map_err(|source| ReportError::Write { path: path.display().to_string(), source })
}

fn finish(mut wtr: csv::Writer<File>, path: &Path) -> ReportResult<()> {
    wtr.flush()
        .map_err(|source| ReportError::Flush { path: path.display().to_string(), source })
}

/// Empty cell when no value was recorded.
fn value_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write `<wafer>_failures.csv`: one row per failing measurement.
///
/// Zero failures still produces the file, header row only.
pub fn write_failure_report(path: &Path, failures: &[FailureRecord]) -> ReportResult<()> {
    let mut wtr = open_writer(path)?;
    write_row(&mut wtr, path, ["die_x", "die_y", "test_item", "value"])?;
    for failure in failures {
        write_row(
            &mut wtr,
            path,
            [
                failure.die.x.to_string(),
                failure.die.y.to_string(),
                failure.test_item.clone(),
                value_cell(failure.value),
            ],
        )?;
    }
    finish(wtr, path)
}

/// Write the joined coverage table.
pub fn write_coverage_report(path: &Path, rows: &[CoverageRow]) -> ReportResult<()> {
    let mut wtr = open_writer(path)?;
    write_row(&mut wtr, path, ["die_x", "die_y", "test_item", "status_a", "status_b"])?;
    for row in rows {
        write_row(
            &mut wtr,
            path,
            [
                row.key.die.x.to_string(),
                row.key.die.y.to_string(),
                row.key.test_item.clone(),
                row.status_a.to_string(),
                row.status_b.to_string(),
            ],
        )?;
    }
    finish(wtr, path)
}

/// Write the per-test-item summary; percentages as two-decimal fixed point.
pub fn write_summary_report(path: &Path, rows: &[SummaryRow]) -> ReportResult<()> {
    let mut wtr = open_writer(path)?;
    write_row(
        &mut wtr,
        path,
        ["test_item", "failed_a", "failed_b", "failed_both", "coverage_pct"],
    )?;
    for row in rows {
        write_row(
            &mut wtr,
            path,
            [
                row.test_item.clone(),
                row.failed_a.to_string(),
                row.failed_b.to_string(),
                row.failed_both.to_string(),
                format!("{:.2}", row.coverage_pct),
            ],
        )?;
    }
    finish(wtr, path)
}
