//! Wafer CSV parsing.
//!
//! Reads a long-format wafer test CSV (header row, then one measurement per
//! data row) into a `WaferDataset`. The header is validated exactly once up
//! front; the per-row loop then works with resolved column indices, so there
//! are no dynamic column lookups left to fail mid-file.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use thiserror::Error;

use crate::model::{DieCoord, Measurement, Status, WaferDataset};

/// Accepted header spellings per column, lowercase.
///
/// `xadr` / `yadr` are the column names used by the wafer tester's native
/// export format.
const DIE_X_ALIASES: &[&str] = &["die_x", "x", "xadr"];
const DIE_Y_ALIASES: &[&str] = &["die_y", "y", "yadr"];
const TEST_ITEM_ALIASES: &[&str] = &["test_item", "item", "test"];
const STATUS_ALIASES: &[&str] = &["status", "result"];
const VALUE_ALIASES: &[&str] = &["value", "measurement"];

/// Error type for wafer CSV parsing.
///
/// All variants are fatal: a file that fails to parse produces no output at
/// all. Every variant names the offending file, and row-level variants name
/// the 1-based data row so the message points at the line a user would see
/// in a spreadsheet (row 1 = first row after the header).
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input file could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not well-formed CSV (e.g., ragged rows, bad quoting).
    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// A required column is missing from the header row.
    #[error("{path}: missing required column '{column}' in header")]
    MissingColumn { path: String, column: &'static str },

    /// A status cell held something other than PASS/FAIL.
    #[error("{path} row {row}: unrecognized status '{token}' (expected PASS or FAIL)")]
    UnrecognizedStatus { path: String, row: usize, token: String },

    /// A coordinate or value cell could not be parsed as a number.
    #[error("{path} row {row}: invalid {field} '{token}'")]
    InvalidField { path: String, row: usize, field: &'static str, token: String },
}

/// Convenience result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Resolved column indices for one wafer CSV, computed from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    die_x: usize,
    die_y: usize,
    test_item: usize,
    status: usize,
    value: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, path: &str) -> ParseResult<Self> {
        let map = build_header_map(headers);
        let require = |aliases: &[&str], column: &'static str| {
            find_column(&map, aliases).ok_or_else(|| ParseError::MissingColumn {
                path: path.to_string(),
                column,
            })
        };

        Ok(Columns {
            die_x: require(DIE_X_ALIASES, "die_x")?,
            die_y: require(DIE_Y_ALIASES, "die_y")?,
            test_item: require(TEST_ITEM_ALIASES, "test_item")?,
            status: require(STATUS_ALIASES, "status")?,
            value: find_column(&map, VALUE_ALIASES),
        })
    }
}

/// Build a map from lowercased, trimmed header name to column index.
fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect()
}

/// Find the first alias present in the header map.
fn find_column(map: &HashMap<String, usize>, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|alias| map.get(*alias).copied())
}

/// Parse a wafer CSV at `path` into a `WaferDataset`.
///
/// Pure read: no files are written, and on error nothing is produced. Row
/// order in the dataset matches file row order.
pub fn parse_wafer_csv(path: impl AsRef<Path>) -> ParseResult<WaferDataset> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let file = File::open(path).map_err(|source| ParseError::Io {
        path: path_str.clone(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| ParseError::Csv { path: path_str.clone(), source })?
        .clone();
    let columns = Columns::resolve(&headers, &path_str)?;

    let mut measurements = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let row = idx + 1;
        let record =
            record.map_err(|source| ParseError::Csv { path: path_str.clone(), source })?;

        let die = DieCoord::new(
            parse_int(&record, columns.die_x, "die x coordinate", &path_str, row)?,
            parse_int(&record, columns.die_y, "die y coordinate", &path_str, row)?,
        );

        let test_item = field(&record, columns.test_item).to_string();

        let status_token = field(&record, columns.status);
        let status = Status::from_token(status_token).ok_or_else(|| {
            ParseError::UnrecognizedStatus {
                path: path_str.clone(),
                row,
                token: status_token.to_string(),
            }
        })?;

        let value = match columns.value {
            Some(col) => parse_value(&record, col, &path_str, row)?,
            None => None,
        };

        measurements.push(Measurement::new(die, test_item, status, value));
    }

    Ok(WaferDataset::new(path_str, measurements))
}

/// Fetch a field by resolved index.
///
/// The reader rejects ragged rows, so every record has a field for every
/// header column; an out-of-range index can only mean an empty trailing cell.
fn field<'r>(record: &'r StringRecord, index: usize) -> &'r str {
    record.get(index).unwrap_or_default()
}

fn parse_int(
    record: &StringRecord,
    index: usize,
    name: &'static str,
    path: &str,
    row: usize,
) -> ParseResult<i32> {
    let token = field(record, index);
    token.parse().map_err(|_| ParseError::InvalidField {
        path: path.to_string(),
        row,
        field: name,
        token: token.to_string(),
    })
}

/// Parse the optional value cell; empty cells mean "no value recorded".
fn parse_value(
    record: &StringRecord,
    index: usize,
    path: &str,
    row: usize,
) -> ParseResult<Option<f64>> {
    let token = field(record, index);
    if token.is_empty() {
        return Ok(None);
    }
    token
        .parse()
        .map(Some)
        .map_err(|_| ParseError::InvalidField {
            path: path.to_string(),
            row,
            field: "measured value",
            token: token.to_string(),
        })
}
