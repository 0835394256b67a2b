use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use wafercov::{ensure_out_dir, overall_coverage_line};

use wafer_core::model::WaferDataset;
use wafer_core::report::ReportConfig;
use wafer_core::{compare, extract, parse, report, summary};

/// Extract failing chips from wafer test CSVs and optionally compare coverage.
///
/// This CLI is a thin wrapper around `wafer-core` (exposed in code as
/// `wafer_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "wafercov",
    version,
    about = "Extract failing chips from wafer CSVs and compare failure coverage",
    long_about = None
)]
struct Cli {
    /// Wafer CSV files to convert into `<wafer>_failures.csv` reports.
    #[arg(value_name = "WAFER_CSV")]
    csv: Vec<PathBuf>,

    /// Compare failing chips between two wafer CSV files.
    ///
    /// Writes the joined coverage table and the per-test-item summary into
    /// the output directory.
    #[arg(long, num_args = 2, value_names = ["FILE_A", "FILE_B"])]
    compare: Option<Vec<PathBuf>>,

    /// Output directory for all report files. Created if it does not exist.
    #[arg(long, default_value = ".")]
    out_dir: String,

    /// Also emit the per-test-item summary as JSON on stdout (compare mode).
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.compare.is_none() && cli.csv.is_empty() {
        bail!("No input files; pass wafer CSVs to extract, or --compare FILE_A FILE_B");
    }

    let out_dir = ensure_out_dir(&cli.out_dir)?;
    let config = ReportConfig::with_out_dir(out_dir);

    // Parse every input before writing anything, so a malformed file aborts
    // the run with no partial artifacts on disk.
    let compared = match &cli.compare {
        Some(pair) => Some((load_wafer(&pair[0])?, load_wafer(&pair[1])?)),
        None => None,
    };
    let extracted = cli
        .csv
        .iter()
        .map(|path| Ok((path.as_path(), load_wafer(path)?)))
        .collect::<Result<Vec<_>>>()?;

    if let Some((wafer_a, wafer_b)) = &compared {
        compare_command(wafer_a, wafer_b, &config, cli.json)?;
    }

    for (input, dataset) in &extracted {
        extract_command(input, dataset, &config)?;
    }

    Ok(())
}

fn load_wafer(path: &Path) -> Result<WaferDataset> {
    Ok(parse::parse_wafer_csv(path)?)
}

/// Compare-mode command: join the two wafers' failures, write the coverage
/// and summary tables, and print the overall coverage line.
fn compare_command(
    wafer_a: &WaferDataset,
    wafer_b: &WaferDataset,
    config: &ReportConfig,
    json: bool,
) -> Result<()> {
    let coverage = compare::compare_coverage(wafer_a, wafer_b);
    if coverage.schema_mismatch {
        eprintln!(
            "warning: no test items in common between {} and {}; writing empty coverage tables",
            wafer_a.source, wafer_b.source
        );
    }
    let summary_rows = summary::summarize(&coverage.rows);

    let coverage_path = config.coverage_path();
    report::write_coverage_report(&coverage_path, &coverage.rows)?;
    let summary_path = config.summary_path();
    report::write_summary_report(&summary_path, &summary_rows)?;

    println!(
        "{}",
        overall_coverage_line(&wafer_a.source, &wafer_b.source, coverage.overall_coverage_pct)
    );
    println!("Detailed coverage written to {}", coverage_path.display());
    println!("Summary written to {}", summary_path.display());

    if json {
        let serialized = serde_json::to_string_pretty(&summary_rows)
            .context("Failed to serialize summary to JSON")?;
        println!("{}", serialized);
    }

    Ok(())
}

/// Single-wafer command: write the `<wafer>_failures.csv` report.
///
/// A wafer with zero failures still gets a header-only report so re-runs are
/// reproducible; the console message says there was nothing to find.
fn extract_command(input: &Path, dataset: &WaferDataset, config: &ReportConfig) -> Result<()> {
    let failures = extract::extract_failures(dataset);
    let out_path = config.failure_report_path(input);
    report::write_failure_report(&out_path, &failures)?;

    if failures.is_empty() {
        println!("No failures found in {}", input.display());
    } else {
        println!("Saved failures to {}", out_path.display());
    }

    Ok(())
}
