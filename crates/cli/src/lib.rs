use std::path::PathBuf;

use anyhow::{Context, Result};

/// Resolve the output directory, creating it (and parents) if needed.
pub fn ensure_out_dir(dir: &str) -> Result<PathBuf> {
    let path = PathBuf::from(dir);
    std::fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create output directory {}", path.display()))?;
    Ok(path)
}

/// Human-readable one-line coverage summary printed in compare mode.
pub fn overall_coverage_line(source_a: &str, source_b: &str, pct: f64) -> String {
    format!("Coverage of {source_a} on {source_b}: {pct:.2}%")
}
