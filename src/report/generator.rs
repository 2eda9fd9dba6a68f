//! Dataset output.
//!
//! Writes the report as pretty-printed JSON for the frontend and renders a
//! plain-text region table for the console.

use crate::error::{PipelineError, Result};
use crate::models::Report;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Generate the JSON document (2-space indentation).
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write the report to `path`, creating missing parent directories.
///
/// Any existing file is overwritten in place.
pub fn write_report(report: &Report, path: &Path) -> Result<()> {
    let io_error = |source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        debug!("Ensuring directory {}", parent.display());
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let content = generate_json_report(report)?;
    fs::write(path, content).map_err(io_error)?;

    Ok(())
}

/// Render the regions as an aligned text table.
pub fn render_summary(report: &Report) -> String {
    let width = report
        .regions
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(0)
        .max("Region".len());

    let mut table = String::new();

    table.push_str(&format!(
        "   {:<width$}  {:>12}  {:>7}\n",
        "Region",
        "Count",
        "Share",
        width = width
    ));

    for region in &report.regions {
        let marker = if region.in_americas { "  *" } else { "" };
        table.push_str(&format!(
            "   {:<width$}  {:>12}  {:>6.1}%{}\n",
            region.name,
            format_count(region.count),
            region.share_percent,
            marker,
            width = width
        ));
    }

    table.push_str(&format!(
        "   * Americas total: {:.1}%\n",
        report.americas_total_share_percent
    ));

    table
}

/// Format a count with thousands separators, e.g. `50,234,841`.
pub fn format_count(count: i64) -> String {
    let digits = count.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if count < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
