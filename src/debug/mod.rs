//! Debug bundle writer for inspecting loaded extracts and the current view.

use std::fmt::Write as _;
use std::fs::{create_dir_all, write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::app::pipeline::{Dashboard, DashboardView};
use crate::error::AppError;
use crate::report::{fmt_average_order_value, fmt_currency};

/// How many row errors per file are listed in the bundle.
const MAX_ROW_ERRORS: usize = 10;

pub fn write_debug_bundle(dashboard: &Dashboard, view: Option<&DashboardView>) -> Result<PathBuf, AppError> {
    write_debug_bundle_in(Path::new("debug"), dashboard, view)
}

pub fn write_debug_bundle_in(
    dir: &Path,
    dashboard: &Dashboard,
    view: Option<&DashboardView>,
) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("dash_debug_{ts}.md"));

    let body = render_bundle(dashboard, view);
    write(&path, body).map_err(|e| AppError::new(4, format!("Failed to write debug file: {e}")))?;
    Ok(path)
}

fn render_bundle(dashboard: &Dashboard, view: Option<&DashboardView>) -> String {
    // Writing into a String cannot fail.
    let mut out = String::new();
    let _ = writeln!(out, "# dash debug bundle");
    let _ = writeln!(out, "- generated: {}", Local::now().to_rfc3339());

    let _ = writeln!(out, "\n## Extracts");
    let _ = writeln!(out, "| dataset | source | read | used | dropped (date) | row errors | span |");
    let _ = writeln!(out, "| - | - | - | - | - | - | - |");
    let errors = [
        &dashboard.transactions.row_errors,
        &dashboard.monthly.row_errors,
        &dashboard.weekly.row_errors,
        &dashboard.daily.row_errors,
    ];
    for (stats, errs) in dashboard.ingest_stats().into_iter().zip(errors) {
        let span = match (stats.date_min, stats.date_max) {
            (Some(a), Some(b)) => format!("{a}..{b}"),
            _ => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {span} |",
            stats.granularity.display_name(),
            stats.source,
            stats.rows_read,
            stats.rows_used,
            stats.rows_dropped,
            errs.len(),
        );
    }

    for (stats, errs) in dashboard.ingest_stats().into_iter().zip(errors) {
        if errs.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n### Row errors: {}", stats.granularity.display_name());
        for e in errs.iter().take(MAX_ROW_ERRORS) {
            let _ = writeln!(out, "- line {}: {}", e.line, e.message);
        }
        if errs.len() > MAX_ROW_ERRORS {
            let _ = writeln!(out, "- ... {} more", errs.len() - MAX_ROW_ERRORS);
        }
    }

    let _ = writeln!(out, "\n## View");
    match view {
        Some(v) => {
            let _ = writeln!(out, "- range: {} .. {}", v.range.start, v.range.end);
            let _ = writeln!(out, "- total_sales: {}", fmt_currency(v.kpis.total_sales));
            let _ = writeln!(out, "- total_transactions: {}", v.kpis.total_transactions);
            let _ = writeln!(
                out,
                "- average_order_value: {}",
                fmt_average_order_value(v.kpis.average_order_value)
            );
            let _ = writeln!(out, "- customer_segments: {}", v.kpis.customer_segments);
            let _ = writeln!(
                out,
                "- series points: trend={} monthly={} weekly={} daily={}",
                v.trend.len(),
                v.monthly.len(),
                v.weekly.len(),
                v.daily.len()
            );
            let _ = writeln!(out, "- segments: {}", v.segments.len());
        }
        None => {
            let _ = writeln!(out, "- (no view: {})", crate::app::pipeline::NO_VALID_DATES);
        }
    }

    out
}
