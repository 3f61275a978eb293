//! Export a computed dashboard view.
//!
//! - the full view (range, KPIs, every series, segments) as pretty JSON
//! - the sales-trend series as CSV, easy to consume in spreadsheets

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::pipeline::DashboardView;
use crate::domain::RevenuePoint;
use crate::error::AppError;

/// Write the full view as JSON.
pub fn write_view_json(path: &Path, view: &DashboardView) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, view)
        .map_err(|e| AppError::new(4, format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

/// Write the trend series as `InvoiceDate,Price` CSV.
pub fn write_trend_csv(path: &Path, trend: &[RevenuePoint]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_trend(file, trend)
}

fn write_trend<W: Write>(mut out: W, trend: &[RevenuePoint]) -> Result<(), AppError> {
    writeln!(out, "InvoiceDate,Price")
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;
    for p in trend {
        writeln!(out, "{},{:.2}", p.date, p.revenue)
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }
    Ok(())
}
