//! Monthly / weekly / daily revenue charts.
//!
//! The aggregate extracts are already summed per period; these functions only
//! collapse duplicate period keys and order them. The date-range control does
//! not apply.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{PeriodRevenue, RevenuePoint};
use crate::io::ingest::weekly_start_date;

/// Sum `TotalRevenue` per period date, ascending.
pub fn period_sales(rows: &[PeriodRevenue]) -> Vec<RevenuePoint> {
    group_sum(rows.iter().map(|r| (Some(r.invoice_date), r.total_revenue)))
}

/// Sum `TotalRevenue` per week start date, ascending.
pub fn weekly_sales(rows: &[PeriodRevenue]) -> Vec<RevenuePoint> {
    group_sum(rows.iter().map(|r| (start_date(r), r.total_revenue)))
}

/// The week start of a weekly row.
///
/// Rows are normally normalized at load time already; the raw `start/end`
/// label is the fallback when it is not.
pub fn start_date(row: &PeriodRevenue) -> Option<NaiveDate> {
    if row.period.contains('/') {
        weekly_start_date(&row.period).or(Some(row.invoice_date))
    } else {
        Some(row.invoice_date)
    }
}

fn group_sum(items: impl Iterator<Item = (Option<NaiveDate>, f64)>) -> Vec<RevenuePoint> {
    let mut grouped: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, revenue) in items {
        let Some(date) = date else { continue };
        *grouped.entry(date).or_insert(0.0) += revenue;
    }
    grouped
        .into_iter()
        .map(|(date, revenue)| RevenuePoint { date, revenue })
        .collect()
}
