//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - held in memory for the lifetime of a dashboard session
//! - exported to JSON/CSV
//! - rendered by both the TUI and the text report

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which extract a dataset came from.
///
/// Each granularity has its own date convention for the `InvoiceDate` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Per-transaction rows (`final_dataset.csv`), dates as `month/day/year`.
    Transaction,
    /// `year-month` period keys.
    Monthly,
    /// `start/end` interval keys; only the start date is parsed.
    Weekly,
    /// `year-month-day` period keys.
    Daily,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Transaction,
        Granularity::Monthly,
        Granularity::Weekly,
        Granularity::Daily,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Granularity::Transaction => "Transactions",
            Granularity::Monthly => "Monthly",
            Granularity::Weekly => "Weekly",
            Granularity::Daily => "Daily",
        }
    }

    /// File name inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Granularity::Transaction => "final_dataset.csv",
            Granularity::Monthly => "monthly_aggregation.csv",
            Granularity::Weekly => "weekly_aggregation.csv",
            Granularity::Daily => "daily_aggregation.csv",
        }
    }

    /// The strftime-style format the `InvoiceDate` column is parsed with.
    pub fn date_format(self) -> &'static str {
        match self {
            Granularity::Transaction => "%m/%d/%Y",
            Granularity::Monthly => "%Y-%m",
            Granularity::Weekly | Granularity::Daily => "%Y-%m-%d",
        }
    }
}

/// One row of the finest-granularity (per-transaction) dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub invoice_date: NaiveDate,
    pub invoice_no: String,
    pub price: f64,
    /// Blank cells are kept as `None` and ignored by distinct counts.
    pub customer_id: Option<String>,
    pub country: String,
}

/// One row of a pre-aggregated dataset (monthly, weekly, daily).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRevenue {
    /// The raw period key as it appeared in the file (e.g. `2010-11-29/2010-12-05`).
    pub period: String,
    /// Normalized calendar date for the period key.
    pub invoice_date: NaiveDate,
    pub total_revenue: f64,
}

/// Headline metrics shown as tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_sales: f64,
    pub total_transactions: usize,
    /// `None` when there are no transactions.
    pub average_order_value: Option<f64>,
    /// Distinct customer count.
    pub customer_segments: usize,
}

/// Inclusive calendar-date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range; `None` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A single `(date, revenue)` point of a time-indexed chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub revenue: f64,
}

/// One slice of the country segmentation chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySegment {
    pub country: String,
    pub customers: usize,
}

/// Label used for the synthetic bucket that collects every non-top country.
pub const OTHERS_LABEL: &str = "Others";

/// How many countries are shown individually in the segmentation chart.
pub const TOP_COUNTRIES: usize = 12;
