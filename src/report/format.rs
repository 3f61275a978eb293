//! Text formatting for `dash report` and the TUI tiles.
//!
//! We keep formatting code in one place so output changes are localized.

use crate::app::pipeline::DashboardView;
use crate::domain::{CountrySegment, Kpis, RevenuePoint, Transaction};
use crate::io::ingest::IngestStats;

const CURRENCY: &str = "€";

/// `1234567.891` -> `"1,234,567.89"` (with `decimals = 2`).
pub fn fmt_thousands(v: f64, decimals: usize) -> String {
    let raw = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 && raw.chars().any(|c| c != '0' && c != '.') { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

pub fn fmt_currency(v: f64) -> String {
    format!("{CURRENCY}{}", fmt_thousands(v, 2))
}

pub fn fmt_count(n: usize) -> String {
    fmt_thousands(n as f64, 0)
}

/// Average order value, or `n/a` when there were no transactions.
pub fn fmt_average_order_value(v: Option<f64>) -> String {
    v.map(fmt_currency).unwrap_or_else(|| "n/a".to_string())
}

/// The four KPI tiles as `(label, value)` pairs.
pub fn kpi_tiles(kpis: &Kpis) -> [(&'static str, String); 4] {
    [
        ("Total Sales", fmt_currency(kpis.total_sales)),
        ("Number of Transactions", fmt_count(kpis.total_transactions)),
        ("Avg. Order Value", fmt_average_order_value(kpis.average_order_value)),
        ("Customer Segments", fmt_count(kpis.customer_segments)),
    ]
}

/// Format the full report (everything the dashboard page shows).
pub fn format_report(view: &DashboardView) -> String {
    let mut out = String::new();

    out.push_str("=== E-commerce Dashboard ===\n");
    out.push_str(&format!("Date range: {} .. {}\n\n", view.range.start, view.range.end));

    out.push_str("Key Performance Indicators (KPIs)\n");
    for (label, value) in kpi_tiles(&view.kpis) {
        out.push_str(&format!("  {label:<24} {value}\n"));
    }
    out.push('\n');

    out.push_str(&format_series("Sales Trend Over Time", "InvoiceDate", "Price", &view.trend));
    out.push('\n');
    out.push_str(&format_series("Monthly Sales", "InvoiceDate", "TotalRevenue", &view.monthly));
    out.push('\n');
    out.push_str(&format_series("Weekly Sales", "StartDate", "TotalRevenue", &view.weekly));
    out.push('\n');
    out.push_str(&format_series("Daily Sales", "InvoiceDate", "TotalRevenue", &view.daily));
    out.push('\n');
    out.push_str(&format_segments(&view.segments));

    out
}

/// A two-column `(date, revenue)` table.
pub fn format_series(title: &str, date_header: &str, value_header: &str, points: &[RevenuePoint]) -> String {
    let mut out = format!("{title} ({} points)\n", points.len());
    if points.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }
    out.push_str(&format!("  {date_header:<12} {value_header:>18}\n"));
    out.push_str(&format!("  {:-<12} {:->18}\n", "", ""));
    for p in points {
        out.push_str(&format!("  {:<12} {:>18}\n", p.date, fmt_thousands(p.revenue, 2)));
    }
    out
}

/// Country segmentation table with each slice's share of the total.
pub fn format_segments(segments: &[CountrySegment]) -> String {
    let total: usize = segments.iter().map(|s| s.customers).sum();
    let mut out = String::from("Customer Segments by Country (Top 12 + Others)\n");
    out.push_str(&format!("  {:<24} {:>9} {:>7}\n", "Country", "Customers", "Share"));
    out.push_str(&format!("  {:-<24} {:->9} {:->7}\n", "", "", ""));
    for s in segments {
        out.push_str(&format!(
            "  {:<24} {:>9} {:>6.1}%\n",
            truncate(&s.country, 24),
            fmt_count(s.customers),
            share_pct(s.customers, total),
        ));
    }
    out
}

/// Lookup table for a `(customer, country)` pair.
pub fn format_lookup(customer_id: &str, country: &str, rows: &[&Transaction]) -> String {
    let mut out = format!("Filter by Customer and Country: {customer_id} / {country}\n");
    if rows.is_empty() {
        out.push_str("  (no matching rows)\n");
        return out;
    }
    out.push_str(&format!(
        "  {:<12} {:<10} {:>12} {:<10} {:<20}\n",
        "InvoiceDate", "InvoiceNo", "Price", "CustomerID", "Country"
    ));
    for t in rows {
        out.push_str(&format!(
            "  {:<12} {:<10} {:>12} {:<10} {:<20}\n",
            t.invoice_date,
            truncate(&t.invoice_no, 10),
            fmt_thousands(t.price, 2),
            t.customer_id.as_deref().unwrap_or(""),
            truncate(&t.country, 20),
        ));
    }
    out
}

/// One line per loaded file: rows used / read / dropped and date span.
pub fn format_ingest_summary(stats: &[&IngestStats]) -> String {
    let mut out = String::new();
    for s in stats {
        let span = match (s.date_min, s.date_max) {
            (Some(a), Some(b)) => format!("{a}..{b}"),
            _ => "-".to_string(),
        };
        out.push_str(&format!(
            "{:<13} used={} read={} dropped={} span={span}\n",
            s.granularity.display_name(),
            s.rows_used,
            s.rows_read,
            s.rows_dropped,
        ));
    }
    out
}

pub fn share_pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
