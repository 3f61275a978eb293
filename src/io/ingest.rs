//! CSV ingest and date normalization.
//!
//! This module turns the four dashboard extracts into typed, date-normalized
//! rows. Each extract has its own `InvoiceDate` convention (see
//! [`Granularity::date_format`]).
//!
//! Design goals:
//! - **Strict schema** for the columns we read (clear errors + exit code 2)
//! - **Row-level validation**: rows whose date does not parse are dropped, rows
//!   with other bad values are dropped and reported
//! - **Separation of concerns**: no aggregation logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use log::{debug, info, warn};

use crate::domain::{Granularity, PeriodRevenue, Transaction};
use crate::error::AppError;

const COL_INVOICE_DATE: &str = "invoicedate";
const COL_INVOICE_NO: &str = "invoiceno";
const COL_PRICE: &str = "price";
const COL_CUSTOMER_ID: &str = "customerid";
const COL_COUNTRY: &str = "country";
const COL_TOTAL_REVENUE: &str = "totalrevenue";

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Accounting for one loaded file.
#[derive(Debug, Clone)]
pub struct IngestStats {
    pub granularity: Granularity,
    /// Where the rows came from (a path, or a label for in-memory readers).
    pub source: String,
    pub rows_read: usize,
    pub rows_used: usize,
    /// Rows removed because their `InvoiceDate` did not parse.
    pub rows_dropped: usize,
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
}

/// Ingest output: typed rows + accounting + row errors.
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub rows: Vec<T>,
    pub stats: IngestStats,
    pub row_errors: Vec<RowError>,
}

/// Load the per-transaction dataset from disk.
pub fn load_transactions(path: &Path) -> Result<Ingested<Transaction>, AppError> {
    let file = open_csv(path)?;
    let out = read_transactions(file, &path.display().to_string())?;
    log_ingest(&out.stats, out.row_errors.len());
    Ok(out)
}

/// Load a monthly/weekly/daily aggregate dataset from disk.
pub fn load_aggregates(path: &Path, granularity: Granularity) -> Result<Ingested<PeriodRevenue>, AppError> {
    let file = open_csv(path)?;
    let out = read_aggregates(file, granularity, &path.display().to_string())?;
    log_ingest(&out.stats, out.row_errors.len());
    Ok(out)
}

/// Parse per-transaction rows from any reader.
pub fn read_transactions<R: Read>(reader: R, source: &str) -> Result<Ingested<Transaction>, AppError> {
    let mut reader = csv_reader(reader);
    let header_map = read_header_map(&mut reader, source)?;
    ensure_columns_exist(
        &header_map,
        &[COL_INVOICE_DATE, COL_PRICE, COL_INVOICE_NO, COL_CUSTOMER_ID, COL_COUNTRY],
        source,
    )?;

    let mut acc = Accumulator::new(Granularity::Transaction, source);
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header row; CSV lines are 1-based.
        let line = idx + 2;
        acc.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                acc.error(line, format!("CSV parse error: {e}"));
                continue;
            }
        };

        let raw_date = get_optional(&record, &header_map, COL_INVOICE_DATE).unwrap_or("");
        let Some(invoice_date) = parse_invoice_date(raw_date, Granularity::Transaction) else {
            acc.rows_dropped += 1;
            continue;
        };

        match parse_transaction(&record, &header_map, invoice_date) {
            Ok(tx) => {
                acc.observe(invoice_date);
                acc.rows.push(tx);
            }
            Err(message) => acc.error(line, message),
        }
    }

    Ok(acc.finish())
}

/// Parse aggregate rows (`InvoiceDate`, `TotalRevenue`) from any reader.
pub fn read_aggregates<R: Read>(
    reader: R,
    granularity: Granularity,
    source: &str,
) -> Result<Ingested<PeriodRevenue>, AppError> {
    let mut reader = csv_reader(reader);
    let header_map = read_header_map(&mut reader, source)?;
    ensure_columns_exist(&header_map, &[COL_INVOICE_DATE, COL_TOTAL_REVENUE], source)?;

    let mut acc = Accumulator::new(granularity, source);
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        acc.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                acc.error(line, format!("CSV parse error: {e}"));
                continue;
            }
        };

        let period = get_optional(&record, &header_map, COL_INVOICE_DATE).unwrap_or("");
        let Some(invoice_date) = parse_invoice_date(period, granularity) else {
            acc.rows_dropped += 1;
            continue;
        };

        let total_revenue = match get_required(&record, &header_map, COL_TOTAL_REVENUE).and_then(parse_amount) {
            Ok(v) => v,
            Err(message) => {
                acc.error(line, message);
                continue;
            }
        };

        acc.observe(invoice_date);
        acc.rows.push(PeriodRevenue {
            period: period.to_string(),
            invoice_date,
            total_revenue,
        });
    }

    Ok(acc.finish())
}

/// Parse an `InvoiceDate` cell under the convention of its dataset.
///
/// The match is exact: trailing data (such as a time component) is rejected.
pub fn parse_invoice_date(raw: &str, granularity: Granularity) -> Option<NaiveDate> {
    let raw = raw.trim();
    if granularity != Granularity::Weekly && !has_four_digit_year(raw, granularity) {
        return None;
    }
    match granularity {
        Granularity::Transaction | Granularity::Daily => {
            NaiveDate::parse_from_str(raw, granularity.date_format()).ok()
        }
        // A year-month key resolves to the first day of the month.
        Granularity::Monthly => NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok(),
        Granularity::Weekly => weekly_start_date(raw),
    }
}

/// Start date of a weekly `start/end` interval key.
pub fn weekly_start_date(raw: &str) -> Option<NaiveDate> {
    let start = raw.split('/').next()?.trim();
    if !has_four_digit_year(start, Granularity::Weekly) {
        return None;
    }
    NaiveDate::parse_from_str(start, Granularity::Weekly.date_format()).ok()
}

/// `%Y` also accepts short years (`1/6/11` would become year 11), so the year
/// token must be exactly four digits.
fn has_four_digit_year(raw: &str, granularity: Granularity) -> bool {
    let year = match granularity {
        Granularity::Transaction => raw.rsplit('/').next(),
        Granularity::Monthly | Granularity::Weekly | Granularity::Daily => raw.split('-').next(),
    };
    year.is_some_and(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
}

struct Accumulator<T> {
    rows: Vec<T>,
    row_errors: Vec<RowError>,
    granularity: Granularity,
    source: String,
    rows_read: usize,
    rows_dropped: usize,
    date_min: Option<NaiveDate>,
    date_max: Option<NaiveDate>,
}

impl<T> Accumulator<T> {
    fn new(granularity: Granularity, source: &str) -> Self {
        Self {
            rows: Vec::new(),
            row_errors: Vec::new(),
            granularity,
            source: source.to_string(),
            rows_read: 0,
            rows_dropped: 0,
            date_min: None,
            date_max: None,
        }
    }

    fn error(&mut self, line: usize, message: String) {
        self.row_errors.push(RowError { line, message });
    }

    fn observe(&mut self, date: NaiveDate) {
        self.date_min = Some(self.date_min.map_or(date, |d| d.min(date)));
        self.date_max = Some(self.date_max.map_or(date, |d| d.max(date)));
    }

    fn finish(self) -> Ingested<T> {
        let stats = IngestStats {
            granularity: self.granularity,
            source: self.source,
            rows_read: self.rows_read,
            rows_used: self.rows.len(),
            rows_dropped: self.rows_dropped,
            date_min: self.date_min,
            date_max: self.date_max,
        };
        Ingested {
            rows: self.rows,
            stats,
            row_errors: self.row_errors,
        }
    }
}

fn open_csv(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn read_header_map<R: Read>(reader: &mut csv::Reader<R>, source: &str) -> Result<HashMap<String, usize>, AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers from '{source}': {e}")))?;
    Ok(build_header_map(headers))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_columns_exist(header_map: &HashMap<String, usize>, required: &[&str], source: &str) -> Result<(), AppError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| !header_map.contains_key(*name))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::new(
        2,
        format!("Missing required column(s) in '{source}': {}", missing.join(", ")),
    ))
}

fn parse_transaction(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    invoice_date: NaiveDate,
) -> Result<Transaction, String> {
    // A blank price keeps the row (it still counts as an invoice and a customer).
    let price = match get_optional(record, header_map, COL_PRICE) {
        Some(raw) => parse_amount(raw)?,
        None => 0.0,
    };
    let invoice_no = get_optional(record, header_map, COL_INVOICE_NO)
        .unwrap_or("")
        .to_string();
    let customer_id = get_optional(record, header_map, COL_CUSTOMER_ID).map(normalize_customer_id);
    let country = get_optional(record, header_map, COL_COUNTRY)
        .unwrap_or("")
        .to_string();

    Ok(Transaction {
        invoice_date,
        invoice_no,
        price,
        customer_id,
        country,
    })
}

/// Customer ids exported through a float column come out as `17850.0`.
fn normalize_customer_id(raw: &str) -> String {
    match raw.strip_suffix(".0") {
        Some(int) if !int.is_empty() && int.chars().all(|c| c.is_ascii_digit()) => int.to_string(),
        _ => raw.to_string(),
    }
}

fn parse_amount(s: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid amount '{s}'."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite amount '{s}'."))
    }
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    get_optional(record, header_map, name).ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn log_ingest(stats: &IngestStats, n_errors: usize) {
    info!(
        "Loaded {} rows from {} ({})",
        stats.rows_used,
        stats.source,
        stats.granularity.display_name()
    );
    debug!(
        "{}: read={} dropped_unparseable_dates={}",
        stats.source, stats.rows_read, stats.rows_dropped
    );
    if n_errors > 0 {
        warn!("{}: skipped {n_errors} row(s) with invalid values", stats.source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn transaction_dates_accept_unpadded_month_day() {
        assert_eq!(parse_invoice_date("1/6/2011", Granularity::Transaction), Some(ymd(2011, 1, 6)));
        assert_eq!(parse_invoice_date("12/01/2010", Granularity::Transaction), Some(ymd(2010, 12, 1)));
    }

    #[test]
    fn transaction_dates_reject_time_suffix_and_iso() {
        assert_eq!(parse_invoice_date("12/1/2010 8:26", Granularity::Transaction), None);
        assert_eq!(parse_invoice_date("2010-12-01", Granularity::Transaction), None);
    }

    #[test]
    fn monthly_keys_resolve_to_first_of_month() {
        assert_eq!(parse_invoice_date("2010-12", Granularity::Monthly), Some(ymd(2010, 12, 1)));
        assert_eq!(parse_invoice_date("2010-12-05", Granularity::Monthly), None);
        assert_eq!(parse_invoice_date("Dec 2010", Granularity::Monthly), None);
    }

    #[test]
    fn weekly_keys_use_interval_start() {
        assert_eq!(
            parse_invoice_date("2010-11-29/2010-12-05", Granularity::Weekly),
            Some(ymd(2010, 11, 29))
        );
        assert_eq!(weekly_start_date("2010-11-29"), Some(ymd(2010, 11, 29)));
        assert_eq!(weekly_start_date("week 48/2010"), None);
    }

    #[test]
    fn daily_keys_are_iso_dates() {
        assert_eq!(parse_invoice_date("2010-12-01", Granularity::Daily), Some(ymd(2010, 12, 1)));
        assert_eq!(parse_invoice_date("2010-13-01", Granularity::Daily), None);
    }

    #[test]
    fn read_transactions_drops_unparseable_dates() {
        let csv = "\
InvoiceDate,Price,InvoiceNo,CustomerID,Country
12/1/2010,10.5,536365,17850.0,United Kingdom
not a date,3.0,536366,17850.0,United Kingdom
1/6/2011,2.0,536367,,France
12/9/2011 12:50,1.0,536368,12680,France
";
        let out = read_transactions(csv.as_bytes(), "test").unwrap();

        assert_eq!(out.stats.rows_read, 4);
        assert_eq!(out.stats.rows_used, 2);
        assert_eq!(out.stats.rows_dropped, 2);
        assert!(out.row_errors.is_empty());

        assert_eq!(out.rows[0].customer_id.as_deref(), Some("17850"));
        assert_eq!(out.rows[1].customer_id, None);
        assert_eq!(out.rows[1].country, "France");

        let (min, max) = (out.stats.date_min.unwrap(), out.stats.date_max.unwrap());
        assert_eq!(min, ymd(2010, 12, 1));
        assert_eq!(max, ymd(2011, 1, 6));
        assert!(out.rows.iter().all(|t| min <= t.invoice_date && t.invoice_date <= max));
    }

    #[test]
    fn read_transactions_reports_bad_prices() {
        let csv = "\
InvoiceDate,Price,InvoiceNo,CustomerID,Country
12/1/2010,abc,536365,17850,United Kingdom
12/1/2010,4.25,536365,17850,United Kingdom
";
        let out = read_transactions(csv.as_bytes(), "test").unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.row_errors.len(), 1);
        assert_eq!(out.row_errors[0].line, 2);
    }

    #[test]
    fn blank_price_keeps_the_row_at_zero() {
        let csv = "\
InvoiceDate,Price,InvoiceNo,CustomerID,Country
1/1/2020,10,A,1,US
1/2/2020,,B,2,FR
";
        let out = read_transactions(csv.as_bytes(), "test").unwrap();
        assert_eq!(out.rows.len(), 2);
        assert!(out.row_errors.is_empty());
        assert_eq!(out.rows[1].price, 0.0);
        assert_eq!(out.rows[1].invoice_no, "B");

        let kpis = crate::analytics::compute_kpis(&out.rows);
        assert_eq!(kpis.total_sales, 10.0);
        assert_eq!(kpis.total_transactions, 2);
        assert_eq!(kpis.customer_segments, 2);
    }

    #[test]
    fn two_digit_years_are_dropped() {
        assert_eq!(parse_invoice_date("1/6/11", Granularity::Transaction), None);
        assert_eq!(parse_invoice_date("10-12-01", Granularity::Daily), None);
        assert_eq!(parse_invoice_date("10-12", Granularity::Monthly), None);
        assert_eq!(parse_invoice_date("10-11-29/10-12-05", Granularity::Weekly), None);
        assert_eq!(weekly_start_date("10-11-29/10-12-05"), None);
    }

    #[test]
    fn short_year_row_does_not_widen_the_date_span() {
        let csv = "\
InvoiceDate,Price,InvoiceNo,CustomerID,Country
12/1/2010,1.0,A,1,US
1/6/11,2.0,B,2,US
";
        let out = read_transactions(csv.as_bytes(), "test").unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.stats.rows_dropped, 1);
        assert_eq!(out.stats.date_min, Some(ymd(2010, 12, 1)));
    }

    #[test]
    fn read_transactions_requires_columns() {
        let csv = "InvoiceDate,Price\n12/1/2010,1.0\n";
        let err = read_transactions(csv.as_bytes(), "final.csv").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("invoiceno"));
        assert!(err.to_string().contains("country"));
    }

    #[test]
    fn headers_are_matched_case_insensitively_with_bom() {
        let csv = "\u{feff}invoicedate,TOTALREVENUE\n2010-12-01,99.5\n";
        let out = read_aggregates(csv.as_bytes(), Granularity::Daily, "daily").unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].total_revenue, 99.5);
    }

    #[test]
    fn read_weekly_aggregates_keeps_raw_period() {
        let csv = "\
InvoiceDate,TotalRevenue
2010-11-29/2010-12-05,100
2010-12-06/2010-12-12,250.5
garbage,1
";
        let out = read_aggregates(csv.as_bytes(), Granularity::Weekly, "weekly").unwrap();
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.stats.rows_dropped, 1);
        assert_eq!(out.rows[0].period, "2010-11-29/2010-12-05");
        assert_eq!(out.rows[0].invoice_date, ymd(2010, 11, 29));
        assert_eq!(out.rows[0].total_revenue, 100.0);
    }

    #[test]
    fn read_monthly_aggregates_within_literal_bounds() {
        let csv = "\
InvoiceDate,TotalRevenue
2010-12,748957.02
2011-01,560000.26
2011-13,1.0
2011-12,433668.01
";
        let out = read_aggregates(csv.as_bytes(), Granularity::Monthly, "monthly").unwrap();
        assert_eq!(out.rows.len(), 3);
        assert_eq!(out.stats.date_min, Some(ymd(2010, 12, 1)));
        assert_eq!(out.stats.date_max, Some(ymd(2011, 12, 1)));
    }
}
