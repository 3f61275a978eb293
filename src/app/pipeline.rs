//! Shared "dashboard pipeline" logic used by the TUI, `report` and `export`.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load extracts -> normalize dates -> static aggregates -> per-range view
//!
//! The front-ends then focus on presentation (printing vs widgets).

use serde::Serialize;

use crate::analytics::{self, LookupOptions};
use crate::config::DataPaths;
use crate::domain::{
    CountrySegment, DateRange, Granularity, Kpis, PeriodRevenue, RevenuePoint, Transaction, TOP_COUNTRIES,
};
use crate::error::AppError;
use crate::io::ingest::{self, IngestStats, Ingested};

/// Message shown instead of the page when no transaction has a usable date.
pub const NO_VALID_DATES: &str = "The dataset contains no valid dates.";

/// The four loaded extracts plus every aggregate that does not depend on the
/// date-range control.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub transactions: Ingested<Transaction>,
    pub monthly: Ingested<PeriodRevenue>,
    pub weekly: Ingested<PeriodRevenue>,
    pub daily: Ingested<PeriodRevenue>,
    pub kpis: Kpis,
    pub monthly_sales: Vec<RevenuePoint>,
    pub weekly_sales: Vec<RevenuePoint>,
    pub daily_sales: Vec<RevenuePoint>,
    pub segments: Vec<CountrySegment>,
    pub options: LookupOptions,
}

/// Everything rendered for one date-range selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub range: DateRange,
    pub kpis: Kpis,
    pub trend: Vec<RevenuePoint>,
    pub monthly: Vec<RevenuePoint>,
    pub weekly: Vec<RevenuePoint>,
    pub daily: Vec<RevenuePoint>,
    pub segments: Vec<CountrySegment>,
}

impl Dashboard {
    /// Read and normalize all four extracts from disk.
    pub fn load(paths: &DataPaths) -> Result<Self, AppError> {
        paths.validate()?;
        let transactions = ingest::load_transactions(&paths.transactions)?;
        let monthly = ingest::load_aggregates(&paths.monthly, Granularity::Monthly)?;
        let weekly = ingest::load_aggregates(&paths.weekly, Granularity::Weekly)?;
        let daily = ingest::load_aggregates(&paths.daily, Granularity::Daily)?;
        Ok(Self::from_parts(transactions, monthly, weekly, daily))
    }

    /// Build a dashboard from already-ingested data.
    pub fn from_parts(
        transactions: Ingested<Transaction>,
        monthly: Ingested<PeriodRevenue>,
        weekly: Ingested<PeriodRevenue>,
        daily: Ingested<PeriodRevenue>,
    ) -> Self {
        let tx = &transactions.rows;
        let kpis = analytics::compute_kpis(tx);
        let segments =
            analytics::top_countries_with_others(&analytics::customers_by_country(tx), TOP_COUNTRIES);
        let options = LookupOptions::from_transactions(tx);

        Self {
            kpis,
            monthly_sales: analytics::period_sales(&monthly.rows),
            weekly_sales: analytics::weekly_sales(&weekly.rows),
            daily_sales: analytics::period_sales(&daily.rows),
            segments,
            options,
            transactions,
            monthly,
            weekly,
            daily,
        }
    }

    /// Min/max transaction dates; the blocking error state when there are none.
    pub fn default_range(&self) -> Result<DateRange, AppError> {
        analytics::date_bounds(&self.transactions.rows).ok_or_else(|| AppError::new(3, NO_VALID_DATES))
    }

    /// Resolve optional `--from`/`--to` against the data bounds.
    pub fn resolve_range(
        &self,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
    ) -> Result<DateRange, AppError> {
        let bounds = self.default_range()?;
        let start = from.unwrap_or(bounds.start);
        let end = to.unwrap_or(bounds.end);
        DateRange::new(start, end)
            .ok_or_else(|| AppError::new(2, format!("Invalid date range: {start} is after {end}.")))
    }

    /// Compute the view for a date range. Only the trend depends on `range`.
    pub fn view(&self, range: DateRange) -> DashboardView {
        DashboardView {
            range,
            kpis: self.kpis.clone(),
            trend: analytics::sales_trend(&self.transactions.rows, &range),
            monthly: self.monthly_sales.clone(),
            weekly: self.weekly_sales.clone(),
            daily: self.daily_sales.clone(),
            segments: self.segments.clone(),
        }
    }

    pub fn lookup(&self, customer_id: &str, country: &str) -> Vec<&Transaction> {
        analytics::lookup(&self.transactions.rows, customer_id, country)
    }

    /// Ingest accounting for all four files, in display order.
    pub fn ingest_stats(&self) -> [&IngestStats; 4] {
        [
            &self.transactions.stats,
            &self.monthly.stats,
            &self.weekly.stats,
            &self.daily.stats,
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use chrono::NaiveDate;

    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn fixture_dir(name: &str, final_csv: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ecom-dash-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("final_dataset.csv"), final_csv).unwrap();
        fs::write(
            dir.join("monthly_aggregation.csv"),
            "InvoiceDate,TotalRevenue\n2020-01,30\nbad,1\n",
        )
        .unwrap();
        fs::write(
            dir.join("weekly_aggregation.csv"),
            "InvoiceDate,TotalRevenue\n2019-12-30/2020-01-05,30\n",
        )
        .unwrap();
        fs::write(
            dir.join("daily_aggregation.csv"),
            "InvoiceDate,TotalRevenue\n2020-01-02,20\n2020-01-01,10\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn load_and_view_end_to_end() {
        let dir = fixture_dir(
            "e2e",
            "InvoiceDate,Price,InvoiceNo,CustomerID,Country\n\
             1/1/2020,10,A,1,US\n\
             1/2/2020,20,B,2,US\n\
             2020-01-03,99,C,3,US\n",
        );
        let dash = Dashboard::load(&DataPaths::in_dir(&dir)).unwrap();

        assert_eq!(dash.transactions.stats.rows_dropped, 1);
        assert_eq!(dash.monthly.stats.rows_dropped, 1);
        assert_eq!(dash.kpis.total_sales, 30.0);
        assert_eq!(dash.kpis.average_order_value, Some(15.0));

        let range = dash.default_range().unwrap();
        assert_eq!(range, DateRange::new(d(2020, 1, 1), d(2020, 1, 2)).unwrap());

        let view = dash.view(DateRange::new(d(2020, 1, 1), d(2020, 1, 1)).unwrap());
        assert_eq!(view.trend, vec![RevenuePoint { date: d(2020, 1, 1), revenue: 10.0 }]);
        // Period charts ignore the range.
        assert_eq!(view.daily.len(), 2);
        assert_eq!(view.weekly, vec![RevenuePoint { date: d(2019, 12, 30), revenue: 30.0 }]);
        assert_eq!(view.segments.len(), 1);

        assert_eq!(dash.lookup("1", "US").len(), 1);
        assert!(dash.lookup("1", "FR").is_empty());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn no_valid_dates_is_the_blocking_error() {
        let dir = fixture_dir(
            "nodates",
            "InvoiceDate,Price,InvoiceNo,CustomerID,Country\n2020-01-01,10,A,1,US\n",
        );
        let dash = Dashboard::load(&DataPaths::in_dir(&dir)).unwrap();
        let err = dash.default_range().unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), NO_VALID_DATES);
        assert_eq!(dash.kpis.average_order_value, None);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn inverted_range_is_rejected() {
        let dir = fixture_dir(
            "inverted",
            "InvoiceDate,Price,InvoiceNo,CustomerID,Country\n1/1/2020,10,A,1,US\n1/5/2020,1,B,1,US\n",
        );
        let dash = Dashboard::load(&DataPaths::in_dir(&dir)).unwrap();
        let range = dash.resolve_range(Some(d(2020, 1, 3)), None).unwrap();
        assert_eq!(range.end, d(2020, 1, 5));
        assert!(dash.resolve_range(Some(d(2020, 2, 1)), None).is_err());

        fs::remove_dir_all(dir).ok();
    }
}
