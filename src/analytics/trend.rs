//! Date-range filter and the sales-trend series.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{DateRange, RevenuePoint, Transaction};

/// Earliest and latest transaction date, or `None` when there are no rows.
///
/// This is the default value of the date-range control.
pub fn date_bounds(transactions: &[Transaction]) -> Option<DateRange> {
    let min = transactions.iter().map(|t| t.invoice_date).min()?;
    let max = transactions.iter().map(|t| t.invoice_date).max()?;
    DateRange::new(min, max)
}

/// Transactions whose date lies in the inclusive range.
pub fn filter_by_range<'a>(transactions: &'a [Transaction], range: &DateRange) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| range.contains(t.invoice_date))
        .collect()
}

/// Revenue per day within `range`, ascending by date.
pub fn sales_trend(transactions: &[Transaction], range: &DateRange) -> Vec<RevenuePoint> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for t in filter_by_range(transactions, range) {
        *by_day.entry(t.invoice_date).or_insert(0.0) += t.price;
    }
    by_day
        .into_iter()
        .map(|(date, revenue)| RevenuePoint { date, revenue })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::tests::{d, tx};

    fn rows() -> Vec<Transaction> {
        vec![
            tx("2020-01-02", "B", 20.0, Some("2"), "US"),
            tx("2020-01-01", "A", 10.0, Some("1"), "US"),
        ]
    }

    #[test]
    fn single_day_range() {
        let range = DateRange::new(d("2020-01-01"), d("2020-01-01")).unwrap();
        let trend = sales_trend(&rows(), &range);
        assert_eq!(trend, vec![RevenuePoint { date: d("2020-01-01"), revenue: 10.0 }]);
    }

    #[test]
    fn full_range_is_sorted_and_summed() {
        let mut rows = rows();
        rows.push(tx("2020-01-02", "C", 5.0, Some("3"), "FR"));
        let range = date_bounds(&rows).unwrap();
        assert_eq!(range.start, d("2020-01-01"));
        assert_eq!(range.end, d("2020-01-02"));

        let trend = sales_trend(&rows, &range);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date, d("2020-01-01"));
        assert_eq!(trend[1].revenue, 25.0);
    }

    #[test]
    fn range_outside_data_is_empty() {
        let range = DateRange::new(d("2021-01-01"), d("2021-12-31")).unwrap();
        assert!(sales_trend(&rows(), &range).is_empty());
        assert!(filter_by_range(&rows(), &range).is_empty());
    }

    #[test]
    fn no_rows_means_no_bounds() {
        assert_eq!(date_bounds(&[]), None);
    }
}
