//! Headline KPIs over the full transaction set.

use std::collections::HashSet;

use crate::domain::{Kpis, Transaction};

/// Compute the KPI tiles.
///
/// These always cover every loaded transaction; the date-range control does
/// not apply here.
pub fn compute_kpis(transactions: &[Transaction]) -> Kpis {
    let total_sales: f64 = transactions.iter().map(|t| t.price).sum();

    let total_transactions = transactions
        .iter()
        .filter(|t| !t.invoice_no.is_empty())
        .map(|t| t.invoice_no.as_str())
        .collect::<HashSet<_>>()
        .len();

    let average_order_value = (total_transactions > 0).then(|| total_sales / total_transactions as f64);

    Kpis {
        total_sales,
        total_transactions,
        average_order_value,
        customer_segments: distinct_customers(transactions.iter()),
    }
}

/// Count distinct non-missing customer ids.
pub fn distinct_customers<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> usize {
    transactions
        .filter_map(|t| t.customer_id.as_deref())
        .collect::<HashSet<_>>()
        .len()
}
