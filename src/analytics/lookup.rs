//! Customer/country lookup table.
//!
//! The two selectors are independent: picking a customer does not narrow the
//! country list or vice versa.

use std::collections::HashSet;

use crate::domain::Transaction;

/// Selector options, each in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupOptions {
    pub customers: Vec<String>,
    pub countries: Vec<String>,
}

impl LookupOptions {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        Self {
            customers: unique_in_order(transactions.iter().filter_map(|t| t.customer_id.as_deref())),
            countries: unique_in_order(transactions.iter().map(|t| t.country.as_str())),
        }
    }
}

/// Rows matching both the selected customer and the selected country.
///
/// An empty result is a normal outcome.
pub fn lookup<'a>(transactions: &'a [Transaction], customer_id: &str, country: &str) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| t.customer_id.as_deref() == Some(customer_id) && t.country == country)
        .collect()
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(str::to_string)
        .collect()
}
