//! Customer segmentation by country (top countries + "Others").

use std::collections::{BTreeMap, HashSet};

use crate::domain::{CountrySegment, Transaction, OTHERS_LABEL};

/// Distinct customers per country, in ascending country order.
pub fn customers_by_country(transactions: &[Transaction]) -> Vec<CountrySegment> {
    let mut by_country: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for t in transactions {
        if t.country.is_empty() {
            continue;
        }
        let customers = by_country.entry(t.country.as_str()).or_default();
        if let Some(id) = t.customer_id.as_deref() {
            customers.insert(id);
        }
    }
    by_country
        .into_iter()
        .map(|(country, customers)| CountrySegment {
            country: country.to_string(),
            customers: customers.len(),
        })
        .collect()
}

/// Keep the `top_n` countries by distinct customers and fold the rest into
/// one `Others` slice.
///
/// `Others` sums the per-country distinct counts, so a customer seen in two
/// folded countries is counted twice. Ties keep ascending country order.
/// `Others` is omitted when nothing is folded.
pub fn top_countries_with_others(segments: &[CountrySegment], top_n: usize) -> Vec<CountrySegment> {
    let mut sorted = segments.to_vec();
    // `sort_by` is stable, so equal counts keep their input order.
    sorted.sort_by(|a, b| b.customers.cmp(&a.customers));

    let rest = sorted.split_off(top_n.min(sorted.len()));
    if !rest.is_empty() {
        sorted.push(CountrySegment {
            country: OTHERS_LABEL.to_string(),
            customers: rest.iter().map(|s| s.customers).sum(),
        });
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::tests::tx;
    use crate::domain::TOP_COUNTRIES;

    #[test]
    fn distinct_customers_per_country() {
        let rows = vec![
            tx("2020-01-01", "A", 1.0, Some("1"), "US"),
            tx("2020-01-01", "B", 1.0, Some("1"), "US"),
            tx("2020-01-01", "C", 1.0, Some("2"), "US"),
            tx("2020-01-01", "D", 1.0, None, "FR"),
            tx("2020-01-01", "E", 1.0, Some("9"), ""),
        ];
        let segs = customers_by_country(&rows);
        assert_eq!(
            segs,
            vec![
                CountrySegment { country: "FR".to_string(), customers: 0 },
                CountrySegment { country: "US".to_string(), customers: 2 },
            ]
        );
    }

    #[test]
    fn fifteen_countries_fold_three_into_others() {
        let segs: Vec<CountrySegment> = (0..15)
            .map(|i| CountrySegment {
                country: format!("C{i:02}"),
                customers: 100 - i,
            })
            .collect();

        let out = top_countries_with_others(&segs, TOP_COUNTRIES);
        assert_eq!(out.len(), 13);
        assert_eq!(&out[..12], &segs[..12]);
        assert_eq!(out[12].country, OTHERS_LABEL);
        assert_eq!(out[12].customers, 88 + 87 + 86);
    }

    #[test]
    fn others_double_counts_shared_customers() {
        // Customer 7 shows up in both folded countries.
        let rows = vec![
            tx("2020-01-01", "A", 1.0, Some("1"), "AA"),
            tx("2020-01-01", "B", 1.0, Some("2"), "AA"),
            tx("2020-01-01", "C", 1.0, Some("7"), "BB"),
            tx("2020-01-01", "D", 1.0, Some("7"), "CC"),
        ];
        let out = top_countries_with_others(&customers_by_country(&rows), 1);
        assert_eq!(out[0].country, "AA");
        assert_eq!(out[1], CountrySegment { country: OTHERS_LABEL.to_string(), customers: 2 });
    }

    #[test]
    fn ties_keep_country_order() {
        let segs = vec![
            CountrySegment { country: "A".to_string(), customers: 1 },
            CountrySegment { country: "B".to_string(), customers: 3 },
            CountrySegment { country: "C".to_string(), customers: 1 },
        ];
        let out = top_countries_with_others(&segs, 2);
        assert_eq!(out[0].country, "B");
        assert_eq!(out[1].country, "A");
        assert_eq!(out[2].customers, 1);
    }

    #[test]
    fn few_countries_have_no_others_slice() {
        let segs = vec![CountrySegment { country: "US".to_string(), customers: 4 }];
        let out = top_countries_with_others(&segs, TOP_COUNTRIES);
        assert_eq!(out, segs);
    }
}
