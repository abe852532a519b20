use std::collections::{BTreeMap, HashMap};
use std::ops::AddAssign;

use chrono::NaiveDate;

use crate::models::Product;

// ---------------------------------------------------------------------------
// Shared aggregation helpers
// ---------------------------------------------------------------------------

/// Keyed accumulation into a `BTreeMap`, so iteration order is always
/// ascending by key.
pub fn sum_by<K, V, I>(items: I) -> BTreeMap<K, V>
where
    K: Ord,
    V: Default + AddAssign + Copy,
    I: IntoIterator<Item = (K, V)>,
{
    let mut totals = BTreeMap::new();
    for (key, value) in items {
        *totals.entry(key).or_default() += value;
    }
    totals
}

/// Entry with the largest value. Ties keep the first (smallest) key, since
/// the map iterates ascending and the running best is replaced only on a
/// strictly greater value.
pub fn max_entry<K: Clone, V: PartialOrd + Copy>(totals: &BTreeMap<K, V>) -> Option<(K, V)> {
    let mut best: Option<(&K, V)> = None;
    for (key, value) in totals {
        match &best {
            Some((_, top)) if *value <= *top => {}
            _ => best = Some((key, *value)),
        }
    }
    best.map(|(key, value)| (key.clone(), value))
}

/// Sort descending by score and keep the first `n`. The sort is stable, so
/// equal scores stay in their incoming order.
pub fn top_n_by<T, F>(mut items: Vec<T>, n: usize, score: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| {
        score(b)
            .partial_cmp(&score(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    items.truncate(n);
    items
}

/// Catalog lookup by product id. Sales and snapshot rows with no catalog
/// match fall out of any join built on this.
pub fn product_index(products: &[Product]) -> HashMap<i64, &Product> {
    products.iter().map(|p| (p.product_id, p)).collect()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Margin percentage with the zero-revenue policy: a period with no revenue
/// has a margin of 0.0, not a fault.
pub fn margin_pct(revenue: f64, cost: f64) -> f64 {
    if revenue == 0.0 {
        return 0.0;
    }
    round2((revenue - cost) / revenue * 100.0)
}

/// Calendar-month grouping key, `YYYY-MM`.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_rows::product;

    #[test]
    fn test_sum_by_accumulates_in_key_order() {
        let totals = sum_by(vec![("b", 2.0), ("a", 1.0), ("b", 3.0)]);
        let entries: Vec<(&str, f64)> = totals.into_iter().collect();
        assert_eq!(entries, vec![("a", 1.0), ("b", 5.0)]);
    }

    #[test]
    fn test_max_entry_ties_keep_smallest_key() {
        let totals = sum_by(vec![(9_u32, 50.0), (14, 80.0), (17, 80.0)]);
        assert_eq!(max_entry(&totals), Some((14, 80.0)));
        assert_eq!(max_entry::<u32, f64>(&BTreeMap::new()), None);
    }

    #[test]
    fn test_top_n_by_caps_and_sorts_descending() {
        let ranked = top_n_by(vec![("x", 1.0), ("y", 9.0), ("z", 5.0)], 2, |t| t.1);
        assert_eq!(ranked, vec![("y", 9.0), ("z", 5.0)]);

        let short = top_n_by(vec![("only", 3.0)], 10, |t| t.1);
        assert_eq!(short.len(), 1);
    }

    #[test]
    fn test_top_n_by_ties_are_stable() {
        let ranked = top_n_by(vec![("a", 4.0), ("b", 4.0), ("c", 4.0)], 3, |t| t.1);
        assert_eq!(ranked, vec![("a", 4.0), ("b", 4.0), ("c", 4.0)]);
    }

    #[test]
    fn test_product_index_joins_by_id() {
        let products = vec![
            product(1, "Rice 5kg", "Staples", 4200.0, 20),
            product(2, "Milk 1L", "Dairy", 950.0, 15),
        ];
        let index = product_index(&products);
        assert_eq!(index[&1].product_name, "Rice 5kg");
        assert!(!index.contains_key(&3));
    }

    #[test]
    fn test_margin_pct_zero_revenue_is_zero() {
        assert_eq!(margin_pct(0.0, 500.0), 0.0);
        assert_eq!(margin_pct(1000.0, 600.0), 40.0);
        assert_eq!(margin_pct(3.0, 2.0), 33.33);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn test_month_key() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(month_key(d), "2024-03");
    }
}
