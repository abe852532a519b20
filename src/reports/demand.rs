use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};

use crate::error::{Result, ShelfError};
use crate::models::{Product, SaleRow};
use crate::reports::pipeline::{max_entry, month_key, product_index, sum_by, top_n_by};

const TOP_PRODUCT_COUNT: usize = 10;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// ---------------------------------------------------------------------------
// Sales & demand patterns
// ---------------------------------------------------------------------------

/// When and what the shop sells: time-of-day, day-of-week and monthly
/// demand, derived from transaction timestamps.
#[derive(Debug, Clone)]
pub struct DemandReport {
    pub total_units: i64,
    /// Mean of per-calendar-day revenue over days with sales.
    pub avg_daily_sales: f64,
    /// Hour of day with the highest revenue; ties go to the earliest hour.
    pub peak_hour: u32,
    /// Catalog category with the most units sold; ties go to the
    /// lexicographically first.
    pub best_category: String,
    /// Revenue by hour of day, ascending, only hours with sales.
    pub hourly: Vec<(u32, f64)>,
    /// Revenue by weekday, always seven rows Monday through Sunday; days
    /// without sales are `None`, not zero.
    pub weekday: Vec<(&'static str, Option<f64>)>,
    /// Units by calendar month and catalog category, ascending.
    pub monthly_category_units: Vec<(String, String, i64)>,
    /// Products ranked by units sold, descending, at most ten.
    pub top_products: Vec<TopProductRow>,
}

#[derive(Debug, Clone)]
pub struct TopProductRow {
    pub product_name: String,
    pub units_sold: i64,
    pub revenue: f64,
}

/// Build the demand report. Fails with `EmptyResult` when there are no
/// sales at all, or when no sale matches the product catalog (the category
/// ranking has nothing to rank).
pub fn get_demand(sales: &[SaleRow], products: &[Product]) -> Result<DemandReport> {
    if sales.is_empty() {
        return Err(ShelfError::EmptyResult(
            "no sales transactions in the workbook".to_string(),
        ));
    }

    let total_units: i64 = sales.iter().map(|s| s.quantity_sold).sum();

    let daily = sum_by(sales.iter().map(|s| (s.date(), s.total_amount)));
    let avg_daily_sales = daily.values().sum::<f64>() / daily.len() as f64;

    let hourly_map = sum_by(
        sales
            .iter()
            .map(|s| (s.transaction_date.hour(), s.total_amount)),
    );
    let (peak_hour, _) = max_entry(&hourly_map).ok_or_else(|| {
        ShelfError::EmptyResult("no sales transactions in the workbook".to_string())
    })?;
    let hourly: Vec<(u32, f64)> = hourly_map.into_iter().collect();

    let day_totals = sum_by(
        sales
            .iter()
            .map(|s| (s.date().weekday().num_days_from_monday(), s.total_amount)),
    );
    let weekday: Vec<(&'static str, Option<f64>)> = WEEKDAYS
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, day_totals.get(&(i as u32)).copied()))
        .collect();

    let index = product_index(products);
    let mut category_units: BTreeMap<String, i64> = BTreeMap::new();
    let mut month_category: BTreeMap<(String, String), i64> = BTreeMap::new();
    let mut by_product: BTreeMap<&str, (i64, f64)> = BTreeMap::new();
    for sale in sales {
        let Some(product) = index.get(&sale.product_id) else {
            continue;
        };
        *category_units.entry(product.category.clone()).or_default() += sale.quantity_sold;
        *month_category
            .entry((month_key(sale.date()), product.category.clone()))
            .or_default() += sale.quantity_sold;
        let item = by_product
            .entry(product.product_name.as_str())
            .or_insert((0, 0.0));
        item.0 += sale.quantity_sold;
        item.1 += sale.total_amount;
    }

    let (best_category, _) = max_entry(&category_units).ok_or_else(|| {
        ShelfError::EmptyResult("no sales match the product catalog".to_string())
    })?;

    let monthly_category_units: Vec<(String, String, i64)> = month_category
        .into_iter()
        .map(|((month, category), units)| (month, category, units))
        .collect();

    let top_products = top_n_by(
        by_product
            .into_iter()
            .map(|(name, (units_sold, revenue))| TopProductRow {
                product_name: name.to_string(),
                units_sold,
                revenue,
            })
            .collect(),
        TOP_PRODUCT_COUNT,
        |row| row.units_sold as f64,
    );

    Ok(DemandReport {
        total_units,
        avg_daily_sales,
        peak_hour,
        best_category,
        hourly,
        weekday,
        monthly_category_units,
        top_products,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_rows::{product, sale};

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Rice 5kg", "Staples", 4200.0, 20),
            product(2, "Milk 1L", "Dairy", 950.0, 15),
        ]
    }

    #[test]
    fn test_totals_and_daily_average() {
        let sales = vec![
            sale("2024-06-10 09:00:00", 1, "Staples", 2, 100.0),
            sale("2024-06-10 15:00:00", 1, "Staples", 1, 200.0),
            sale("2024-06-11 09:00:00", 2, "Dairy", 3, 500.0),
        ];
        let report = get_demand(&sales, &catalog()).unwrap();
        assert_eq!(report.total_units, 6);
        assert_eq!(report.avg_daily_sales, 400.0);
    }

    #[test]
    fn test_peak_hour_tie_goes_to_earliest() {
        let sales = vec![
            sale("2024-06-10 09:10:00", 1, "Staples", 1, 300.0),
            sale("2024-06-10 14:05:00", 1, "Staples", 1, 500.0),
            sale("2024-06-11 17:40:00", 1, "Staples", 1, 500.0),
        ];
        let report = get_demand(&sales, &catalog()).unwrap();
        assert_eq!(report.peak_hour, 14);
        assert_eq!(report.hourly, vec![(9, 300.0), (14, 500.0), (17, 500.0)]);
    }

    #[test]
    fn test_best_category_uses_catalog_and_units() {
        // Category comes from the catalog, not the sale row, and the
        // ranking is by units, not revenue.
        let sales = vec![
            sale("2024-06-10 09:00:00", 1, "Mislabelled", 5, 100.0),
            sale("2024-06-10 10:00:00", 2, "Mislabelled", 3, 10_000.0),
        ];
        let report = get_demand(&sales, &catalog()).unwrap();
        assert_eq!(report.best_category, "Staples");
    }

    #[test]
    fn test_weekday_pattern_has_seven_rows_with_gaps() {
        let sales = vec![
            sale("2024-06-10 09:00:00", 1, "Staples", 1, 120.0), // Monday
            sale("2024-06-16 09:00:00", 1, "Staples", 1, 80.0),  // Sunday
        ];
        let report = get_demand(&sales, &catalog()).unwrap();
        assert_eq!(report.weekday.len(), 7);
        assert_eq!(report.weekday[0], ("Monday", Some(120.0)));
        assert_eq!(report.weekday[1], ("Tuesday", None));
        assert_eq!(report.weekday[6], ("Sunday", Some(80.0)));
    }

    #[test]
    fn test_monthly_category_units_ascending() {
        let sales = vec![
            sale("2024-07-01 09:00:00", 1, "Staples", 2, 100.0),
            sale("2024-06-10 09:00:00", 2, "Dairy", 4, 100.0),
            sale("2024-06-12 09:00:00", 1, "Staples", 1, 100.0),
        ];
        let report = get_demand(&sales, &catalog()).unwrap();
        assert_eq!(
            report.monthly_category_units,
            vec![
                ("2024-06".to_string(), "Dairy".to_string(), 4),
                ("2024-06".to_string(), "Staples".to_string(), 1),
                ("2024-07".to_string(), "Staples".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_top_products_ranked_by_units() {
        let sales = vec![
            sale("2024-06-10 09:00:00", 1, "Staples", 2, 9000.0),
            sale("2024-06-10 10:00:00", 2, "Dairy", 6, 6000.0),
            sale("2024-06-10 11:00:00", 2, "Dairy", 1, 950.0),
            sale("2024-06-10 12:00:00", 99, "Unknown", 50, 1.0),
        ];
        let report = get_demand(&sales, &catalog()).unwrap();
        assert_eq!(report.top_products.len(), 2);
        assert_eq!(report.top_products[0].product_name, "Milk 1L");
        assert_eq!(report.top_products[0].units_sold, 7);
        assert_eq!(report.top_products[0].revenue, 6950.0);
        assert_eq!(report.top_products[1].product_name, "Rice 5kg");
    }

    #[test]
    fn test_empty_sales_is_an_empty_result() {
        let err = get_demand(&[], &catalog()).unwrap_err();
        assert!(matches!(err, ShelfError::EmptyResult(_)));
    }

    #[test]
    fn test_no_catalog_match_is_an_empty_result() {
        let sales = vec![sale("2024-06-10 09:00:00", 99, "Unknown", 1, 100.0)];
        let err = get_demand(&sales, &catalog()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Nothing to report: no sales match the product catalog"
        );
    }
}
