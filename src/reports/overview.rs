use chrono::{Duration, NaiveDate};

use crate::error::{Result, ShelfError};
use crate::models::{ExpenseRow, Product, SaleRow, SnapshotRow};
use crate::reports::pipeline::{margin_pct, product_index, round2, sum_by, top_n_by};
use crate::reports::LOW_STOCK_THRESHOLD;

/// Expense category counted as energy spend on the overview page.
pub const ENERGY_CATEGORY: &str = "Power & Generator Fuel";

const TREND_WINDOW_DAYS: i64 = 30;
const TOP_CATEGORY_COUNT: usize = 5;

// ---------------------------------------------------------------------------
// Executive overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct OverviewReport {
    /// Latest transaction date in the sales data; "today" for every KPI.
    pub latest_date: NaiveDate,
    pub revenue_today: f64,
    pub gross_margin_pct: f64,
    pub stockout_rate_pct: f64,
    pub expired_value: f64,
    pub energy_cost_today: f64,
    /// Daily revenue for dates with sales in the 30-day window ending at
    /// `latest_date`, ascending.
    pub revenue_trend: Vec<(NaiveDate, f64)>,
    /// Top categories by revenue, descending, at most five.
    pub top_categories: Vec<(String, f64)>,
    /// Every snapshot row at or below the low-stock threshold, any date,
    /// ascending by stock on hand.
    pub low_stock: Vec<LowStockAlert>,
}

#[derive(Debug, Clone)]
pub struct LowStockAlert {
    pub product_name: String,
    pub closing_stock: i64,
    pub reorder_level: i64,
}

/// Build the executive overview. Needs at least one sales row to anchor
/// "today"; everything else degrades to zero on empty input.
pub fn get_overview(
    sales: &[SaleRow],
    snapshots: &[SnapshotRow],
    expenses: &[ExpenseRow],
    products: &[Product],
) -> Result<OverviewReport> {
    let latest_date = sales
        .iter()
        .map(SaleRow::date)
        .max()
        .ok_or_else(|| ShelfError::EmptyResult("no sales transactions in the workbook".to_string()))?;

    let index = product_index(products);

    let revenue_today: f64 = sales
        .iter()
        .filter(|s| s.date() == latest_date)
        .map(|s| s.total_amount)
        .sum();

    // Margin over catalog-matched sales only; both sides of the ratio come
    // from the joined rows.
    let mut joined_revenue = 0.0;
    let mut joined_cost = 0.0;
    for sale in sales {
        if let Some(product) = index.get(&sale.product_id) {
            joined_revenue += sale.total_amount;
            joined_cost += sale.quantity_sold as f64 * product.cost_price;
        }
    }

    let expired_value: f64 = snapshots
        .iter()
        .filter_map(|s| {
            index
                .get(&s.product_id)
                .map(|p| s.expired_qty as f64 * p.cost_price)
        })
        .sum();

    let energy_cost_today: f64 = expenses
        .iter()
        .filter(|e| e.expense_date == latest_date && e.expense_category == ENERGY_CATEGORY)
        .map(|e| e.expense_amount)
        .sum();

    let trend_start = latest_date - Duration::days(TREND_WINDOW_DAYS - 1);
    let revenue_trend: Vec<(NaiveDate, f64)> = sum_by(
        sales
            .iter()
            .filter(|s| s.date() >= trend_start)
            .map(|s| (s.date(), s.total_amount)),
    )
    .into_iter()
    .collect();

    let category_totals =
        sum_by(sales.iter().map(|s| (s.product_category.clone(), s.total_amount)));
    let top_categories = top_n_by(
        category_totals.into_iter().collect(),
        TOP_CATEGORY_COUNT,
        |entry| entry.1,
    );

    let mut low_stock: Vec<LowStockAlert> = snapshots
        .iter()
        .filter(|s| s.closing_stock <= LOW_STOCK_THRESHOLD)
        .filter_map(|s| {
            index.get(&s.product_id).map(|p| LowStockAlert {
                product_name: p.product_name.clone(),
                closing_stock: s.closing_stock,
                reorder_level: p.reorder_level,
            })
        })
        .collect();
    low_stock.sort_by_key(|a| a.closing_stock);

    Ok(OverviewReport {
        latest_date,
        revenue_today,
        gross_margin_pct: margin_pct(joined_revenue, joined_cost),
        stockout_rate_pct: stockout_rate_all(snapshots),
        expired_value,
        energy_cost_today,
        revenue_trend,
        top_categories,
        low_stock,
    })
}

/// Share of all snapshot rows, every date, at or below zero stock.
fn stockout_rate_all(snapshots: &[SnapshotRow]) -> f64 {
    if snapshots.is_empty() {
        return 0.0;
    }
    let out = snapshots.iter().filter(|s| s.closing_stock <= 0).count();
    round2(out as f64 * 100.0 / snapshots.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_rows::{expense, product, sale, snapshot};

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Rice 5kg", "Staples", 4200.0, 20),
            product(2, "Milk 1L", "Dairy", 950.0, 15),
        ]
    }

    #[test]
    fn test_revenue_today_sums_latest_date_only() {
        let sales = vec![
            sale("2024-06-15 09:00:00", 1, "Staples", 1, 1000.0),
            sale("2024-06-15 18:45:00", 2, "Dairy", 1, 500.0),
            sale("2024-06-14 12:00:00", 1, "Staples", 2, 9999.0),
        ];
        let report = get_overview(&sales, &[], &[], &catalog()).unwrap();
        assert_eq!(report.latest_date.to_string(), "2024-06-15");
        assert_eq!(report.revenue_today, 1500.0);
    }

    #[test]
    fn test_gross_margin_ignores_unmatched_products() {
        let sales = vec![
            sale("2024-06-15 09:00:00", 2, "Dairy", 2, 2500.0),
            // Product 99 is not in the catalog: out of both sides of the ratio
            sale("2024-06-15 10:00:00", 99, "Unknown", 50, 100_000.0),
        ];
        let report = get_overview(&sales, &[], &[], &catalog()).unwrap();
        // (2500 - 2*950) / 2500 = 24%
        assert_eq!(report.gross_margin_pct, 24.0);
    }

    #[test]
    fn test_stockout_rate_counts_every_snapshot_row() {
        let snapshots = vec![
            snapshot("2024-06-14", 1, 0),
            snapshot("2024-06-15", 1, 12),
            snapshot("2024-06-15", 2, -3),
            snapshot("2024-06-15", 99, 40),
        ];
        let sales = vec![sale("2024-06-15 09:00:00", 1, "Staples", 1, 100.0)];
        let report = get_overview(&sales, &snapshots, &[], &catalog()).unwrap();
        assert_eq!(report.stockout_rate_pct, 50.0);
    }

    #[test]
    fn test_expired_value_joins_cost_price() {
        let mut wasted = snapshot("2024-06-15", 2, 10);
        wasted.expired_qty = 3;
        let mut unmatched = snapshot("2024-06-15", 99, 10);
        unmatched.expired_qty = 100;
        let sales = vec![sale("2024-06-15 09:00:00", 1, "Staples", 1, 100.0)];
        let report = get_overview(&sales, &[wasted, unmatched], &[], &catalog()).unwrap();
        assert_eq!(report.expired_value, 2850.0);
    }

    #[test]
    fn test_energy_cost_filters_category_and_day() {
        let sales = vec![sale("2024-06-15 09:00:00", 1, "Staples", 1, 100.0)];
        let expenses = vec![
            expense("2024-06-15", ENERGY_CATEGORY, 200.0),
            expense("2024-06-15", "Rent", 5000.0),
            expense("2024-06-14", ENERGY_CATEGORY, 750.0),
        ];
        let report = get_overview(&sales, &[], &expenses, &catalog()).unwrap();
        assert_eq!(report.energy_cost_today, 200.0);
    }

    #[test]
    fn test_revenue_trend_window_edges() {
        let sales = vec![
            sale("2024-06-30 10:00:00", 1, "Staples", 1, 300.0),
            // 29 days before the latest date: inside the window
            sale("2024-06-01 10:00:00", 1, "Staples", 1, 200.0),
            // 30 days before: outside
            sale("2024-05-31 10:00:00", 1, "Staples", 1, 100.0),
        ];
        let report = get_overview(&sales, &[], &[], &catalog()).unwrap();
        let dates: Vec<String> = report
            .revenue_trend
            .iter()
            .map(|(d, _)| d.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-06-01", "2024-06-30"]);
        let total: f64 = report.revenue_trend.iter().map(|(_, v)| v).sum();
        assert_eq!(total, 500.0);
    }

    #[test]
    fn test_top_categories_capped_at_five() {
        let sales: Vec<_> = ["A", "B", "C", "D", "E", "F"]
            .iter()
            .enumerate()
            .map(|(i, cat)| sale("2024-06-15 09:00:00", 1, cat, 1, (i + 1) as f64 * 100.0))
            .collect();
        let report = get_overview(&sales, &[], &[], &catalog()).unwrap();
        assert_eq!(report.top_categories.len(), 5);
        assert_eq!(report.top_categories[0], ("F".to_string(), 600.0));
        assert_eq!(report.top_categories[4], ("B".to_string(), 200.0));
    }

    #[test]
    fn test_low_stock_sorted_ascending() {
        let snapshots = vec![
            snapshot("2024-06-15", 1, 25),
            snapshot("2024-06-15", 2, 4),
            snapshot("2024-06-15", 1, 31),
            snapshot("2024-06-14", 99, 2),
        ];
        let sales = vec![sale("2024-06-15 09:00:00", 1, "Staples", 1, 100.0)];
        let report = get_overview(&sales, &snapshots, &[], &catalog()).unwrap();
        let stocks: Vec<i64> = report.low_stock.iter().map(|a| a.closing_stock).collect();
        assert_eq!(stocks, vec![4, 25]);
        assert_eq!(report.low_stock[0].product_name, "Milk 1L");
        assert_eq!(report.low_stock[0].reorder_level, 15);
    }

    #[test]
    fn test_empty_sales_is_an_empty_result() {
        let err = get_overview(&[], &[], &[], &catalog()).unwrap_err();
        assert!(matches!(err, ShelfError::EmptyResult(_)));
    }
}
