use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{ExpenseRow, Product, SaleRow};
use crate::reports::pipeline::{margin_pct, month_key, product_index, sum_by, top_n_by};

const HIGH_COST_COUNT: usize = 10;

// ---------------------------------------------------------------------------
// Profitability & cost control
// ---------------------------------------------------------------------------

/// All-time profitability figures. Revenue counts every sale; cost figures
/// only count sales that match the product catalog, since cost price lives
/// there.
#[derive(Debug, Clone)]
pub struct ProfitReport {
    pub total_revenue: f64,
    pub cogs: f64,
    pub gross_profit: f64,
    pub gross_margin_pct: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    /// Per calendar month, ascending. Revenue and cost both over
    /// catalog-matched rows, cost aligned per row.
    pub monthly: Vec<MonthlyProfit>,
    /// Expense totals by category, ascending by category label.
    pub expense_breakdown: Vec<(String, f64)>,
    /// Products ranked by cost impact, descending, at most ten.
    pub high_cost_products: Vec<CostImpactRow>,
}

#[derive(Debug, Clone)]
pub struct MonthlyProfit {
    pub month: String,
    pub revenue: f64,
    pub cost: f64,
    pub gross_profit: f64,
}

#[derive(Debug, Clone)]
pub struct CostImpactRow {
    pub product_name: String,
    pub units_sold: i64,
    pub cost_impact: f64,
}

/// Build the profitability report. A workbook with no sales is still valid
/// here; every figure is just zero.
pub fn get_profit(
    sales: &[SaleRow],
    expenses: &[ExpenseRow],
    products: &[Product],
) -> Result<ProfitReport> {
    let index = product_index(products);

    let total_revenue: f64 = sales.iter().map(|s| s.total_amount).sum();

    let mut cogs = 0.0;
    let mut monthly_map: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    let mut by_product: BTreeMap<&str, (i64, f64)> = BTreeMap::new();
    for sale in sales {
        let Some(product) = index.get(&sale.product_id) else {
            continue;
        };
        let row_cost = sale.quantity_sold as f64 * product.cost_price;
        cogs += row_cost;

        let month = monthly_map.entry(month_key(sale.date())).or_insert((0.0, 0.0));
        month.0 += sale.total_amount;
        month.1 += row_cost;

        let item = by_product
            .entry(product.product_name.as_str())
            .or_insert((0, 0.0));
        item.0 += sale.quantity_sold;
        item.1 += row_cost;
    }

    let gross_profit = total_revenue - cogs;
    let total_expenses: f64 = expenses.iter().map(|e| e.expense_amount).sum();

    let monthly: Vec<MonthlyProfit> = monthly_map
        .into_iter()
        .map(|(month, (revenue, cost))| MonthlyProfit {
            month,
            revenue,
            cost,
            gross_profit: revenue - cost,
        })
        .collect();

    let expense_breakdown: Vec<(String, f64)> = sum_by(
        expenses
            .iter()
            .map(|e| (e.expense_category.clone(), e.expense_amount)),
    )
    .into_iter()
    .collect();

    let high_cost_products = top_n_by(
        by_product
            .into_iter()
            .map(|(name, (units_sold, cost_impact))| CostImpactRow {
                product_name: name.to_string(),
                units_sold,
                cost_impact,
            })
            .collect(),
        HIGH_COST_COUNT,
        |row| row.cost_impact,
    );

    Ok(ProfitReport {
        total_revenue,
        cogs,
        gross_profit,
        gross_margin_pct: margin_pct(total_revenue, cogs),
        total_expenses,
        net_profit: gross_profit - total_expenses,
        monthly,
        expense_breakdown,
        high_cost_products,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_rows::{expense, product, sale};

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Rice 5kg", "Staples", 4200.0, 20),
            product(2, "Milk 1L", "Dairy", 950.0, 15),
        ]
    }

    #[test]
    fn test_headline_figures() {
        let sales = vec![
            sale("2024-06-15 09:00:00", 1, "Staples", 2, 10_000.0),
            // Not in the catalog: counts toward revenue, not cost
            sale("2024-06-15 10:00:00", 99, "Unknown", 1, 500.0),
        ];
        let expenses = vec![
            expense("2024-06-15", "Rent", 1000.0),
            expense("2024-06-15", "Power & Generator Fuel", 250.0),
        ];
        let report = get_profit(&sales, &expenses, &catalog()).unwrap();
        assert_eq!(report.total_revenue, 10_500.0);
        assert_eq!(report.cogs, 8400.0);
        assert_eq!(report.gross_profit, 2100.0);
        assert_eq!(report.gross_margin_pct, 20.0);
        assert_eq!(report.total_expenses, 1250.0);
        assert_eq!(report.net_profit, 850.0);
    }

    #[test]
    fn test_no_sales_is_valid_with_zero_margin() {
        let expenses = vec![expense("2024-06-15", "Rent", 1000.0)];
        let report = get_profit(&[], &expenses, &catalog()).unwrap();
        assert_eq!(report.total_revenue, 0.0);
        assert_eq!(report.gross_margin_pct, 0.0);
        assert_eq!(report.net_profit, -1000.0);
        assert!(report.monthly.is_empty());
        assert!(report.high_cost_products.is_empty());
    }

    #[test]
    fn test_monthly_trend_ascending_with_row_level_cost() {
        let sales = vec![
            sale("2024-07-02 09:00:00", 2, "Dairy", 2, 3000.0),
            sale("2024-06-20 09:00:00", 1, "Staples", 1, 5000.0),
            // Unmatched: absent from the monthly trend entirely
            sale("2024-06-21 09:00:00", 99, "Unknown", 1, 800.0),
        ];
        let report = get_profit(&sales, &[], &catalog()).unwrap();
        assert_eq!(report.monthly.len(), 2);
        assert_eq!(report.monthly[0].month, "2024-06");
        assert_eq!(report.monthly[0].revenue, 5000.0);
        assert_eq!(report.monthly[0].cost, 4200.0);
        assert_eq!(report.monthly[0].gross_profit, 800.0);
        assert_eq!(report.monthly[1].month, "2024-07");
        assert_eq!(report.monthly[1].cost, 1900.0);
        assert_eq!(report.monthly[1].gross_profit, 1100.0);
    }

    #[test]
    fn test_expense_breakdown_ascending_by_category() {
        let expenses = vec![
            expense("2024-06-15", "Rent", 1000.0),
            expense("2024-06-16", "Cleaning", 40.0),
            expense("2024-06-17", "Rent", 500.0),
        ];
        let report = get_profit(&[], &expenses, &catalog()).unwrap();
        assert_eq!(
            report.expense_breakdown,
            vec![("Cleaning".to_string(), 40.0), ("Rent".to_string(), 1500.0)]
        );
    }

    #[test]
    fn test_high_cost_ranking_breaks_ties_alphabetically() {
        let products = vec![
            product(1, "Beans", "Staples", 100.0, 10),
            product(2, "Apples", "Produce", 100.0, 10),
            product(3, "Yam", "Staples", 50.0, 10),
        ];
        let sales = vec![
            sale("2024-06-15 09:00:00", 1, "Staples", 3, 900.0),
            sale("2024-06-15 10:00:00", 2, "Produce", 3, 900.0),
            sale("2024-06-15 11:00:00", 3, "Staples", 10, 2000.0),
        ];
        let report = get_profit(&sales, &[], &products).unwrap();
        let ranked: Vec<(&str, f64)> = report
            .high_cost_products
            .iter()
            .map(|r| (r.product_name.as_str(), r.cost_impact))
            .collect();
        assert_eq!(
            ranked,
            vec![("Yam", 500.0), ("Apples", 300.0), ("Beans", 300.0)]
        );
        assert_eq!(report.high_cost_products[0].units_sold, 10);
    }

    #[test]
    fn test_high_cost_ranking_capped_at_ten() {
        let products: Vec<Product> = (1..=12)
            .map(|i| product(i, &format!("Item {i:02}"), "General", i as f64, 5))
            .collect();
        let sales: Vec<SaleRow> = (1..=12)
            .map(|i| sale("2024-06-15 09:00:00", i, "General", 1, 100.0))
            .collect();
        let report = get_profit(&sales, &[], &products).unwrap();
        assert_eq!(report.high_cost_products.len(), 10);
        assert_eq!(report.high_cost_products[0].product_name, "Item 12");
    }
}
