use chrono::NaiveDate;

use crate::error::{Result, ShelfError};
use crate::models::{Product, SnapshotRow};
use crate::reports::pipeline::{product_index, round2};
use crate::reports::LOW_STOCK_THRESHOLD;

// ---------------------------------------------------------------------------
// Inventory & stock health
// ---------------------------------------------------------------------------

/// Stock position on the most recent snapshot date. Every figure on this
/// page reads from that single day.
#[derive(Debug, Clone)]
pub struct StockHealthReport {
    pub latest_date: NaiveDate,
    pub total_units_in_stock: i64,
    /// Share of latest-day rows at or below the low-stock threshold.
    pub stockout_rate_pct: f64,
    pub damaged_expired_units: i64,
    pub received_today: i64,
    pub sold_today: i64,
    /// Movement buckets in pipeline order, opening through closing. Not
    /// validated for mass balance.
    pub movement: Vec<(&'static str, i64)>,
    /// Rows at or below zero stock vs the rest.
    pub stockout_count: usize,
    pub in_stock_count: usize,
    /// Threshold the low-stock table was built with.
    pub threshold: i64,
    pub low_stock: Vec<LowStockRow>,
}

#[derive(Debug, Clone)]
pub struct LowStockRow {
    pub product_name: String,
    pub closing_stock: i64,
    pub sold_qty: i64,
    pub received_qty: i64,
}

/// Build the stock-health report for the latest snapshot day. `threshold`
/// only widens or narrows the low-stock table; the KPI rate stays on the
/// fixed threshold.
pub fn get_stock_health(
    snapshots: &[SnapshotRow],
    products: &[Product],
    threshold: i64,
) -> Result<StockHealthReport> {
    let latest_date = snapshots
        .iter()
        .map(|s| s.snapshot_date)
        .max()
        .ok_or_else(|| {
            ShelfError::EmptyResult("no inventory snapshots in the workbook".to_string())
        })?;

    let today: Vec<&SnapshotRow> = snapshots
        .iter()
        .filter(|s| s.snapshot_date == latest_date)
        .collect();

    let total_units_in_stock: i64 = today.iter().map(|s| s.closing_stock).sum();
    let low_rows = today
        .iter()
        .filter(|s| s.closing_stock <= LOW_STOCK_THRESHOLD)
        .count();
    let stockout_rate_pct = round2(low_rows as f64 * 100.0 / today.len() as f64);

    let damaged: i64 = today.iter().map(|s| s.damaged_qty).sum();
    let expired: i64 = today.iter().map(|s| s.expired_qty).sum();
    let received_today: i64 = today.iter().map(|s| s.received_qty).sum();
    let sold_today: i64 = today.iter().map(|s| s.sold_qty).sum();

    let movement = vec![
        ("Opening Stock", today.iter().map(|s| s.opening_stock).sum()),
        ("Received", received_today),
        ("Sold", sold_today),
        ("Damaged", damaged),
        ("Expired", expired),
        ("Closing Stock", total_units_in_stock),
    ];

    let stockout_count = today.iter().filter(|s| s.closing_stock <= 0).count();
    let in_stock_count = today.len() - stockout_count;

    let index = product_index(products);
    let mut low_stock: Vec<LowStockRow> = today
        .iter()
        .filter(|s| s.closing_stock <= threshold)
        .filter_map(|s| {
            index.get(&s.product_id).map(|p| LowStockRow {
                product_name: p.product_name.clone(),
                closing_stock: s.closing_stock,
                sold_qty: s.sold_qty,
                received_qty: s.received_qty,
            })
        })
        .collect();
    low_stock.sort_by_key(|r| r.closing_stock);

    Ok(StockHealthReport {
        latest_date,
        total_units_in_stock,
        stockout_rate_pct,
        damaged_expired_units: damaged + expired,
        received_today,
        sold_today,
        movement,
        stockout_count,
        in_stock_count,
        threshold,
        low_stock,
    })
}
