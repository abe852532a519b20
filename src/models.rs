use chrono::{NaiveDate, NaiveDateTime};

/// One line from the `sales_transactions` sheet.
#[derive(Debug, Clone)]
pub struct SaleRow {
    pub transaction_date: NaiveDateTime,
    pub product_id: i64,
    pub product_category: String,
    pub quantity_sold: i64,
    pub total_amount: f64,
}

impl SaleRow {
    /// Calendar date of the transaction, time of day dropped.
    pub fn date(&self) -> NaiveDate {
        self.transaction_date.date()
    }
}

/// One line from the `inventory_daily_snapshot` sheet: per-product stock
/// movement for one day. Closing stock is taken as recorded, not recomputed
/// from the other columns.
#[derive(Debug, Clone)]
pub struct SnapshotRow {
    pub snapshot_date: NaiveDate,
    pub product_id: i64,
    pub opening_stock: i64,
    pub received_qty: i64,
    pub sold_qty: i64,
    pub damaged_qty: i64,
    pub expired_qty: i64,
    pub closing_stock: i64,
}

/// One line from the `operating_expenses` sheet.
#[derive(Debug, Clone)]
pub struct ExpenseRow {
    pub expense_date: NaiveDate,
    pub expense_category: String,
    pub expense_amount: f64,
}

/// One line from the `products` catalog sheet.
#[derive(Debug, Clone)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub category: String,
    pub cost_price: f64,
    pub reorder_level: i64,
}
