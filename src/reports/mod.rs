pub mod demand;
pub mod inventory;
pub mod overview;
pub mod pipeline;
pub mod profit;

pub use demand::{get_demand, DemandReport, TopProductRow};
pub use inventory::{get_stock_health, LowStockRow, StockHealthReport};
pub use overview::{get_overview, LowStockAlert, OverviewReport};
pub use profit::{get_profit, CostImpactRow, MonthlyProfit, ProfitReport};

/// Stock level at or below which a product counts as low. The overview and
/// inventory pages both read this; the inventory table's `--threshold` flag
/// defaults to it.
pub const LOW_STOCK_THRESHOLD: i64 = 30;
