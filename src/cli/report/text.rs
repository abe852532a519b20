use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::{naira, number, percent};
use crate::reports::{self, DemandReport, OverviewReport, ProfitReport, StockHealthReport};
use crate::workbook::DataBook;

// ---------------------------------------------------------------------------
// Data-fetching + formatting wrappers (used by dispatch)
// ---------------------------------------------------------------------------

pub fn overview(book: &DataBook) -> Result<String> {
    let report = reports::get_overview(
        &book.sales()?,
        &book.inventory()?,
        &book.expenses()?,
        &book.products()?,
    )?;
    Ok(format_overview(&report))
}

pub fn inventory(book: &DataBook, threshold: i64) -> Result<String> {
    let report = reports::get_stock_health(&book.inventory()?, &book.products()?, threshold)?;
    Ok(format_inventory(&report))
}

pub fn profit(book: &DataBook) -> Result<String> {
    let report = reports::get_profit(&book.sales()?, &book.expenses()?, &book.products()?)?;
    Ok(format_profit(&report))
}

pub fn demand(book: &DataBook) -> Result<String> {
    let report = reports::get_demand(&book.sales()?, &book.products()?)?;
    Ok(format_demand(&report))
}

// ---------------------------------------------------------------------------
// Pure formatting functions (report data → String)
// ---------------------------------------------------------------------------

fn signed_naira(amount: f64) -> String {
    if amount >= 0.0 {
        naira(amount).green().to_string()
    } else {
        naira(amount).red().to_string()
    }
}

pub fn format_overview(data: &OverviewReport) -> String {
    let mut kpis = Table::new();
    kpis.set_header(vec!["Metric", "Value"]);
    kpis.add_row(vec![
        Cell::new("Today's Revenue"),
        Cell::new(naira(data.revenue_today)),
    ]);
    kpis.add_row(vec![
        Cell::new("Gross Margin"),
        Cell::new(percent(data.gross_margin_pct)),
    ]);
    kpis.add_row(vec![
        Cell::new("Stockout Rate"),
        Cell::new(percent(data.stockout_rate_pct)),
    ]);
    kpis.add_row(vec![
        Cell::new("Expired Stock Value"),
        Cell::new(naira(data.expired_value)),
    ]);
    kpis.add_row(vec![
        Cell::new("Energy Cost Today"),
        Cell::new(naira(data.energy_cost_today)),
    ]);
    let mut out = format!("Executive Overview (as of {})\n{kpis}", data.latest_date);

    let mut trend = Table::new();
    trend.set_header(vec!["Date", "Revenue"]);
    for (date, revenue) in &data.revenue_trend {
        trend.add_row(vec![
            Cell::new(date.to_string()),
            Cell::new(naira(*revenue)),
        ]);
    }
    out.push_str(&format!("\n\nDaily Revenue Trend\n{trend}"));

    let mut cats = Table::new();
    cats.set_header(vec!["Category", "Revenue"]);
    for (category, revenue) in &data.top_categories {
        cats.add_row(vec![Cell::new(category), Cell::new(naira(*revenue))]);
    }
    out.push_str(&format!("\n\nTop Revenue Categories\n{cats}"));

    if data.low_stock.is_empty() {
        out.push_str("\n\nLow Stock Items\nNo products at or below the low-stock level.");
    } else {
        let mut low = Table::new();
        low.set_header(vec!["Product Name", "Current Stock", "Reorder Level"]);
        for alert in &data.low_stock {
            low.add_row(vec![
                Cell::new(&alert.product_name),
                Cell::new(number(alert.closing_stock)),
                Cell::new(number(alert.reorder_level)),
            ]);
        }
        out.push_str(&format!("\n\nLow Stock Items\n{low}"));
    }

    out
}

pub fn format_inventory(data: &StockHealthReport) -> String {
    let mut kpis = Table::new();
    kpis.set_header(vec!["Metric", "Value"]);
    kpis.add_row(vec![
        Cell::new("Total Units In Stock"),
        Cell::new(number(data.total_units_in_stock)),
    ]);
    kpis.add_row(vec![
        Cell::new("Stockout Rate"),
        Cell::new(percent(data.stockout_rate_pct)),
    ]);
    kpis.add_row(vec![
        Cell::new("Damaged & Expired Units"),
        Cell::new(number(data.damaged_expired_units)),
    ]);
    kpis.add_row(vec![
        Cell::new("Units Received Today"),
        Cell::new(number(data.received_today)),
    ]);
    kpis.add_row(vec![
        Cell::new("Units Sold Today"),
        Cell::new(number(data.sold_today)),
    ]);
    let mut out = format!("Inventory & Stock Health (as of {})\n{kpis}", data.latest_date);

    let mut movement = Table::new();
    movement.set_header(vec!["Movement Type", "Units"]);
    for (stage, units) in &data.movement {
        movement.add_row(vec![Cell::new(*stage), Cell::new(number(*units))]);
    }
    out.push_str(&format!("\n\nInventory Movement Breakdown\n{movement}"));

    let mut dist = Table::new();
    dist.set_header(vec!["Stock Status", "Number Of Products"]);
    dist.add_row(vec![
        Cell::new("In Stock".green()),
        Cell::new(data.in_stock_count),
    ]);
    dist.add_row(vec![
        Cell::new("Stockout".red()),
        Cell::new(data.stockout_count),
    ]);
    out.push_str(&format!("\n\nStock Availability Distribution\n{dist}"));

    if data.low_stock.is_empty() {
        out.push_str(&format!(
            "\n\nLow Stock Items (Threshold: {})\nNo products at or below the threshold.",
            data.threshold
        ));
    } else {
        let mut low = Table::new();
        low.set_header(vec![
            "Product Name",
            "Current Stock",
            "Units Sold Today",
            "Units Received Today",
        ]);
        for row in &data.low_stock {
            low.add_row(vec![
                Cell::new(&row.product_name),
                Cell::new(number(row.closing_stock)),
                Cell::new(number(row.sold_qty)),
                Cell::new(number(row.received_qty)),
            ]);
        }
        out.push_str(&format!(
            "\n\nLow Stock Items (Threshold: {})\n{low}",
            data.threshold
        ));
    }

    out
}

pub fn format_profit(data: &ProfitReport) -> String {
    let mut kpis = Table::new();
    kpis.set_header(vec!["Metric", "Value"]);
    kpis.add_row(vec![
        Cell::new("Total Revenue"),
        Cell::new(naira(data.total_revenue)),
    ]);
    kpis.add_row(vec![
        Cell::new("Cost Of Goods Sold"),
        Cell::new(naira(data.cogs)),
    ]);
    kpis.add_row(vec![
        Cell::new("Gross Profit"),
        Cell::new(signed_naira(data.gross_profit)),
    ]);
    kpis.add_row(vec![
        Cell::new("Gross Margin"),
        Cell::new(percent(data.gross_margin_pct)),
    ]);
    kpis.add_row(vec![
        Cell::new("Net Profit Estimate"),
        Cell::new(signed_naira(data.net_profit)),
    ]);
    let mut out = format!("Profitability & Cost Control\n{kpis}");

    if !data.monthly.is_empty() {
        let mut monthly = Table::new();
        monthly.set_header(vec!["Month", "Revenue", "Cost", "Gross Profit"]);
        for m in &data.monthly {
            monthly.add_row(vec![
                Cell::new(&m.month),
                Cell::new(naira(m.revenue)),
                Cell::new(naira(m.cost)),
                Cell::new(signed_naira(m.gross_profit)),
            ]);
        }
        out.push_str(&format!("\n\nMonthly Gross Profit Trend\n{monthly}"));
    }

    let mut exp = Table::new();
    exp.set_header(vec!["Expense Category", "Total Cost"]);
    for (category, total) in &data.expense_breakdown {
        exp.add_row(vec![Cell::new(category), Cell::new(naira(*total))]);
    }
    exp.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(naira(data.total_expenses)),
    ]);
    out.push_str(&format!("\n\nOperating Expenses By Category\n{exp}"));

    if !data.high_cost_products.is_empty() {
        let mut high = Table::new();
        high.set_header(vec!["Product Name", "Units Sold", "Total Cost"]);
        for row in &data.high_cost_products {
            high.add_row(vec![
                Cell::new(&row.product_name),
                Cell::new(number(row.units_sold)),
                Cell::new(naira(row.cost_impact)),
            ]);
        }
        out.push_str(&format!("\n\nProducts With Highest Cost Impact\n{high}"));
    }

    out
}

pub fn format_demand(data: &DemandReport) -> String {
    let mut kpis = Table::new();
    kpis.set_header(vec!["Metric", "Value"]);
    kpis.add_row(vec![
        Cell::new("Total Units Sold"),
        Cell::new(number(data.total_units)),
    ]);
    kpis.add_row(vec![
        Cell::new("Average Daily Sales"),
        Cell::new(naira(data.avg_daily_sales)),
    ]);
    kpis.add_row(vec![
        Cell::new("Peak Sales Hour"),
        Cell::new(format!("{}:00", data.peak_hour)),
    ]);
    kpis.add_row(vec![
        Cell::new("Top Selling Category"),
        Cell::new(&data.best_category),
    ]);
    let mut out = format!("Sales & Demand Patterns\n{kpis}");

    let mut hourly = Table::new();
    hourly.set_header(vec!["Hour Of Day", "Total Sales"]);
    for (hour, total) in &data.hourly {
        hourly.add_row(vec![
            Cell::new(format!("{hour:02}:00")),
            Cell::new(naira(*total)),
        ]);
    }
    out.push_str(&format!("\n\nHourly Sales Pattern\n{hourly}"));

    let mut weekdays = Table::new();
    weekdays.set_header(vec!["Day Of Week", "Total Sales"]);
    for (day, total) in &data.weekday {
        let value = match total {
            Some(v) => naira(*v),
            None => "\u{2014}".to_string(),
        };
        weekdays.add_row(vec![Cell::new(*day), Cell::new(value)]);
    }
    out.push_str(&format!("\n\nSales By Day Of Week\n{weekdays}"));

    let mut monthly = Table::new();
    monthly.set_header(vec!["Month", "Category", "Units Sold"]);
    for (month, category, units) in &data.monthly_category_units {
        monthly.add_row(vec![
            Cell::new(month),
            Cell::new(category),
            Cell::new(number(*units)),
        ]);
    }
    out.push_str(&format!("\n\nMonthly Category Demand\n{monthly}"));

    if !data.top_products.is_empty() {
        let mut top = Table::new();
        top.set_header(vec!["Product Name", "Units Sold", "Total Revenue"]);
        for row in &data.top_products {
            top.add_row(vec![
                Cell::new(&row.product_name),
                Cell::new(number(row.units_sold)),
                Cell::new(naira(row.revenue)),
            ]);
        }
        out.push_str(&format!("\n\nTop Selling Products\n{top}"));
    }

    out
}
