use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crossterm::event::KeyCode;

use crate::cli::ReportCommands;
use crate::error::{Result, ShelfError};
use crate::fmt::{naira, number, percent};
use crate::reports;
use crate::settings::resolve_workbook;
use crate::tui::{
    naira_span, run_report_view, ReportView, ReportViewAction, AMOUNT_NEG_STYLE,
    AMOUNT_POS_STYLE, FOOTER_STYLE, HEADER_STYLE,
};
use crate::workbook::{load_book, DataBook};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Dispatch a report command to an interactive ratatui view.
pub fn dispatch(cmd: &ReportCommands) -> Result<()> {
    let mut view = build_view(cmd)?;
    run_report_view(view.as_mut())
}

/// Build a report view from a command. Used by both CLI dispatch and the
/// dashboard. `report all` is export-only and never gets a view.
pub(crate) fn build_view(cmd: &ReportCommands) -> Result<Box<dyn ReportView>> {
    let book = load_book(&resolve_workbook(cmd.data()))?;
    match cmd {
        ReportCommands::Overview { .. } => build_overview(&book),
        ReportCommands::Inventory { threshold, .. } => build_inventory(&book, *threshold),
        ReportCommands::Profit { .. } => build_profit(&book),
        ReportCommands::Demand { .. } => build_demand(&book),
        ReportCommands::All { .. } => Err(ShelfError::Other(
            "`report all` is export-only \u{2014} pass --output-dir".into(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Table-based report view (shared by all report types)
// ---------------------------------------------------------------------------

const BOLD: Style = Style::new().add_modifier(Modifier::BOLD);
const SECTION_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);
const HEADER_ROW_STYLE: Style = Style::new()
    .fg(Color::DarkGray)
    .add_modifier(Modifier::BOLD);

pub(crate) struct TableReportView {
    title: String,
    header: Row<'static>,
    rows: Vec<Row<'static>>,
    widths: Vec<Constraint>,
    offset: usize,
    visible_count: usize,
}

impl TableReportView {
    fn new(
        title: impl Into<String>,
        header: Row<'static>,
        rows: Vec<Row<'static>>,
        widths: Vec<Constraint>,
    ) -> Self {
        Self {
            title: title.into(),
            header,
            rows,
            widths,
            offset: 0,
            visible_count: 20,
        }
    }
}

impl ReportView for TableReportView {
    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [header_area, sep_area, content_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(format!(" {}", self.title)).style(HEADER_STYLE),
            header_area,
        );

        frame.render_widget(
            Paragraph::new("━".repeat(area.width as usize)).style(FOOTER_STYLE),
            sep_area,
        );

        // Header takes ~2 lines: header + bottom_margin
        let header_overhead = 2u16;
        let visible = content_area.height.saturating_sub(header_overhead) as usize;
        self.visible_count = visible.max(1);

        let visible_rows: Vec<Row> = self
            .rows
            .iter()
            .skip(self.offset)
            .take(visible)
            .cloned()
            .collect();

        let table = Table::new(visible_rows, self.widths.clone())
            .header(self.header.clone())
            .column_spacing(2);

        frame.render_widget(table, content_area);

        let max = self.rows.len().saturating_sub(visible);
        let pos_info = if max > 0 {
            format!("  line {}/{}", self.offset + 1, self.rows.len())
        } else {
            String::new()
        };
        frame.render_widget(
            Paragraph::new(format!(
                " \u{2191}/\u{2193}=scroll  q/Esc=close{pos_info}"
            ))
            .style(FOOTER_STYLE),
            footer_area,
        );
    }

    fn handle_key(&mut self, code: KeyCode) -> ReportViewAction {
        let page = self.visible_count;
        let max = self.rows.len().saturating_sub(page);
        match code {
            KeyCode::Char('q') | KeyCode::Esc => ReportViewAction::Close,
            KeyCode::Up | KeyCode::Char('k') => {
                self.offset = self.offset.saturating_sub(1);
                ReportViewAction::Continue
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.offset = (self.offset + 1).min(max);
                ReportViewAction::Continue
            }
            KeyCode::PageUp => {
                self.offset = self.offset.saturating_sub(page);
                ReportViewAction::Continue
            }
            KeyCode::PageDown => {
                self.offset = (self.offset + page).min(max);
                ReportViewAction::Continue
            }
            KeyCode::Home => {
                self.offset = 0;
                ReportViewAction::Continue
            }
            KeyCode::End => {
                self.offset = max;
                ReportViewAction::Continue
            }
            _ => ReportViewAction::Continue,
        }
    }
}

// ---------------------------------------------------------------------------
// Helper: create cells with consistent styling
// ---------------------------------------------------------------------------

fn naira_cell(amount: f64) -> Cell<'static> {
    Cell::from(naira_span(amount))
}

fn text_cell(s: impl Into<String>) -> Cell<'static> {
    Cell::from(s.into())
}

fn bold_cell(s: impl Into<String>) -> Cell<'static> {
    Cell::from(Span::styled(s.into(), BOLD))
}

fn section_row(label: &str, num_cols: usize) -> Row<'static> {
    let mut cells: Vec<Cell> = vec![Cell::from(Span::styled(label.to_string(), SECTION_STYLE))];
    for _ in 1..num_cols {
        cells.push(Cell::from(""));
    }
    Row::new(cells)
}

fn sub_header_row(labels: &[&str], num_cols: usize) -> Row<'static> {
    let mut cells: Vec<Cell> = labels
        .iter()
        .map(|l| Cell::from(Span::styled(l.to_string(), HEADER_ROW_STYLE)))
        .collect();
    for _ in labels.len()..num_cols {
        cells.push(Cell::from(""));
    }
    Row::new(cells)
}

fn blank_row(num_cols: usize) -> Row<'static> {
    Row::new(vec![Cell::from(""); num_cols])
}

fn pad(mut cells: Vec<Cell<'static>>, num_cols: usize) -> Row<'static> {
    while cells.len() < num_cols {
        cells.push(Cell::from(""));
    }
    Row::new(cells)
}

// ---------------------------------------------------------------------------
// Report builders
// ---------------------------------------------------------------------------

pub(crate) fn build_overview(book: &DataBook) -> Result<Box<dyn ReportView>> {
    let data = reports::get_overview(
        &book.sales()?,
        &book.inventory()?,
        &book.expenses()?,
        &book.products()?,
    )?;

    let cols = 3;
    let widths = vec![
        Constraint::Fill(1),
        Constraint::Length(16),
        Constraint::Length(16),
    ];
    let header = Row::new(["Metric", "Value", ""])
        .style(HEADER_ROW_STYLE)
        .bottom_margin(1);

    let mut rows = Vec::new();
    rows.push(pad(
        vec![text_cell("Today's Revenue"), naira_cell(data.revenue_today)],
        cols,
    ));
    rows.push(pad(
        vec![
            text_cell("Gross Margin"),
            text_cell(percent(data.gross_margin_pct)),
        ],
        cols,
    ));
    rows.push(pad(
        vec![
            text_cell("Stockout Rate"),
            text_cell(percent(data.stockout_rate_pct)),
        ],
        cols,
    ));
    rows.push(pad(
        vec![
            text_cell("Expired Stock Value"),
            naira_cell(data.expired_value),
        ],
        cols,
    ));
    rows.push(pad(
        vec![
            text_cell("Energy Cost Today"),
            naira_cell(data.energy_cost_today),
        ],
        cols,
    ));

    rows.push(blank_row(cols));
    rows.push(section_row("DAILY REVENUE TREND", cols));
    rows.push(blank_row(cols));
    rows.push(sub_header_row(&["Date", "Revenue"], cols));
    for (date, revenue) in &data.revenue_trend {
        rows.push(pad(
            vec![text_cell(date.to_string()), naira_cell(*revenue)],
            cols,
        ));
    }

    rows.push(blank_row(cols));
    rows.push(section_row("TOP REVENUE CATEGORIES", cols));
    rows.push(blank_row(cols));
    rows.push(sub_header_row(&["Category", "Revenue"], cols));
    for (category, revenue) in &data.top_categories {
        rows.push(pad(
            vec![text_cell(category.clone()), naira_cell(*revenue)],
            cols,
        ));
    }

    rows.push(blank_row(cols));
    rows.push(section_row("LOW STOCK ITEMS", cols));
    rows.push(blank_row(cols));
    if data.low_stock.is_empty() {
        rows.push(pad(
            vec![text_cell("No products at or below the low-stock level.")],
            cols,
        ));
    } else {
        rows.push(sub_header_row(
            &["Product Name", "Current Stock", "Reorder Level"],
            cols,
        ));
        for alert in &data.low_stock {
            rows.push(pad(
                vec![
                    text_cell(alert.product_name.clone()),
                    text_cell(number(alert.closing_stock)),
                    text_cell(number(alert.reorder_level)),
                ],
                cols,
            ));
        }
    }

    Ok(Box::new(TableReportView::new(
        format!("Executive Overview (as of {})", data.latest_date),
        header,
        rows,
        widths,
    )))
}

pub(crate) fn build_inventory(book: &DataBook, threshold: i64) -> Result<Box<dyn ReportView>> {
    let data = reports::get_stock_health(&book.inventory()?, &book.products()?, threshold)?;

    let cols = 4;
    let widths = vec![
        Constraint::Fill(1),
        Constraint::Length(16),
        Constraint::Length(18),
        Constraint::Length(20),
    ];
    let header = Row::new(["Metric", "Value", "", ""])
        .style(HEADER_ROW_STYLE)
        .bottom_margin(1);

    let mut rows = Vec::new();
    rows.push(pad(
        vec![
            text_cell("Total Units In Stock"),
            text_cell(number(data.total_units_in_stock)),
        ],
        cols,
    ));
    rows.push(pad(
        vec![
            text_cell("Stockout Rate"),
            text_cell(percent(data.stockout_rate_pct)),
        ],
        cols,
    ));
    rows.push(pad(
        vec![
            text_cell("Damaged & Expired Units"),
            text_cell(number(data.damaged_expired_units)),
        ],
        cols,
    ));
    rows.push(pad(
        vec![
            text_cell("Units Received Today"),
            text_cell(number(data.received_today)),
        ],
        cols,
    ));
    rows.push(pad(
        vec![
            text_cell("Units Sold Today"),
            text_cell(number(data.sold_today)),
        ],
        cols,
    ));

    rows.push(blank_row(cols));
    rows.push(section_row("INVENTORY MOVEMENT BREAKDOWN", cols));
    rows.push(blank_row(cols));
    rows.push(sub_header_row(&["Movement Type", "Units"], cols));
    for (stage, units) in &data.movement {
        rows.push(pad(
            vec![text_cell(*stage), text_cell(number(*units))],
            cols,
        ));
    }

    rows.push(blank_row(cols));
    rows.push(section_row("STOCK AVAILABILITY DISTRIBUTION", cols));
    rows.push(blank_row(cols));
    rows.push(sub_header_row(&["Stock Status", "Number Of Products"], cols));
    rows.push(pad(
        vec![
            Cell::from(Span::styled("In Stock", AMOUNT_POS_STYLE)),
            text_cell(data.in_stock_count.to_string()),
        ],
        cols,
    ));
    rows.push(pad(
        vec![
            Cell::from(Span::styled("Stockout", AMOUNT_NEG_STYLE)),
            text_cell(data.stockout_count.to_string()),
        ],
        cols,
    ));

    rows.push(blank_row(cols));
    rows.push(section_row(
        &format!("LOW STOCK ITEMS (THRESHOLD: {})", data.threshold),
        cols,
    ));
    rows.push(blank_row(cols));
    if data.low_stock.is_empty() {
        rows.push(pad(
            vec![text_cell("No products at or below the threshold.")],
            cols,
        ));
    } else {
        rows.push(sub_header_row(
            &[
                "Product Name",
                "Current Stock",
                "Units Sold Today",
                "Units Received Today",
            ],
            cols,
        ));
        for row in &data.low_stock {
            rows.push(pad(
                vec![
                    text_cell(row.product_name.clone()),
                    text_cell(number(row.closing_stock)),
                    text_cell(number(row.sold_qty)),
                    text_cell(number(row.received_qty)),
                ],
                cols,
            ));
        }
    }

    Ok(Box::new(TableReportView::new(
        format!("Inventory & Stock Health (as of {})", data.latest_date),
        header,
        rows,
        widths,
    )))
}

pub(crate) fn build_profit(book: &DataBook) -> Result<Box<dyn ReportView>> {
    let data = reports::get_profit(&book.sales()?, &book.expenses()?, &book.products()?)?;

    let cols = 4;
    let widths = vec![
        Constraint::Fill(1),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(16),
    ];
    let header = Row::new(["Metric", "Value", "", ""])
        .style(HEADER_ROW_STYLE)
        .bottom_margin(1);

    let mut rows = Vec::new();
    rows.push(pad(
        vec![text_cell("Total Revenue"), naira_cell(data.total_revenue)],
        cols,
    ));
    rows.push(pad(
        vec![text_cell("Cost Of Goods Sold"), naira_cell(data.cogs)],
        cols,
    ));
    rows.push(pad(
        vec![text_cell("Gross Profit"), naira_cell(data.gross_profit)],
        cols,
    ));
    rows.push(pad(
        vec![
            text_cell("Gross Margin"),
            text_cell(percent(data.gross_margin_pct)),
        ],
        cols,
    ));
    rows.push(pad(
        vec![
            text_cell("Net Profit Estimate"),
            naira_cell(data.net_profit),
        ],
        cols,
    ));

    if !data.monthly.is_empty() {
        rows.push(blank_row(cols));
        rows.push(section_row("MONTHLY GROSS PROFIT TREND", cols));
        rows.push(blank_row(cols));
        rows.push(sub_header_row(
            &["Month", "Revenue", "Cost", "Gross Profit"],
            cols,
        ));
        for m in &data.monthly {
            rows.push(Row::new([
                text_cell(m.month.clone()),
                naira_cell(m.revenue),
                naira_cell(-m.cost),
                naira_cell(m.gross_profit),
            ]));
        }
    }

    rows.push(blank_row(cols));
    rows.push(section_row("OPERATING EXPENSES BY CATEGORY", cols));
    rows.push(blank_row(cols));
    rows.push(sub_header_row(&["Expense Category", "Total Cost"], cols));
    for (category, total) in &data.expense_breakdown {
        rows.push(pad(
            vec![text_cell(category.clone()), naira_cell(-*total)],
            cols,
        ));
    }
    rows.push(blank_row(cols));
    rows.push(pad(
        vec![bold_cell("Total"), naira_cell(-data.total_expenses)],
        cols,
    ));

    if !data.high_cost_products.is_empty() {
        rows.push(blank_row(cols));
        rows.push(section_row("PRODUCTS WITH HIGHEST COST IMPACT", cols));
        rows.push(blank_row(cols));
        rows.push(sub_header_row(
            &["Product Name", "Units Sold", "Total Cost"],
            cols,
        ));
        for row in &data.high_cost_products {
            rows.push(pad(
                vec![
                    text_cell(row.product_name.clone()),
                    text_cell(number(row.units_sold)),
                    text_cell(naira(row.cost_impact)),
                ],
                cols,
            ));
        }
    }

    Ok(Box::new(TableReportView::new(
        "Profitability & Cost Control",
        header,
        rows,
        widths,
    )))
}

pub(crate) fn build_demand(book: &DataBook) -> Result<Box<dyn ReportView>> {
    let data = reports::get_demand(&book.sales()?, &book.products()?)?;

    let cols = 3;
    let widths = vec![
        Constraint::Fill(1),
        Constraint::Length(20),
        Constraint::Length(16),
    ];
    let header = Row::new(["Metric", "Value", ""])
        .style(HEADER_ROW_STYLE)
        .bottom_margin(1);

    let mut rows = Vec::new();
    rows.push(pad(
        vec![
            text_cell("Total Units Sold"),
            text_cell(number(data.total_units)),
        ],
        cols,
    ));
    rows.push(pad(
        vec![
            text_cell("Average Daily Sales"),
            naira_cell(data.avg_daily_sales),
        ],
        cols,
    ));
    rows.push(pad(
        vec![
            text_cell("Peak Sales Hour"),
            text_cell(format!("{}:00", data.peak_hour)),
        ],
        cols,
    ));
    rows.push(pad(
        vec![
            text_cell("Top Selling Category"),
            text_cell(data.best_category.clone()),
        ],
        cols,
    ));

    rows.push(blank_row(cols));
    rows.push(section_row("HOURLY SALES PATTERN", cols));
    rows.push(blank_row(cols));
    rows.push(sub_header_row(&["Hour Of Day", "Total Sales"], cols));
    for (hour, total) in &data.hourly {
        rows.push(pad(
            vec![text_cell(format!("{hour:02}:00")), naira_cell(*total)],
            cols,
        ));
    }

    rows.push(blank_row(cols));
    rows.push(section_row("SALES BY DAY OF WEEK", cols));
    rows.push(blank_row(cols));
    rows.push(sub_header_row(&["Day Of Week", "Total Sales"], cols));
    for (day, total) in &data.weekday {
        let cell = match total {
            Some(v) => naira_cell(*v),
            None => text_cell("\u{2014}"),
        };
        rows.push(pad(vec![text_cell(*day), cell], cols));
    }

    rows.push(blank_row(cols));
    rows.push(section_row("MONTHLY CATEGORY DEMAND", cols));
    rows.push(blank_row(cols));
    rows.push(sub_header_row(&["Month", "Category", "Units Sold"], cols));
    for (month, category, units) in &data.monthly_category_units {
        rows.push(pad(
            vec![
                text_cell(month.clone()),
                text_cell(category.clone()),
                text_cell(number(*units)),
            ],
            cols,
        ));
    }

    if !data.top_products.is_empty() {
        rows.push(blank_row(cols));
        rows.push(section_row("TOP SELLING PRODUCTS", cols));
        rows.push(blank_row(cols));
        rows.push(sub_header_row(
            &["Product Name", "Units Sold", "Total Revenue"],
            cols,
        ));
        for row in &data.top_products {
            rows.push(pad(
                vec![
                    text_cell(row.product_name.clone()),
                    text_cell(number(row.units_sold)),
                    text_cell(naira(row.revenue)),
                ],
                cols,
            ));
        }
    }

    Ok(Box::new(TableReportView::new(
        "Sales & Demand Patterns",
        header,
        rows,
        widths,
    )))
}
