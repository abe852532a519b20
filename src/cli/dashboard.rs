use std::path::Path;

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::error::Result;
use crate::fmt::{number, percent};
use crate::models::SaleRow;
use crate::reports::{self, LOW_STOCK_THRESHOLD};
use crate::settings::resolve_workbook;
use crate::tui::{
    naira_span, ReportView, ReportViewAction, FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE,
};
use crate::workbook::{load_book, DataBook};

const MENU_ITEMS: &[&str] = &[
    "Executive Overview",
    "Inventory & Stock Health",
    "Profitability & Cost Control",
    "Sales & Demand Patterns",
];

enum DashboardScreen {
    Home,
    ReportView(Box<dyn ReportView>),
}

struct HomeData {
    first_date: NaiveDate,
    latest_date: NaiveDate,
    revenue_today: f64,
    gross_margin_pct: f64,
    stockout_rate_pct: f64,
    net_profit: f64,
    units_in_stock: i64,
    month_labels: Vec<String>,
    month_revenue: Vec<u64>,
    month_cost: Vec<u64>,
    top_categories: Vec<(String, f64)>,
}

struct Dashboard {
    title: String,
    screen: DashboardScreen,
    menu_selection: usize,
    home_data: Option<HomeData>,
    status_message: Option<String>,
}

impl Dashboard {
    fn new(workbook: &Path) -> Self {
        let name = workbook
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| workbook.display().to_string());
        Self {
            title: format!("Supermarket Operations Dashboard \u{2014} {name}"),
            screen: DashboardScreen::Home,
            menu_selection: 0,
            home_data: None,
            status_message: None,
        }
    }

    fn load_data(&mut self, book: &DataBook) -> Result<()> {
        let sales = book.sales()?;
        let snapshots = book.inventory()?;
        let expenses = book.expenses()?;
        let products = book.products()?;

        let overview = reports::get_overview(&sales, &snapshots, &expenses, &products)?;
        let profit = reports::get_profit(&sales, &expenses, &products)?;
        let stock = reports::get_stock_health(&snapshots, &products, LOW_STOCK_THRESHOLD)?;

        let first_date = sales
            .iter()
            .map(SaleRow::date)
            .min()
            .unwrap_or(overview.latest_date);

        let month_labels: Vec<String> = profit
            .monthly
            .iter()
            .map(|m| {
                let parts: Vec<&str> = m.month.split('-').collect();
                if parts.len() == 2 {
                    match parts[1] {
                        "01" => "Jan",
                        "02" => "Feb",
                        "03" => "Mar",
                        "04" => "Apr",
                        "05" => "May",
                        "06" => "Jun",
                        "07" => "Jul",
                        "08" => "Aug",
                        "09" => "Sep",
                        "10" => "Oct",
                        "11" => "Nov",
                        "12" => "Dec",
                        _ => &m.month,
                    }
                    .to_string()
                } else {
                    m.month.clone()
                }
            })
            .collect();

        let month_revenue: Vec<u64> = profit
            .monthly
            .iter()
            .map(|m| m.revenue.max(0.0) as u64)
            .collect();

        let month_cost: Vec<u64> = profit
            .monthly
            .iter()
            .map(|m| m.cost.max(0.0) as u64)
            .collect();

        self.home_data = Some(HomeData {
            first_date,
            latest_date: overview.latest_date,
            revenue_today: overview.revenue_today,
            gross_margin_pct: overview.gross_margin_pct,
            stockout_rate_pct: overview.stockout_rate_pct,
            net_profit: profit.net_profit,
            units_in_stock: stock.total_units_in_stock,
            month_labels,
            month_revenue,
            month_cost,
            top_categories: overview.top_categories,
        });
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        if let DashboardScreen::ReportView(ref mut view) = self.screen {
            view.draw(frame);
            return;
        }
        self.draw_home(frame);
    }

    fn draw_home(&self, frame: &mut Frame) {
        let area = frame.area();
        let border_style = Style::default().fg(Color::DarkGray);

        let menu_rows = MENU_ITEMS.len() as u16 + 1;

        let [header_area, sep1, stats_area, sep2, charts_area, sep3, menu_area, hints_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(menu_rows),
                Constraint::Length(1),
            ])
            .areas(area);

        // Header
        frame.render_widget(
            Paragraph::new(format!(" {}", self.title)).style(HEADER_STYLE),
            header_area,
        );

        // Thick separator lines
        let sep_line = "━".repeat(area.width as usize);
        let sep_widget = Paragraph::new(sep_line.as_str()).style(border_style);
        frame.render_widget(sep_widget.clone(), sep1);
        frame.render_widget(sep_widget.clone(), sep2);
        frame.render_widget(sep_widget.clone(), sep3);

        if let Some(data) = &self.home_data {
            // KPIs + data period — same 50/50 split used for charts below
            let [left_area, right_area] = Layout::horizontal([
                Constraint::Percentage(50),
                Constraint::Percentage(50),
            ])
            .areas(stats_area);

            let stats_lines = vec![
                Line::from(vec![
                    Span::raw(format!(" {:<22}", "Today's Revenue")),
                    naira_span(data.revenue_today),
                ]),
                Line::from(format!(
                    " {:<22}{}",
                    "Gross Margin",
                    percent(data.gross_margin_pct)
                )),
                Line::from(format!(
                    " {:<22}{}",
                    "Stockout Rate",
                    percent(data.stockout_rate_pct)
                )),
                Line::from(vec![
                    Span::raw(format!(" {:<22}", "Net Profit Estimate")),
                    naira_span(data.net_profit),
                ]),
                Line::from(format!(
                    " {:<22}{}",
                    "Units In Stock",
                    number(data.units_in_stock)
                )),
            ];
            frame.render_widget(Paragraph::new(stats_lines), left_area);

            let period_lines = vec![
                Line::from(Span::styled(
                    " Data Period",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!(" {} to {}", data.first_date, data.latest_date)),
                Line::from(""),
                Line::from(" Location: Lagos, Nigeria"),
            ];
            frame.render_widget(Paragraph::new(period_lines), right_area);

            // Charts — same 50/50 split so right column aligns with Data Period
            let [chart_left, chart_right] = Layout::horizontal([
                Constraint::Percentage(50),
                Constraint::Percentage(50),
            ])
            .areas(charts_area);

            // Monthly revenue vs cost bar chart with y-axis labels
            if !data.month_labels.is_empty() {
                let revenue_style = Style::default().fg(Color::Rgb(80, 220, 100));
                let cost_style = Style::default().fg(Color::Red);

                let max_val = data
                    .month_revenue
                    .iter()
                    .chain(data.month_cost.iter())
                    .copied()
                    .max()
                    .unwrap_or(1) as f64;

                // Round ticks: pick nice round numbers for the axis
                let (top_tick, mid_tick) = y_axis_ticks(max_val);
                let top_label = format_k(top_tick);
                let mid_label = format_k(mid_tick);
                let y_label_width = top_label.len().max(mid_label.len()) as u16 + 1;

                let [y_axis_area, bar_area] = Layout::horizontal([
                    Constraint::Length(y_label_width),
                    Constraint::Fill(1),
                ])
                .areas(chart_left);

                // Y-axis labels: top tick near top, mid tick at middle
                let inner_height = bar_area.height.saturating_sub(2); // title + month labels
                let mid_row = inner_height / 2;
                let mut y_lines: Vec<Line> = Vec::new();
                y_lines.push(Line::from("")); // title row
                for row in 0..inner_height {
                    if row == 0 {
                        y_lines.push(Line::from(Span::styled(
                            format!("{:>width$}", top_label, width = y_label_width as usize),
                            FOOTER_STYLE,
                        )));
                    } else if row == mid_row {
                        y_lines.push(Line::from(Span::styled(
                            format!("{:>width$}", mid_label, width = y_label_width as usize),
                            FOOTER_STYLE,
                        )));
                    } else {
                        y_lines.push(Line::from(""));
                    }
                }
                frame.render_widget(Paragraph::new(y_lines), y_axis_area);

                let groups: Vec<BarGroup> = data
                    .month_labels
                    .iter()
                    .enumerate()
                    .map(|(i, label)| {
                        let rev = data.month_revenue.get(i).copied().unwrap_or(0);
                        let cost = data.month_cost.get(i).copied().unwrap_or(0);
                        let bars = vec![
                            Bar::default().value(rev).style(revenue_style),
                            Bar::default().value(cost).style(cost_style),
                        ];
                        BarGroup::default()
                            .label(Line::from(label.as_str()))
                            .bars(&bars)
                    })
                    .collect();

                let block = Block::default()
                    .title("Monthly Revenue vs Cost")
                    .title_style(Style::default().add_modifier(Modifier::BOLD))
                    .borders(Borders::NONE);

                let mut chart = BarChart::default()
                    .block(block)
                    .bar_width(2)
                    .bar_gap(0)
                    .group_gap(1);
                for group in &groups {
                    chart = chart.data(group.clone());
                }
                frame.render_widget(chart, bar_area);
            }

            // Top revenue categories — simple text table (no bars)
            if !data.top_categories.is_empty() {
                let name_width = data
                    .top_categories
                    .iter()
                    .map(|(n, _)| n.len())
                    .max()
                    .unwrap_or(10);

                let mut lines = vec![Line::from(Span::styled(
                    " Top Revenue Categories",
                    Style::default().add_modifier(Modifier::BOLD),
                ))];
                for (name, val) in &data.top_categories {
                    lines.push(Line::from(vec![
                        Span::raw(format!(" {:<width$}  ", name, width = name_width)),
                        naira_span(*val),
                    ]));
                }
                frame.render_widget(Paragraph::new(lines), chart_right);
            }
        }

        // Report menu
        let [menu_title_area, menu_items_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(menu_area);

        frame.render_widget(
            Paragraph::new(Span::styled(
                " Which report would you like to see?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            menu_title_area,
        );

        let menu_lines: Vec<Line> = (0..MENU_ITEMS.len())
            .map(|i| self.menu_item_line(i))
            .collect();
        frame.render_widget(Paragraph::new(menu_lines), menu_items_area);

        // Hints / status message
        if let Some(msg) = &self.status_message {
            frame.render_widget(
                Paragraph::new(format!(" {msg}")).style(Style::default().fg(Color::Yellow)),
                hints_area,
            );
        } else {
            frame.render_widget(
                Paragraph::new(" Up/Down=navigate  Enter=open  1-4=open page  q=quit")
                    .style(FOOTER_STYLE),
                hints_area,
            );
        }
    }

    fn menu_item_line(&self, i: usize) -> Line<'static> {
        let marker = if i == self.menu_selection { ">" } else { " " };
        let style = if i == self.menu_selection {
            SELECTED_STYLE
        } else {
            Style::default()
        };
        Line::from(Span::styled(
            format!(" {marker} {}. {}", i + 1, MENU_ITEMS[i]),
            style,
        ))
    }

    fn handle_home_key(&mut self, code: KeyCode, book: &DataBook) -> bool {
        self.status_message = None;
        match code {
            KeyCode::Up => {
                self.menu_selection = self.menu_selection.saturating_sub(1);
            }
            KeyCode::Down => {
                self.menu_selection = (self.menu_selection + 1).min(MENU_ITEMS.len() - 1);
            }
            KeyCode::Char('q') => return true,
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.menu_selection = idx;
                self.open_report(idx, book);
            }
            KeyCode::Enter => self.open_report(self.menu_selection, book),
            _ => {}
        }
        false
    }

    fn open_report(&mut self, idx: usize, book: &DataBook) {
        let result = match idx {
            0 => super::report::view::build_overview(book),
            1 => super::report::view::build_inventory(book, LOW_STOCK_THRESHOLD),
            2 => super::report::view::build_profit(book),
            3 => super::report::view::build_demand(book),
            _ => return,
        };
        match result {
            Ok(view) => {
                self.screen = DashboardScreen::ReportView(view);
            }
            Err(e) => {
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

/// Pick nice round y-axis tick values (top and mid) given a max data value.
fn y_axis_ticks(max_val: f64) -> (f64, f64) {
    // Round steps: 100k, 250k, 500k, 1M, 2.5M, 5M, 10M, 25M, ...
    let steps = [
        100_000.0,
        250_000.0,
        500_000.0,
        1_000_000.0,
        2_500_000.0,
        5_000_000.0,
        10_000_000.0,
        25_000_000.0,
        50_000_000.0,
        100_000_000.0,
        250_000_000.0,
    ];
    let top = steps
        .iter()
        .copied()
        .find(|&s| s >= max_val)
        .unwrap_or(max_val);
    let mid = top / 2.0;
    (top, mid)
}

/// Format a naira amount as compact "₦Xk" for thousands, "₦XM" for millions.
fn format_k(val: f64) -> String {
    if val >= 1_000_000.0 {
        let m = val / 1_000_000.0;
        if m == m.floor() {
            format!("\u{20a6}{}M", m as u64)
        } else {
            format!("\u{20a6}{:.1}M", m)
        }
    } else if val >= 1000.0 {
        let k = val / 1000.0;
        if k == k.floor() {
            format!("\u{20a6}{}k", k as u64)
        } else {
            format!("\u{20a6}{:.1}k", k)
        }
    } else {
        format!("\u{20a6}{}", val as u64)
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

pub fn run(data: Option<&str>) -> Result<()> {
    let path = resolve_workbook(data);
    let book = load_book(&path)?;

    let mut dashboard = Dashboard::new(&path);
    dashboard.load_data(&book)?;

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();

    let exit: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| dashboard.draw(frame)) {
            break Err(e.into());
        }

        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break Ok(());
                }

                let mut return_home = false;
                let should_quit = match &mut dashboard.screen {
                    DashboardScreen::Home => dashboard.handle_home_key(key.code, &book),
                    DashboardScreen::ReportView(ref mut view) => {
                        match view.handle_key(key.code) {
                            ReportViewAction::Close => {
                                return_home = true;
                            }
                            ReportViewAction::Continue => {}
                        }
                        false
                    }
                };

                if return_home {
                    dashboard.screen = DashboardScreen::Home;
                }

                if should_quit {
                    break Ok(());
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    exit
}
