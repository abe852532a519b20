use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use calamine::{Data, Reader};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Result, ShelfError};
use crate::models::{ExpenseRow, Product, SaleRow, SnapshotRow};

pub const SALES_SHEET: &str = "sales_transactions";
pub const INVENTORY_SHEET: &str = "inventory_daily_snapshot";
pub const EXPENSES_SHEET: &str = "operating_expenses";
pub const PRODUCTS_SHEET: &str = "products";
pub const SUPPLIERS_SHEET: &str = "suppliers";

type XlsxWorkbook = calamine::Sheets<std::io::BufReader<std::fs::File>>;

// ---------------------------------------------------------------------------
// Raw cells and sheets
// ---------------------------------------------------------------------------

/// One workbook cell, decoupled from the reader's value type. Date cells
/// arrive as serial numbers or ISO text depending on how the file was
/// produced; both forms are kept raw and interpreted at typed extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        self.as_f64().map(|f| f.round() as i64)
    }

    fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s.trim().to_string()),
            _ => None,
        }
    }

    fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Number(serial) => excel_serial_to_datetime(*serial),
            Cell::Text(s) => parse_datetime_text(s),
            _ => None,
        }
    }

    fn as_date(&self) -> Option<NaiveDate> {
        self.as_datetime().map(|dt| dt.date())
    }
}

/// One sheet held raw: header row plus data rows, untyped. Column positions
/// are resolved at typed extraction, so a renamed or dropped header only
/// surfaces when a report actually needs that column.
#[derive(Debug)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column(&self, header: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == header)
            .ok_or_else(|| ShelfError::Schema {
                sheet: self.name.clone(),
                column: header.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// DataBook
// ---------------------------------------------------------------------------

/// A fully-read workbook: the five named sheets, raw. Typed row extraction is
/// on demand; the suppliers sheet is never typed.
#[derive(Debug)]
pub struct DataBook {
    pub path: PathBuf,
    sales: Sheet,
    inventory: Sheet,
    expenses: Sheet,
    products: Sheet,
    suppliers: Sheet,
}

impl DataBook {
    /// Rows from `sales_transactions`. Rows whose required cells do not
    /// parse are skipped.
    pub fn sales(&self) -> Result<Vec<SaleRow>> {
        let sheet = &self.sales;
        let date_col = sheet.column("transaction_date")?;
        let product_col = sheet.column("product_id")?;
        let category_col = sheet.column("product_category")?;
        let qty_col = sheet.column("quantity_sold")?;
        let amount_col = sheet.column("total_amount")?;

        let mut rows = Vec::with_capacity(sheet.rows.len());
        for row in &sheet.rows {
            let Some(transaction_date) = row.get(date_col).and_then(Cell::as_datetime) else {
                continue;
            };
            let Some(product_id) = row.get(product_col).and_then(Cell::as_i64) else {
                continue;
            };
            let Some(product_category) = row.get(category_col).and_then(Cell::as_text) else {
                continue;
            };
            let Some(quantity_sold) = row.get(qty_col).and_then(Cell::as_i64) else {
                continue;
            };
            let Some(total_amount) = row.get(amount_col).and_then(Cell::as_f64) else {
                continue;
            };
            rows.push(SaleRow {
                transaction_date,
                product_id,
                product_category,
                quantity_sold,
                total_amount,
            });
        }
        Ok(rows)
    }

    /// Rows from `inventory_daily_snapshot`.
    pub fn inventory(&self) -> Result<Vec<SnapshotRow>> {
        let sheet = &self.inventory;
        let date_col = sheet.column("snapshot_date")?;
        let product_col = sheet.column("product_id")?;
        let opening_col = sheet.column("opening_stock")?;
        let received_col = sheet.column("received_qty")?;
        let sold_col = sheet.column("sold_qty")?;
        let damaged_col = sheet.column("damaged_qty")?;
        let expired_col = sheet.column("expired_qty")?;
        let closing_col = sheet.column("closing_stock")?;

        let mut rows = Vec::with_capacity(sheet.rows.len());
        for row in &sheet.rows {
            let Some(snapshot_date) = row.get(date_col).and_then(Cell::as_date) else {
                continue;
            };
            let Some(product_id) = row.get(product_col).and_then(Cell::as_i64) else {
                continue;
            };
            let Some(opening_stock) = row.get(opening_col).and_then(Cell::as_i64) else {
                continue;
            };
            let Some(received_qty) = row.get(received_col).and_then(Cell::as_i64) else {
                continue;
            };
            let Some(sold_qty) = row.get(sold_col).and_then(Cell::as_i64) else {
                continue;
            };
            let Some(damaged_qty) = row.get(damaged_col).and_then(Cell::as_i64) else {
                continue;
            };
            let Some(expired_qty) = row.get(expired_col).and_then(Cell::as_i64) else {
                continue;
            };
            let Some(closing_stock) = row.get(closing_col).and_then(Cell::as_i64) else {
                continue;
            };
            rows.push(SnapshotRow {
                snapshot_date,
                product_id,
                opening_stock,
                received_qty,
                sold_qty,
                damaged_qty,
                expired_qty,
                closing_stock,
            });
        }
        Ok(rows)
    }

    /// Rows from `operating_expenses`.
    pub fn expenses(&self) -> Result<Vec<ExpenseRow>> {
        let sheet = &self.expenses;
        let date_col = sheet.column("expense_date")?;
        let category_col = sheet.column("expense_category")?;
        let amount_col = sheet.column("expense_amount")?;

        let mut rows = Vec::with_capacity(sheet.rows.len());
        for row in &sheet.rows {
            let Some(expense_date) = row.get(date_col).and_then(Cell::as_date) else {
                continue;
            };
            let Some(expense_category) = row.get(category_col).and_then(Cell::as_text) else {
                continue;
            };
            let Some(expense_amount) = row.get(amount_col).and_then(Cell::as_f64) else {
                continue;
            };
            rows.push(ExpenseRow {
                expense_date,
                expense_category,
                expense_amount,
            });
        }
        Ok(rows)
    }

    /// Rows from the `products` catalog.
    pub fn products(&self) -> Result<Vec<Product>> {
        let sheet = &self.products;
        let id_col = sheet.column("product_id")?;
        let name_col = sheet.column("product_name")?;
        let category_col = sheet.column("category")?;
        let cost_col = sheet.column("cost_price")?;
        let reorder_col = sheet.column("reorder_level")?;

        let mut rows = Vec::with_capacity(sheet.rows.len());
        for row in &sheet.rows {
            let Some(product_id) = row.get(id_col).and_then(Cell::as_i64) else {
                continue;
            };
            let Some(product_name) = row.get(name_col).and_then(Cell::as_text) else {
                continue;
            };
            let Some(category) = row.get(category_col).and_then(Cell::as_text) else {
                continue;
            };
            let Some(cost_price) = row.get(cost_col).and_then(Cell::as_f64) else {
                continue;
            };
            let Some(reorder_level) = row.get(reorder_col).and_then(Cell::as_i64) else {
                continue;
            };
            rows.push(Product {
                product_id,
                product_name,
                category,
                cost_price,
                reorder_level,
            });
        }
        Ok(rows)
    }

    /// Raw row counts per sheet, in workbook order.
    pub fn sheet_counts(&self) -> [(&'static str, usize); 5] {
        [
            (SALES_SHEET, self.sales.row_count()),
            (INVENTORY_SHEET, self.inventory.row_count()),
            (EXPENSES_SHEET, self.expenses.row_count()),
            (PRODUCTS_SHEET, self.products.row_count()),
            (SUPPLIERS_SHEET, self.suppliers.row_count()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Loading and caching
// ---------------------------------------------------------------------------

static BOOK_CACHE: OnceLock<Mutex<HashMap<PathBuf, Arc<DataBook>>>> = OnceLock::new();

/// Load a workbook, reusing the in-process copy when the same path was
/// loaded before. The file is read at most once per path for the lifetime of
/// the process; callers get the same `Arc` back on every repeat, even if the
/// file has since changed or been removed. Keys are the paths as given, so
/// two spellings of the same file load twice.
pub fn load_book(path: &Path) -> Result<Arc<DataBook>> {
    let cache = BOOK_CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    if let Ok(map) = cache.lock() {
        if let Some(book) = map.get(path) {
            return Ok(Arc::clone(book));
        }
    }

    let book = Arc::new(read_book(path)?);
    if let Ok(mut map) = cache.lock() {
        map.insert(path.to_path_buf(), Arc::clone(&book));
    }
    Ok(book)
}

fn read_book(path: &Path) -> Result<DataBook> {
    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| ShelfError::DataAccess(format!("{}: {e}", path.display())))?;

    let names = workbook.sheet_names();
    for required in [
        SALES_SHEET,
        INVENTORY_SHEET,
        EXPENSES_SHEET,
        PRODUCTS_SHEET,
        SUPPLIERS_SHEET,
    ] {
        if !names.iter().any(|n| n == required) {
            return Err(ShelfError::DataAccess(format!(
                "{}: sheet '{required}' not found",
                path.display()
            )));
        }
    }

    Ok(DataBook {
        path: path.to_path_buf(),
        sales: read_sheet(&mut workbook, SALES_SHEET)?,
        inventory: read_sheet(&mut workbook, INVENTORY_SHEET)?,
        expenses: read_sheet(&mut workbook, EXPENSES_SHEET)?,
        products: read_sheet(&mut workbook, PRODUCTS_SHEET)?,
        suppliers: read_sheet(&mut workbook, SUPPLIERS_SHEET)?,
    })
}

fn read_sheet(workbook: &mut XlsxWorkbook, name: &str) -> Result<Sheet> {
    let range = workbook
        .worksheet_range(name)
        .map_err(|e| ShelfError::DataAccess(format!("sheet '{name}': {e}")))?;

    let mut row_iter = range.rows();
    let headers: Vec<String> = row_iter
        .next()
        .map(|row| row.iter().map(header_text).collect())
        .unwrap_or_default();

    let mut rows = Vec::new();
    for row in row_iter {
        let cells: Vec<Cell> = row.iter().map(convert_cell).collect();
        if cells.iter().all(|c| matches!(c, Cell::Empty)) {
            continue;
        }
        rows.push(cells);
    }

    Ok(Sheet {
        name: name.to_string(),
        headers,
        rows,
    })
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

fn header_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Convert an Excel serial date (days since 1899-12-30, fraction = time of
/// day) to a datetime. The epoch accounts for the 1900 leap year bug.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = serial.floor();
    let date = base.checked_add_signed(chrono::Duration::days(days as i64))?;
    let secs = ((serial - days) * 86_400.0).round() as u32;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(secs.min(86_399), 0)?;
    Some(date.and_time(time))
}

fn parse_datetime_text(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}
