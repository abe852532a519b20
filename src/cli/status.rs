use crate::error::Result;
use crate::fmt::format_bytes;
use crate::models::SaleRow;
use crate::settings::{load_settings, resolve_workbook};
use crate::workbook::load_book;

pub fn run(data: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let path = resolve_workbook(data);

    let saved = settings
        .workbook_path
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or("(not set)");
    println!("Saved path: {saved}");
    println!("Workbook:   {}", path.display());

    if !path.exists() {
        println!();
        println!("Workbook not found. Run `shelfwatch load <FILE>` to point at one.");
        return Ok(());
    }

    let size = std::fs::metadata(&path)?.len();
    println!("File size:  {}", format_bytes(size));

    let book = load_book(&path)?;

    println!();
    for (name, rows) in book.sheet_counts() {
        println!("  {name:<26} {rows} rows");
    }

    if let Ok(sales) = book.sales() {
        if let (Some(first), Some(last)) = (
            sales.iter().map(SaleRow::date).min(),
            sales.iter().map(SaleRow::date).max(),
        ) {
            println!();
            println!("Sales coverage:    {first} to {last}");
        }
    }
    if let Ok(snapshots) = book.inventory() {
        if let (Some(first), Some(last)) = (
            snapshots.iter().map(|s| s.snapshot_date).min(),
            snapshots.iter().map(|s| s.snapshot_date).max(),
        ) {
            println!("Snapshot coverage: {first} to {last}");
        }
    }
    if let Ok(products) = book.products() {
        println!("Products:          {}", products.len());
    }

    Ok(())
}
