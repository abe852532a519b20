use std::path::PathBuf;

use crate::error::{Result, ShelfError};
use crate::settings::{save_workbook_path, shellexpand_path};
use crate::workbook::load_book;

pub fn run(path: &str) -> Result<()> {
    let resolved = PathBuf::from(shellexpand_path(path));

    if !resolved.exists() {
        return Err(ShelfError::Settings(format!(
            "No workbook found at {}",
            resolved.display()
        )));
    }

    // Validate up front: all five sheets must be present and readable
    let book = load_book(&resolved)?;

    save_workbook_path(&resolved.to_string_lossy())?;

    println!("Workbook set to {}", book.path.display());
    Ok(())
}
