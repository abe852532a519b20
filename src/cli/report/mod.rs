pub mod text;
pub mod view;

use std::io::IsTerminal;
use std::path::PathBuf;

use crate::error::{Result, ShelfError};
use crate::reports::LOW_STOCK_THRESHOLD;
use crate::settings::resolve_workbook;
use crate::workbook::load_book;

use super::ReportCommands;

pub fn dispatch(cmd: ReportCommands) -> Result<()> {
    // `report all` is always an export
    if let ReportCommands::All { data, output_dir } = cmd {
        return export_all(data.as_deref(), output_dir);
    }

    if let Some(output) = cmd.output() {
        export_text(&cmd, output)
    } else if std::io::stdout().is_terminal() {
        view::dispatch(&cmd)
    } else {
        // Non-TTY: plain text to stdout
        let s = dispatch_text(&cmd)?;
        println!("{s}");
        Ok(())
    }
}

pub(crate) fn dispatch_text(cmd: &ReportCommands) -> Result<String> {
    let book = load_book(&resolve_workbook(cmd.data()))?;
    match cmd {
        ReportCommands::Overview { .. } => text::overview(&book),
        ReportCommands::Inventory { threshold, .. } => text::inventory(&book, *threshold),
        ReportCommands::Profit { .. } => text::profit(&book),
        ReportCommands::Demand { .. } => text::demand(&book),
        ReportCommands::All { .. } => {
            Err(ShelfError::Other("`report all` is export-only".into()))
        }
    }
}

fn export_text(cmd: &ReportCommands, output: &str) -> Result<()> {
    let s = dispatch_text(cmd)?;
    let p = PathBuf::from(output);
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&p, &s)?;
    println!("Wrote {}", p.display());
    Ok(())
}

fn export_all(data: Option<&str>, output_dir: Option<String>) -> Result<()> {
    let book = load_book(&resolve_workbook(data))?;
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let dir = output_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("exports"));
    std::fs::create_dir_all(&dir)?;

    let reports: Vec<(&str, Result<String>)> = vec![
        ("overview", text::overview(&book)),
        ("inventory", text::inventory(&book, LOW_STOCK_THRESHOLD)),
        ("profit", text::profit(&book)),
        ("demand", text::demand(&book)),
    ];

    for (name, result) in reports {
        match result {
            Ok(content) => {
                let path = dir.join(format!("{name}-{date}.txt"));
                std::fs::write(&path, content)?;
                println!("Wrote {}", path.display());
            }
            Err(e) => eprintln!("Skipping {name}: {e}"),
        }
    }
    Ok(())
}
