pub mod dashboard;
pub mod load;
pub mod report;
pub mod status;

use clap::{Parser, Subcommand};

use crate::reports::LOW_STOCK_THRESHOLD;

#[derive(Parser)]
#[command(
    name = "shelfwatch",
    about = "Terminal reporting dashboard for single-location retail workbooks."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Show the current workbook, sheet sizes and data coverage.
    Status {
        /// Path to the XLSX workbook (overrides the saved path)
        #[arg(long)]
        data: Option<String>,
    },
    /// Remember a workbook path for future runs.
    Load {
        /// Path to an XLSX workbook with the five expected sheets
        path: String,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Executive overview: headline KPIs, revenue trend, low-stock alerts.
    Overview {
        /// Path to the XLSX workbook (overrides the saved path)
        #[arg(long)]
        data: Option<String>,
        /// Write the text rendering to a file instead of the screen
        #[arg(long)]
        output: Option<String>,
    },
    /// Inventory and stock health: movement, availability, low stock.
    Inventory {
        #[arg(long)]
        data: Option<String>,
        /// Low-stock cutoff for the alert table (closing stock <= N)
        #[arg(long, default_value_t = LOW_STOCK_THRESHOLD)]
        threshold: i64,
        #[arg(long)]
        output: Option<String>,
    },
    /// Profitability and cost control: revenue, COGS, operating expenses.
    Profit {
        #[arg(long)]
        data: Option<String>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Sales and demand patterns: hourly, weekday and category demand.
    Demand {
        #[arg(long)]
        data: Option<String>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Export all four report pages as text files.
    All {
        #[arg(long)]
        data: Option<String>,
        /// Directory for the exported files (default: exports)
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
    },
}

impl ReportCommands {
    /// The `--data` workbook override, wherever it appears.
    pub fn data(&self) -> Option<&str> {
        match self {
            ReportCommands::Overview { data, .. }
            | ReportCommands::Inventory { data, .. }
            | ReportCommands::Profit { data, .. }
            | ReportCommands::Demand { data, .. }
            | ReportCommands::All { data, .. } => data.as_deref(),
        }
    }

    /// The `--output` file path for single-page exports.
    pub fn output(&self) -> Option<&str> {
        match self {
            ReportCommands::Overview { output, .. }
            | ReportCommands::Inventory { output, .. }
            | ReportCommands::Profit { output, .. }
            | ReportCommands::Demand { output, .. } => output.as_deref(),
            ReportCommands::All { .. } => None,
        }
    }
}
