pub mod cli;
pub mod error;
pub mod fmt;
pub mod models;
pub mod reports;
pub mod settings;
pub mod tui;
pub mod workbook;

pub use error::Result;
pub use error::ShelfError;
