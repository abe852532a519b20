use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("Data access error: {0}")]
    DataAccess(String),

    #[error("Missing column '{column}' in sheet '{sheet}'")]
    Schema { sheet: String, column: String },

    #[error("Nothing to report: {0}")]
    EmptyResult(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ShelfError>;
