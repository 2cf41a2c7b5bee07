use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Required column not found: {0}")]
    MissingColumn(String),

    #[error("Invalid row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error("Duplicate drug name: {0}")]
    DuplicateName(String),

    #[error("Catalog contains no records")]
    EmptyCatalog,

    #[error("Drug not found: {0}")]
    DrugNotFound(String),

    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
