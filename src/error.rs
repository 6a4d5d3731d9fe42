use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Missing required field '{field}' in input header")]
    MissingField { field: String },

    #[error("Invalid {field} on line {line}: '{value}' is not a day-first date")]
    InvalidDate {
        line: usize,
        field: String,
        value: String,
    },

    #[error("Invalid Value on line {line}: '{value}' is not a number")]
    InvalidValue { line: usize, value: String },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
