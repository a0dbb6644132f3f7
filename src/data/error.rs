use thiserror::Error;

/// Everything that can go wrong while turning a source file into a dataset
/// or a dataset back into an export.
#[derive(Debug, Error)]
pub enum DataError {
    /// Neither an upload nor the fallback file is available.
    #[error("no data source: upload a file or place one at {fallback}")]
    MissingDataSource { fallback: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("row {row}: cannot parse date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("spreadsheet has no sheet with data")]
    EmptySheet,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DataError {
    /// Schema or content problems in an otherwise readable file.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            DataError::MissingColumn(_)
                | DataError::InvalidDate { .. }
                | DataError::InvalidNumber { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
