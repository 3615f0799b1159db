use thiserror::Error;

/// Problems found while reading a source table.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Row {row}: invalid {column} '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Column {column}: unsupported type {data_type}")]
    UnsupportedType { column: String, data_type: String },
}
