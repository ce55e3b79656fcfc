use thiserror::Error;

/// Structural mismatch between the data a computation expects and the table
/// it was handed. Only a corrected dataset resolves these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// A required column is not present in the table.
    #[error("missing column '{column}'")]
    MissingColumn { column: String },

    /// A numeric operation was requested on a non-numeric column.
    #[error("column '{column}' is not numeric")]
    NotNumeric { column: String },

    /// A key column holds the same value on more than one row.
    #[error("duplicate value {value} in key column '{column}'")]
    DuplicateKey { column: String, value: String },

    /// A categorical column holds a value outside its allowed set.
    #[error("invalid value '{value}' in column '{column}' (expected one of: {allowed})")]
    InvalidCategory {
        column: String,
        value: String,
        allowed: String,
    },
}

impl SchemaError {
    pub fn missing(column: &str) -> Self {
        SchemaError::MissingColumn {
            column: column.to_string(),
        }
    }

    pub fn not_numeric(column: &str) -> Self {
        SchemaError::NotNumeric {
            column: column.to_string(),
        }
    }
}
