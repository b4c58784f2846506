//! Error types for table encoding and matrix assembly

use thiserror::Error;

/// Errors raised while encoding a table or assembling a matrix from it.
///
/// Every variant is a deterministic function of the input. Nothing here is
/// transient, so nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    /// A named column does not exist in the schema
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Assembly was requested over zero rows
    #[error("empty input: cannot infer matrix width from zero rows")]
    EmptyInput,

    /// A stored value could not be converted to a float
    #[error("non-numeric value {value} in column '{column}' at row {row}")]
    NonNumericValue {
        column: String,
        row: usize,
        value: String,
    },

    /// Two columns of one schema share a name
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// A row does not have one value per schema column
    #[error("row {row}: expected {expected} values, found {found}")]
    ArityMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Internal consistency fault
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for encoding operations
pub type Result<T> = std::result::Result<T, EncodingError>;
