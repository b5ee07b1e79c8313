//! Error types for colformula-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building tables and columns
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Column length differs from the table's row count
    #[error("Column '{name}' has {actual} rows, table has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Two columns share a name
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// Categorical code pointing past the label list
    #[error("Category code {code} out of range ({count} categories)")]
    InvalidCategoryCode { code: u32, count: usize },
}
