//! Error types for validation operations.

use quality_core::SemanticType;
use thiserror::Error;

/// Errors that can occur during validation.
///
/// Rule evaluators report data-quality failures through this type; its
/// `Display` text is the diagnostic recorded in a validation result.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Column names differ from the expected ordered list
    #[error("Column mismatch. Expected: [{}], Got: [{}]", .expected.join(", "), .actual.join(", "))]
    ColumnMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Referenced column does not exist in the dataset
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    /// Column contains nulls
    #[error("Column '{column}' has {count} null values")]
    NullValues { column: String, count: usize },

    /// A value is not coercible to the expected semantic type
    #[error("Column '{column}' has value '{value}' at row {row} that is not {expected}")]
    TypeMismatch {
        column: String,
        expected: SemanticType,
        value: String,
        row: usize,
    },

    /// Column contains values outside the allowed set
    #[error("Column '{column}' has values not in the expected set: [{}]", .values.join(", "))]
    ValuesNotInSet { column: String, values: Vec<String> },

    /// Column contains duplicates
    #[error("Column '{column}' has {count} duplicate values")]
    DuplicateValues { column: String, count: usize },

    /// Columns of a dataset have different lengths
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Two columns share a name
    #[error("Column '{0}' appears more than once")]
    DuplicateColumn(String),

    /// Dataset source missing or unreadable
    #[error("Failed to read dataset source '{path}': {message}")]
    Source { path: String, message: String },
}

impl ValidationError {
    /// Creates a new missing column error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn(column.into())
    }

    /// Creates a new source error.
    pub fn source(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            path: path.into(),
            message: message.into(),
        }
    }
}
