//! Error types for the voyage-frame crate.

use thiserror::Error;

/// Error type for frame operations.
#[derive(Debug, Error)]
pub enum FrameError {
    /// A column with the requested name does not exist.
    #[error("Column not found: {name}")]
    ColumnNotFound {
        /// The name that was looked up
        name: String,
    },

    /// A column already exists where a new one would be added.
    #[error("Duplicate column: {name}")]
    DuplicateColumn {
        /// The conflicting column name
        name: String,
    },

    /// A column has a different type than the operation requires.
    #[error("Type mismatch on column '{name}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// The column involved
        name: String,
        /// The type the operation required
        expected: String,
        /// The type the column actually has
        actual: String,
    },

    /// Columns of a frame must all have the same number of rows.
    #[error("Length mismatch: column '{name}' has {actual} rows, frame has {expected}")]
    LengthMismatch {
        /// The offending column
        name: String,
        /// The frame's row count
        expected: usize,
        /// The column's row count
        actual: usize,
    },

    /// A cell could not be parsed while reading a file.
    #[error("Parse error at line {line}, column '{column}': cannot parse {value:?} as {expected}")]
    ParseError {
        /// 1-based line number in the source file
        line: usize,
        /// The column being parsed
        column: String,
        /// The raw cell contents
        value: String,
        /// The type the cell was expected to hold
        expected: String,
    },

    /// The input file contained no usable rows.
    #[error("Empty input: {path}")]
    EmptyInput {
        /// The file that was read
        path: String,
    },

    /// Split weights must be positive and non-empty.
    #[error("Invalid split weights: {message}")]
    InvalidSplit {
        /// Description of the problem
        message: String,
    },

    /// A row index was out of bounds.
    #[error("Row index {index} out of bounds for frame of {rows} rows")]
    RowOutOfBounds {
        /// The requested row
        index: usize,
        /// The frame's row count
        rows: usize,
    },

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An underlying CSV reader error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for frame operations.
pub type FrameResult<T> = Result<T, FrameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FrameError::ColumnNotFound {
            name: "Age".to_string(),
        };
        assert!(err.to_string().contains("Age"));

        let err = FrameError::TypeMismatch {
            name: "Fare".to_string(),
            expected: "double".to_string(),
            actual: "string".to_string(),
        };
        assert!(err.to_string().contains("expected double"));

        let err = FrameError::ParseError {
            line: 12,
            column: "Age".to_string(),
            value: "abc".to_string(),
            expected: "double".to_string(),
        };
        assert!(err.to_string().contains("line 12"));
    }
}
