//! Error types for the voyage-pipeline crate.

use thiserror::Error;
use voyage_frame::FrameError;

/// Error type for pipeline stage operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An underlying frame error.
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// A value could not be handled by a fitted stage.
    #[error("Invalid value {value:?} in column '{column}' at row {row}")]
    InvalidValue {
        /// The column holding the value
        column: String,
        /// The offending row
        row: usize,
        /// A rendering of the value; nulls render as "null"
        value: String,
    },

    /// A null was found where a stage requires a value.
    #[error("Null value in column '{column}' at row {row}")]
    NullValue {
        /// The column holding the null
        column: String,
        /// The offending row
        row: usize,
    },

    /// A stage was fitted on a column with no usable values.
    #[error("Column '{column}' has no non-null values to fit on")]
    AllNull {
        /// The all-null column
        column: String,
    },

    /// A stage was fitted or applied on an empty frame.
    #[error("Stage '{stage}' received an empty frame")]
    EmptyFrame {
        /// The stage that was invoked
        stage: String,
    },

    /// A stage was configured without input columns.
    #[error("Stage '{stage}' has no input columns configured")]
    NoInputColumns {
        /// The misconfigured stage
        stage: String,
    },
}

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::InvalidValue {
            column: "Embarked".to_string(),
            row: 61,
            value: "null".to_string(),
        };
        assert!(err.to_string().contains("Embarked"));
        assert!(err.to_string().contains("61"));

        let err = PipelineError::AllNull {
            column: "Cabin".to_string(),
        };
        assert!(err.to_string().contains("no non-null values"));
    }
}
