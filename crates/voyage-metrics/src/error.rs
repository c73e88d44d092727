//! Error types for the voyage-metrics crate.

use thiserror::Error;
use voyage_frame::FrameError;

/// Error type for evaluation operations.
#[derive(Debug, Error)]
pub enum EvalError {
    /// An underlying frame error.
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Prediction and label sequences differ in length.
    #[error("Length mismatch: {predictions} predictions vs {labels} labels")]
    LengthMismatch {
        /// The prediction count
        predictions: usize,
        /// The label count
        labels: usize,
    },

    /// There is nothing to evaluate.
    #[error("Empty evaluation input")]
    EmptyInput,

    /// A prediction or label cell was null.
    #[error("Null value in column '{column}' at row {row}")]
    NullValue {
        /// The column holding the null
        column: String,
        /// The offending row
        row: usize,
    },
}

/// Result type alias for evaluation operations.
pub type EvalResult<T> = Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EvalError::LengthMismatch {
            predictions: 10,
            labels: 8,
        };
        assert!(err.to_string().contains("10 predictions vs 8 labels"));
        assert!(EvalError::EmptyInput.to_string().contains("Empty"));
    }
}
