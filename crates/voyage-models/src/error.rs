//! Error types for the voyage-models crate.

use thiserror::Error;
use voyage_frame::FrameError;

/// Error type for model training and prediction.
#[derive(Debug, Error)]
pub enum ModelError {
    /// An underlying frame error.
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Feature width does not match what the model was trained on.
    #[error("Dimension mismatch: model expects {expected} features, got {actual}")]
    DimensionMismatch {
        /// The feature count the model was trained on
        expected: usize,
        /// The feature count that was provided
        actual: usize,
    },

    /// The training set has no rows or no features.
    #[error("Empty training set: {message}")]
    EmptyTrainingSet {
        /// Description of what was empty
        message: String,
    },

    /// A binary-only trainer received more than two classes.
    #[error("{model} supports binary labels only, got {classes} classes")]
    BinaryOnly {
        /// The trainer that was invoked
        model: String,
        /// The number of classes seen
        classes: usize,
    },

    /// A label value is not a non-negative integer class index.
    #[error("Invalid label {value} at row {row}: labels must be non-negative integers")]
    InvalidLabel {
        /// The row holding the label
        row: usize,
        /// The offending value
        value: f64,
    },

    /// A feature cell was null where a value is required.
    #[error("Null feature in column '{column}' at row {row}")]
    NullFeature {
        /// The feature column
        column: String,
        /// The offending row
        row: usize,
    },

    /// A trainer was configured with invalid hyperparameters.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem
        message: String,
    },
}

/// Result type alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
