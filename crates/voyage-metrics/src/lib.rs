//! Classification evaluation for the voyage pipeline.
//!
//! This crate scores fitted models against held-out labels. It includes:
//!
//! - **ConfusionMatrix**: per-class prediction/label counts
//! - **MulticlassEvaluator**: accuracy plus weighted precision, recall,
//!   and F1 over frame columns or plain slices
//! - **ModelReport**: per-model results with the one-line accuracy
//!   rendering the pipeline prints
//!
//! # Quick Start
//!
//! ```
//! use voyage_metrics::prelude::*;
//!
//! let evaluator = MulticlassEvaluator::new("prediction", "Survived");
//! let accuracy = evaluator
//!     .evaluate_pairs(&[1.0, 0.0, 1.0], &[1.0, 0.0, 0.0])
//!     .unwrap();
//! let report = ModelReport::new("DecisionTree", accuracy);
//! assert_eq!(report.report_line(), "DecisionTree accuracy: 0.67");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod confusion;
pub mod error;
pub mod evaluator;
pub mod report;

pub use confusion::ConfusionMatrix;
pub use error::{EvalError, EvalResult};
pub use evaluator::{Metric, MulticlassEvaluator};
pub use report::ModelReport;

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::confusion::ConfusionMatrix;
    pub use crate::error::{EvalError, EvalResult};
    pub use crate::evaluator::{Metric, MulticlassEvaluator};
    pub use crate::report::ModelReport;
}
