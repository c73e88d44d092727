//! Feature-preparation stages for the voyage pipeline.
//!
//! This crate provides the transform infrastructure that turns a raw
//! passenger table into the numeric feature block the trainers consume.
//! It includes:
//!
//! - **StringIndexer**: categorical values to frequency-ordered indices
//! - **Imputer**: constant, mean, or median null filling
//! - **VectorAssembler**: numeric columns into a fixed-width feature block
//! - **StandardScaler**: per-feature centering and unit-variance scaling
//! - **Pipeline**: ordered stage chaining with a single `fit`
//!
//! # Quick Start
//!
//! ```no_run
//! use voyage_frame::prelude::*;
//! use voyage_pipeline::prelude::*;
//!
//! let frame = DataFrame::read_csv("data/titanic.csv", CsvReadOptions::default()).unwrap();
//! let assembler = VectorAssembler::new(
//!     vec!["Pclass".into(), "SexIndex".into(), "Age".into(), "Fare".into()],
//!     "features",
//! );
//! let feature_cols = assembler.output_columns();
//!
//! let pipeline = Pipeline::new()
//!     .add_estimator(StringIndexer::new("Sex", "SexIndex"))
//!     .add_estimator(Imputer::new().with_column("Age", ImputeStrategy::Value(29.7)))
//!     .add_transformer(assembler)
//!     .add_estimator(StandardScaler::new(feature_cols));
//!
//! let model = pipeline.fit(&frame).unwrap();
//! let prepared = model.transform(&frame).unwrap();
//! ```
//!
//! # Stage Traits
//!
//! Stateless stages implement [`Transformer`]; stages that learn from data
//! implement [`Estimator`] and produce a fitted transformer. The
//! [`Pipeline`] accepts either kind and handles the fit-then-transform
//! sequencing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assembler;
pub mod error;
pub mod imputer;
pub mod indexer;
pub mod scaler;
pub mod stage;

pub use assembler::VectorAssembler;
pub use error::{PipelineError, PipelineResult};
pub use imputer::{ImputeStrategy, Imputer, ImputerModel};
pub use indexer::{HandleInvalid, StringIndexer, StringIndexerModel};
pub use scaler::{StandardScaler, StandardScalerModel};
pub use stage::{Estimator, Pipeline, PipelineModel, Transformer};

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::assembler::VectorAssembler;
    pub use crate::error::{PipelineError, PipelineResult};
    pub use crate::imputer::{ImputeStrategy, Imputer, ImputerModel};
    pub use crate::indexer::{HandleInvalid, StringIndexer, StringIndexerModel};
    pub use crate::scaler::{StandardScaler, StandardScalerModel};
    pub use crate::stage::{Estimator, Pipeline, PipelineModel, Transformer};
}
