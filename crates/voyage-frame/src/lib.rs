//! Columnar tables and CSV ingestion for the voyage pipeline.
//!
//! This crate provides the in-memory table the rest of the workspace
//! operates on. It includes:
//!
//! - **Schema**: ordered, typed, nullability-aware column descriptors
//! - **Column**: typed value storage with a validity mask for nulls
//! - **DataFrame**: equal-length column collections with selection,
//!   projection, and seeded random splitting
//! - **CSV reader**: header-driven ingestion with type inference
//!
//! # Quick Start
//!
//! ```no_run
//! use voyage_frame::prelude::*;
//!
//! let frame = DataFrame::read_csv("data/titanic.csv", CsvReadOptions::default()).unwrap();
//! frame.print_schema();
//!
//! let splits = frame.random_split(&[0.8, 0.2], 42).unwrap();
//! let (train, test) = (&splits[0], &splits[1]);
//! assert_eq!(train.num_rows() + test.num_rows(), frame.num_rows());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod column;
pub mod error;
pub mod frame;
pub mod reader;
pub mod schema;

pub use column::Column;
pub use error::{FrameError, FrameResult};
pub use frame::DataFrame;
pub use reader::CsvReadOptions;
pub use schema::{DataType, Field, Schema};

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::column::Column;
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::frame::DataFrame;
    pub use crate::reader::CsvReadOptions;
    pub use crate::schema::{DataType, Field, Schema};
}
