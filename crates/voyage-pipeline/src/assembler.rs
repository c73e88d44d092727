//! Feature-vector assembly.
//!
//! [`VectorAssembler`] concatenates numeric input columns into a
//! fixed-width block of double columns named `{prefix}_{slot}`. The block
//! is the feature representation every trainer in the workspace consumes.
//! Assembly is stateless, so the assembler is a plain [`Transformer`].

use crate::error::{PipelineError, PipelineResult};
use crate::stage::Transformer;
use serde::{Deserialize, Serialize};
use voyage_frame::{Column, DataFrame};

/// Transformer that packs numeric columns into a feature block.
///
/// # Example
///
/// ```
/// use voyage_frame::prelude::*;
/// use voyage_pipeline::assembler::VectorAssembler;
/// use voyage_pipeline::stage::Transformer;
///
/// let frame = DataFrame::new(vec![
///     Column::from_i64("Pclass", vec![3, 1]),
///     Column::from_f64("Fare", vec![7.25, 71.28]),
/// ])
/// .unwrap();
///
/// let assembler = VectorAssembler::new(vec!["Pclass".into(), "Fare".into()], "features");
/// let out = assembler.transform(&frame).unwrap();
/// assert_eq!(assembler.output_columns(), vec!["features_0", "features_1"]);
/// assert_eq!(out.column("features_0").unwrap().f64_value(0).unwrap(), Some(3.0));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorAssembler {
    /// The numeric columns to assemble, in slot order.
    pub input_cols: Vec<String>,
    /// Prefix for the produced block columns.
    pub output_prefix: String,
}

impl VectorAssembler {
    /// Creates an assembler over the given columns.
    pub fn new(input_cols: Vec<String>, output_prefix: impl Into<String>) -> Self {
        Self {
            input_cols,
            output_prefix: output_prefix.into(),
        }
    }

    /// Returns the names of the produced block columns, in slot order.
    pub fn output_columns(&self) -> Vec<String> {
        (0..self.input_cols.len())
            .map(|i| format!("{}_{}", self.output_prefix, i))
            .collect()
    }
}

impl Transformer for VectorAssembler {
    fn transform(&self, frame: &DataFrame) -> PipelineResult<DataFrame> {
        if self.input_cols.is_empty() {
            return Err(PipelineError::NoInputColumns {
                stage: "VectorAssembler".to_string(),
            });
        }
        let mut current = frame.clone();
        for (slot, name) in self.input_cols.iter().enumerate() {
            let column = frame.column(name)?;
            let mut values = Vec::with_capacity(column.len());
            for row in 0..column.len() {
                match column.f64_value(row)? {
                    Some(v) => values.push(v),
                    None => {
                        return Err(PipelineError::NullValue {
                            column: name.clone(),
                            row,
                        })
                    }
                }
            }
            let out_name = format!("{}_{}", self.output_prefix, slot);
            current = current.with_column(Column::from_f64(out_name, values))?;
        }
        Ok(current)
    }

    fn name(&self) -> &str {
        "VectorAssembler"
    }
}
