//! Null imputation for numeric columns.
//!
//! [`Imputer`] fills nulls in numeric columns, in place, with a constant
//! or a statistic computed at fit time. The fitted [`ImputerModel`] holds
//! the resolved fill value per column, so a model fitted on training data
//! applies the same fills to held-out data.

use crate::error::{PipelineError, PipelineResult};
use crate::stage::{Estimator, Transformer};
use serde::{Deserialize, Serialize};
use tracing::debug;
use voyage_frame::{Column, DataFrame};

/// How the fill value for a column is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Fill with the given constant.
    Value(f64),
    /// Fill with the mean of the non-null values seen at fit time.
    Mean,
    /// Fill with the median of the non-null values seen at fit time.
    Median,
}

/// Estimator that resolves per-column fill values for numeric nulls.
///
/// # Example
///
/// ```
/// use voyage_frame::prelude::*;
/// use voyage_pipeline::imputer::{Imputer, ImputeStrategy};
/// use voyage_pipeline::stage::{Estimator, Transformer};
///
/// let frame = DataFrame::new(vec![Column::from_f64_options(
///     "Age",
///     vec![Some(22.0), None, Some(26.0)],
/// )])
/// .unwrap();
///
/// let model = Imputer::new()
///     .with_column("Age", ImputeStrategy::Value(29.7))
///     .fit(&frame)
///     .unwrap();
/// let filled = model.transform(&frame).unwrap();
/// assert_eq!(filled.column("Age").unwrap().null_count(), 0);
/// assert_eq!(filled.column("Age").unwrap().f64_value(1).unwrap(), Some(29.7));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Imputer {
    columns: Vec<(String, ImputeStrategy)>,
}

impl Imputer {
    /// Creates an imputer with no columns configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column with its fill strategy.
    pub fn with_column(mut self, column: impl Into<String>, strategy: ImputeStrategy) -> Self {
        self.columns.push((column.into(), strategy));
        self
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

impl Estimator for Imputer {
    fn fit(&self, frame: &DataFrame) -> PipelineResult<Box<dyn Transformer>> {
        if self.columns.is_empty() {
            return Err(PipelineError::NoInputColumns {
                stage: "Imputer".to_string(),
            });
        }
        let mut fills = Vec::with_capacity(self.columns.len());
        for (name, strategy) in &self.columns {
            let column = frame.column(name)?;
            let fill = match strategy {
                ImputeStrategy::Value(v) => *v,
                ImputeStrategy::Mean | ImputeStrategy::Median => {
                    let present: Vec<f64> =
                        column.f64_values()?.into_iter().flatten().collect();
                    if present.is_empty() {
                        return Err(PipelineError::AllNull {
                            column: name.clone(),
                        });
                    }
                    match strategy {
                        ImputeStrategy::Mean => mean(&present),
                        _ => median(&present),
                    }
                }
            };
            debug!(column = %name, fill, "resolved impute fill");
            fills.push((name.clone(), fill));
        }
        Ok(Box::new(ImputerModel { fills }))
    }

    fn name(&self) -> &str {
        "Imputer"
    }
}

/// A fitted [`Imputer`] holding resolved fill values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputerModel {
    fills: Vec<(String, f64)>,
}

impl ImputerModel {
    /// Returns the resolved (column, fill) pairs.
    pub fn fills(&self) -> &[(String, f64)] {
        &self.fills
    }
}

impl Transformer for ImputerModel {
    fn transform(&self, frame: &DataFrame) -> PipelineResult<DataFrame> {
        let mut current = frame.clone();
        for (name, fill) in &self.fills {
            let column = current.column(name)?;
            let values: Vec<f64> = column
                .f64_values()?
                .into_iter()
                .map(|v| v.unwrap_or(*fill))
                .collect();
            current = current.with_column(Column::from_f64(name.clone(), values))?;
        }
        Ok(current)
    }

    fn name(&self) -> &str {
        "ImputerModel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age_frame() -> DataFrame {
        DataFrame::new(vec![Column::from_f64_options(
            "Age",
            vec![Some(10.0), None, Some(20.0), Some(30.0)],
        )])
        .unwrap()
    }

    #[test]
    fn test_constant_fill() {
        let model = Imputer::new()
            .with_column("Age", ImputeStrategy::Value(29.7))
            .fit(&age_frame())
            .unwrap();
        let out = model.transform(&age_frame()).unwrap();
        assert_eq!(out.column("Age").unwrap().f64_value(1).unwrap(), Some(29.7));
        assert_eq!(out.column("Age").unwrap().null_count(), 0);
    }

    #[test]
    fn test_mean_fill_from_fit_data() {
        let model = Imputer::new()
            .with_column("Age", ImputeStrategy::Mean)
            .fit(&age_frame())
            .unwrap();
        let out = model.transform(&age_frame()).unwrap();
        assert_eq!(out.column("Age").unwrap().f64_value(1).unwrap(), Some(20.0));
    }

    #[test]
    fn test_median_fill() {
        let frame = DataFrame::new(vec![Column::from_f64_options(
            "Fare",
            vec![Some(1.0), Some(2.0), Some(100.0), None],
        )])
        .unwrap();
        let model = Imputer::new()
            .with_column("Fare", ImputeStrategy::Median)
            .fit(&frame)
            .unwrap();
        let out = model.transform(&frame).unwrap();
        assert_eq!(out.column("Fare").unwrap().f64_value(3).unwrap(), Some(2.0));
    }

    #[test]
    fn test_integer_columns_widen_to_double() {
        let frame =
            DataFrame::new(vec![Column::from_i64_options("SibSp", vec![Some(1), None])]).unwrap();
        let model = Imputer::new()
            .with_column("SibSp", ImputeStrategy::Value(0.0))
            .fit(&frame)
            .unwrap();
        let out = model.transform(&frame).unwrap();
        assert_eq!(out.column("SibSp").unwrap().f64_value(1).unwrap(), Some(0.0));
    }

    #[test]
    fn test_unconfigured_imputer_rejected() {
        let err = Imputer::new().fit(&age_frame()).unwrap_err();
        assert!(matches!(err, PipelineError::NoInputColumns { .. }));
    }

    #[test]
    fn test_string_column_rejected() {
        let frame = DataFrame::new(vec![Column::from_str_values(
            "Name",
            vec!["Braund".to_string()],
        )])
        .unwrap();
        let err = Imputer::new()
            .with_column("Name", ImputeStrategy::Mean)
            .fit(&frame)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Frame(_)));
    }
}
