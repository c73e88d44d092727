//! Feature standardization.
//!
//! [`StandardScaler`] fits per-column mean and corrected standard
//! deviation over a feature block and rescales each column to
//! `(x - mean) / std`, in place. Columns with zero variance are centered
//! only. Centering and scaling can each be toggled off.

use crate::error::{PipelineError, PipelineResult};
use crate::stage::{Estimator, Transformer};
use serde::{Deserialize, Serialize};
use tracing::debug;
use voyage_frame::{Column, DataFrame};

/// Estimator that standardizes a block of numeric columns.
///
/// # Example
///
/// ```
/// use voyage_frame::prelude::*;
/// use voyage_pipeline::scaler::StandardScaler;
/// use voyage_pipeline::stage::{Estimator, Transformer};
///
/// let frame = DataFrame::new(vec![Column::from_f64("features_0", vec![1.0, 2.0, 3.0])]).unwrap();
/// let model = StandardScaler::new(vec!["features_0".into()]).fit(&frame).unwrap();
/// let scaled = model.transform(&frame).unwrap();
/// // Mean 2, std 1: values become -1, 0, 1.
/// assert_eq!(scaled.column("features_0").unwrap().f64_value(0).unwrap(), Some(-1.0));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// The columns to standardize.
    pub input_cols: Vec<String>,
    /// Whether to subtract the mean.
    pub with_mean: bool,
    /// Whether to divide by the standard deviation.
    pub with_std: bool,
}

impl StandardScaler {
    /// Creates a scaler over the given columns with centering and scaling
    /// both enabled.
    pub fn new(input_cols: Vec<String>) -> Self {
        Self {
            input_cols,
            with_mean: true,
            with_std: true,
        }
    }

    /// Toggles mean subtraction.
    pub fn with_mean(mut self, enabled: bool) -> Self {
        self.with_mean = enabled;
        self
    }

    /// Toggles standard-deviation scaling.
    pub fn with_std(mut self, enabled: bool) -> Self {
        self.with_std = enabled;
        self
    }
}

impl Estimator for StandardScaler {
    fn fit(&self, frame: &DataFrame) -> PipelineResult<Box<dyn Transformer>> {
        if self.input_cols.is_empty() {
            return Err(PipelineError::NoInputColumns {
                stage: "StandardScaler".to_string(),
            });
        }
        if frame.num_rows() == 0 {
            return Err(PipelineError::EmptyFrame {
                stage: "StandardScaler".to_string(),
            });
        }

        let mut stats = Vec::with_capacity(self.input_cols.len());
        for name in &self.input_cols {
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
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            // Corrected (sample) standard deviation; zero for a single row.
            let std = if values.len() > 1 {
                (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
            } else {
                0.0
            };
            debug!(column = %name, mean, std, "fitted scaler stats");
            stats.push(ColumnStats {
                column: name.clone(),
                mean,
                std,
            });
        }

        Ok(Box::new(StandardScalerModel {
            stats,
            with_mean: self.with_mean,
            with_std: self.with_std,
        }))
    }

    fn name(&self) -> &str {
        "StandardScaler"
    }
}

/// Fitted statistics for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ColumnStats {
    column: String,
    mean: f64,
    std: f64,
}

/// A fitted [`StandardScaler`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScalerModel {
    stats: Vec<ColumnStats>,
    with_mean: bool,
    with_std: bool,
}

impl StandardScalerModel {
    /// Returns the fitted (column, mean, std) triples.
    pub fn stats(&self) -> Vec<(String, f64, f64)> {
        self.stats
            .iter()
            .map(|s| (s.column.clone(), s.mean, s.std))
            .collect()
    }
}

impl Transformer for StandardScalerModel {
    fn transform(&self, frame: &DataFrame) -> PipelineResult<DataFrame> {
        let mut current = frame.clone();
        for stat in &self.stats {
            let column = current.column(&stat.column)?;
            let mut values = Vec::with_capacity(column.len());
            for row in 0..column.len() {
                let v = column.f64_value(row)?.ok_or_else(|| PipelineError::NullValue {
                    column: stat.column.clone(),
                    row,
                })?;
                let centered = if self.with_mean { v - stat.mean } else { v };
                let scaled = if self.with_std && stat.std > 0.0 {
                    centered / stat.std
                } else {
                    centered
                };
                values.push(scaled);
            }
            current = current.with_column(Column::from_f64(stat.column.clone(), values))?;
        }
        Ok(current)
    }

    fn name(&self) -> &str {
        "StandardScalerModel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardizes_to_zero_mean_unit_std() {
        let frame =
            DataFrame::new(vec![Column::from_f64("x", vec![2.0, 4.0, 6.0, 8.0])]).unwrap();
        let model = StandardScaler::new(vec!["x".into()]).fit(&frame).unwrap();
        let out = model.transform(&frame).unwrap();
        let values: Vec<f64> = out
            .column("x")
            .unwrap()
            .f64_values()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        let mean: f64 = values.iter().sum::<f64>() / 4.0;
        assert!(mean.abs() < 1e-12);
        // Corrected std of [2,4,6,8] is sqrt(20/3).
        let std = (20.0f64 / 3.0).sqrt();
        assert!((values[0] - (-3.0 / std)).abs() < 1e-12);
        assert!((values[3] - (3.0 / std)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_centers_only() {
        let frame = DataFrame::new(vec![Column::from_f64("x", vec![5.0, 5.0, 5.0])]).unwrap();
        let model = StandardScaler::new(vec!["x".into()]).fit(&frame).unwrap();
        let out = model.transform(&frame).unwrap();
        assert_eq!(out.column("x").unwrap().f64_value(0).unwrap(), Some(0.0));
    }

    #[test]
    fn test_fit_stats_apply_to_new_data() {
        let train = DataFrame::new(vec![Column::from_f64("x", vec![0.0, 10.0])]).unwrap();
        let test = DataFrame::new(vec![Column::from_f64("x", vec![5.0])]).unwrap();
        let model = StandardScaler::new(vec!["x".into()]).fit(&train).unwrap();
        let out = model.transform(&test).unwrap();
        // Train mean is 5, so the test value lands exactly at zero.
        assert_eq!(out.column("x").unwrap().f64_value(0).unwrap(), Some(0.0));
    }

    #[test]
    fn test_scaling_toggles() {
        let frame = DataFrame::new(vec![Column::from_f64("x", vec![1.0, 3.0])]).unwrap();
        let model = StandardScaler::new(vec!["x".into()])
            .with_mean(false)
            .with_std(false)
            .fit(&frame)
            .unwrap();
        let out = model.transform(&frame).unwrap();
        assert_eq!(out.column("x").unwrap().f64_value(1).unwrap(), Some(3.0));
    }

    #[test]
    fn test_empty_frame_rejected() {
        let frame = DataFrame::new(vec![Column::from_f64("x", vec![])]).unwrap();
        let err = StandardScaler::new(vec!["x".into()]).fit(&frame).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyFrame { .. }));
    }
}
