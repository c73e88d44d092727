//! Training-data extraction from frames.
//!
//! [`LabeledData`] pairs a feature matrix with a label vector, both pulled
//! out of a prepared [`DataFrame`]. Labels must be non-negative integer
//! class indices stored as doubles; the class count is one past the
//! largest index seen.

use crate::error::{ModelError, ModelResult};
use crate::matrix::Matrix;
use voyage_frame::DataFrame;

/// A feature matrix with aligned labels.
#[derive(Debug, Clone)]
pub struct LabeledData {
    features: Matrix,
    labels: Vec<f64>,
    num_classes: usize,
}

impl LabeledData {
    /// Creates labeled data from a matrix and label vector.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyTrainingSet`] for zero rows or zero
    /// features, [`ModelError::DimensionMismatch`] if lengths disagree,
    /// and [`ModelError::InvalidLabel`] for labels that are not
    /// non-negative integers.
    pub fn new(features: Matrix, labels: Vec<f64>) -> ModelResult<Self> {
        if features.rows() == 0 {
            return Err(ModelError::EmptyTrainingSet {
                message: "no rows".to_string(),
            });
        }
        if features.cols() == 0 {
            return Err(ModelError::EmptyTrainingSet {
                message: "no feature columns".to_string(),
            });
        }
        if labels.len() != features.rows() {
            return Err(ModelError::DimensionMismatch {
                expected: features.rows(),
                actual: labels.len(),
            });
        }
        let mut max_label = 0.0f64;
        for (row, label) in labels.iter().enumerate() {
            if *label < 0.0 || label.fract() != 0.0 || !label.is_finite() {
                return Err(ModelError::InvalidLabel { row, value: *label });
            }
            max_label = max_label.max(*label);
        }
        let num_classes = (max_label as usize) + 1;
        Ok(Self {
            features,
            labels,
            num_classes,
        })
    }

    /// Extracts labeled data from a prepared frame.
    ///
    /// `feature_cols` name the numeric block columns in slot order;
    /// `label_col` names the class column.
    pub fn from_frame(
        frame: &DataFrame,
        feature_cols: &[String],
        label_col: &str,
    ) -> ModelResult<Self> {
        let features = features_from_frame(frame, feature_cols)?;
        let label_column = frame.column(label_col)?;
        let mut labels = Vec::with_capacity(label_column.len());
        for row in 0..label_column.len() {
            match label_column.f64_value(row)? {
                Some(v) => labels.push(v),
                None => {
                    return Err(ModelError::NullFeature {
                        column: label_col.to_string(),
                        row,
                    })
                }
            }
        }
        Self::new(features, labels)
    }

    /// Returns the feature matrix.
    pub fn features(&self) -> &Matrix {
        &self.features
    }

    /// Returns the labels.
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.features.rows()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the feature count.
    pub fn num_features(&self) -> usize {
        self.features.cols()
    }

    /// Returns the class count (one past the largest label index).
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Returns the per-class row counts.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.num_classes];
        for label in &self.labels {
            counts[*label as usize] += 1;
        }
        counts
    }
}

/// Builds a feature matrix from the named numeric columns of a frame.
///
/// # Errors
///
/// Returns [`ModelError::NullFeature`] for any null cell and frame errors
/// for unknown or non-numeric columns.
pub fn features_from_frame(frame: &DataFrame, feature_cols: &[String]) -> ModelResult<Matrix> {
    let rows = frame.num_rows();
    let cols = feature_cols.len();
    let mut matrix = Matrix::zeros(rows, cols);
    for (col_idx, name) in feature_cols.iter().enumerate() {
        let column = frame.column(name)?;
        for row in 0..rows {
            match column.f64_value(row)? {
                Some(v) => matrix.set(row, col_idx, v),
                None => {
                    return Err(ModelError::NullFeature {
                        column: name.clone(),
                        row,
                    })
                }
            }
        }
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voyage_frame::Column;

    #[test]
    fn test_labels_define_class_count() {
        let features = Matrix::from_rows(vec![vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let data = LabeledData::new(features, vec![0.0, 2.0, 1.0]).unwrap();
        assert_eq!(data.num_classes(), 3);
        assert_eq!(data.class_counts(), vec![1, 1, 1]);
    }

    #[test]
    fn test_fractional_label_rejected() {
        let features = Matrix::from_rows(vec![vec![1.0]]).unwrap();
        let err = LabeledData::new(features, vec![0.5]).unwrap_err();
        assert!(matches!(err, ModelError::InvalidLabel { .. }));
    }

    #[test]
    fn test_negative_label_rejected() {
        let features = Matrix::from_rows(vec![vec![1.0]]).unwrap();
        assert!(LabeledData::new(features, vec![-1.0]).is_err());
    }

    #[test]
    fn test_from_frame() {
        let frame = DataFrame::new(vec![
            Column::from_f64("features_0", vec![1.0, 2.0]),
            Column::from_f64("features_1", vec![3.0, 4.0]),
            Column::from_i64("Survived", vec![0, 1]),
        ])
        .unwrap();
        let data = LabeledData::from_frame(
            &frame,
            &["features_0".to_string(), "features_1".to_string()],
            "Survived",
        )
        .unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.num_features(), 2);
        assert_eq!(data.features().row(1), &[2.0, 4.0]);
        assert_eq!(data.labels(), &[0.0, 1.0]);
    }

    #[test]
    fn test_null_feature_rejected() {
        let frame = DataFrame::new(vec![
            Column::from_f64_options("features_0", vec![Some(1.0), None]),
            Column::from_i64("Survived", vec![0, 1]),
        ])
        .unwrap();
        let err =
            LabeledData::from_frame(&frame, &["features_0".to_string()], "Survived").unwrap_err();
        assert!(matches!(err, ModelError::NullFeature { row: 1, .. }));
    }
}
