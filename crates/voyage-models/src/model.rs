//! The fitted-model trait shared by every classifier.

use crate::data::features_from_frame;
use crate::error::{ModelError, ModelResult};
use crate::matrix::Matrix;
use voyage_frame::{Column, DataFrame};

/// A fitted classifier.
///
/// Implementations predict class indices (as doubles) for feature rows of
/// the width they were trained on. The provided methods add batch
/// prediction with dimension checking and frame-level transformation.
pub trait ClassificationModel: Send + Sync {
    /// Returns the feature width the model was trained on.
    fn num_features(&self) -> usize;

    /// Predicts the class index for one feature row.
    ///
    /// Callers must pass exactly [`num_features`](Self::num_features)
    /// values; [`predict`](Self::predict) checks this for whole matrices.
    fn predict_row(&self, features: &[f64]) -> f64;

    /// Returns the model name used in logs and reports.
    fn name(&self) -> &str;

    /// Predicts class indices for every row of a feature matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DimensionMismatch`] if the matrix width does
    /// not match the trained feature width.
    fn predict(&self, features: &Matrix) -> ModelResult<Vec<f64>> {
        if features.cols() != self.num_features() {
            return Err(ModelError::DimensionMismatch {
                expected: self.num_features(),
                actual: features.cols(),
            });
        }
        Ok(features.rows_iter().map(|row| self.predict_row(row)).collect())
    }

    /// Appends a prediction column to a prepared frame.
    ///
    /// Features are read from `feature_cols` in slot order; predictions
    /// land in `output_col` as doubles.
    fn transform(
        &self,
        frame: &DataFrame,
        feature_cols: &[String],
        output_col: &str,
    ) -> ModelResult<DataFrame> {
        let features = features_from_frame(frame, feature_cols)?;
        let predictions = self.predict(&features)?;
        Ok(frame.with_column(Column::from_f64(output_col.to_string(), predictions))?)
    }
}
