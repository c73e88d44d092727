//! Binary logistic regression.
//!
//! Full-batch gradient descent on the regularized log loss. Weights start
//! at zero, so training is deterministic; the loop stops early once the
//! loss change drops below `tol`.

use crate::data::LabeledData;
use crate::error::{ModelError, ModelResult};
use crate::model::ClassificationModel;
use serde::{Deserialize, Serialize};
use tracing::debug;

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Trainer configuration for logistic regression.
///
/// # Example
///
/// ```
/// use voyage_models::logistic::LogisticRegression;
///
/// let trainer = LogisticRegression::new()
///     .with_max_iter(200)
///     .with_learning_rate(0.5)
///     .with_reg_param(0.01);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Maximum gradient-descent iterations.
    pub max_iter: usize,
    /// Step size.
    pub learning_rate: f64,
    /// L2 regularization strength.
    pub reg_param: f64,
    /// Stop once the absolute loss change falls below this.
    pub tol: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            max_iter: 100,
            learning_rate: 0.5,
            reg_param: 0.0,
            tol: 1e-7,
        }
    }
}

impl LogisticRegression {
    /// Creates a trainer with default hyperparameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the step size.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the L2 regularization strength.
    pub fn with_reg_param(mut self, reg_param: f64) -> Self {
        self.reg_param = reg_param;
        self
    }

    /// Sets the convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Fits the model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::BinaryOnly`] for more than two classes.
    pub fn fit(&self, data: &LabeledData) -> ModelResult<LogisticRegressionModel> {
        if data.num_classes() > 2 {
            return Err(ModelError::BinaryOnly {
                model: "LogisticRegression".to_string(),
                classes: data.num_classes(),
            });
        }

        let n = data.len();
        let d = data.num_features();
        let features = data.features();
        let labels = data.labels();

        // Single-class data: the decision is already made.
        let positives = labels.iter().filter(|l| **l == 1.0).count();
        if positives == 0 || positives == n {
            return Ok(LogisticRegressionModel {
                weights: vec![0.0; d],
                bias: 0.0,
                constant: Some(labels[0]),
            });
        }

        let mut weights = vec![0.0f64; d];
        let mut bias = 0.0f64;
        let mut last_loss = f64::INFINITY;

        for iter in 0..self.max_iter {
            let mut grad_w = vec![0.0f64; d];
            let mut grad_b = 0.0f64;
            let mut loss = 0.0f64;

            for row in 0..n {
                let x = features.row(row);
                let z = bias + x.iter().zip(&weights).map(|(xi, wi)| xi * wi).sum::<f64>();
                let p = sigmoid(z);
                let y = labels[row];
                let err = p - y;
                for (g, xi) in grad_w.iter_mut().zip(x) {
                    *g += err * xi;
                }
                grad_b += err;
                // Clamped log loss keeps the running total finite.
                let p_clamped = p.clamp(1e-12, 1.0 - 1e-12);
                loss -= y * p_clamped.ln() + (1.0 - y) * (1.0 - p_clamped).ln();
            }

            let scale = 1.0 / n as f64;
            loss *= scale;
            for (w, g) in weights.iter_mut().zip(&grad_w) {
                *w -= self.learning_rate * (g * scale + self.reg_param * *w);
            }
            bias -= self.learning_rate * grad_b * scale;

            if (last_loss - loss).abs() < self.tol {
                debug!(iter, loss, "logistic regression converged");
                break;
            }
            last_loss = loss;
        }

        Ok(LogisticRegressionModel {
            weights,
            bias,
            constant: None,
        })
    }
}

/// A fitted [`LogisticRegression`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionModel {
    weights: Vec<f64>,
    bias: f64,
    /// Set when the training data held a single class.
    constant: Option<f64>,
}

impl LogisticRegressionModel {
    /// Returns the fitted weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Returns the fitted intercept.
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Returns the positive-class probability for one feature row.
    pub fn predict_probability(&self, features: &[f64]) -> f64 {
        if let Some(c) = self.constant {
            return c;
        }
        let z = self.bias
            + features
                .iter()
                .zip(&self.weights)
                .map(|(xi, wi)| xi * wi)
                .sum::<f64>();
        sigmoid(z)
    }
}

impl ClassificationModel for LogisticRegressionModel {
    fn num_features(&self) -> usize {
        self.weights.len()
    }

    fn predict_row(&self, features: &[f64]) -> f64 {
        if let Some(c) = self.constant {
            return c;
        }
        if self.predict_probability(features) >= 0.5 {
            1.0
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "LogisticRegression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;

    fn separable_data() -> LabeledData {
        // Negative cluster around -1, positive cluster around +1.
        let rows = vec![
            vec![-1.2, -0.8],
            vec![-1.0, -1.1],
            vec![-0.9, -1.3],
            vec![-1.4, -0.7],
            vec![1.1, 0.9],
            vec![0.8, 1.2],
            vec![1.3, 1.0],
            vec![0.9, 0.7],
        ];
        let labels = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        LabeledData::new(Matrix::from_rows(rows).unwrap(), labels).unwrap()
    }

    #[test]
    fn test_learns_separable_clusters() {
        let data = separable_data();
        let model = LogisticRegression::new().with_max_iter(500).fit(&data).unwrap();
        let predictions = model.predict(data.features()).unwrap();
        assert_eq!(predictions, data.labels());
    }

    #[test]
    fn test_probability_ordering() {
        let data = separable_data();
        let model = LogisticRegression::new().with_max_iter(500).fit(&data).unwrap();
        let low = model.predict_probability(&[-1.0, -1.0]);
        let high = model.predict_probability(&[1.0, 1.0]);
        assert!(low < 0.5);
        assert!(high > 0.5);
    }

    #[test]
    fn test_single_class_shortcut() {
        let features = Matrix::from_rows(vec![vec![1.0], vec![2.0]]).unwrap();
        let data = LabeledData::new(features, vec![0.0, 0.0]).unwrap();
        let model = LogisticRegression::new().fit(&data).unwrap();
        assert_eq!(model.predict_row(&[99.0]), 0.0);
    }

    #[test]
    fn test_multiclass_rejected() {
        let features = Matrix::from_rows(vec![vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let data = LabeledData::new(features, vec![0.0, 1.0, 2.0]).unwrap();
        assert!(matches!(
            LogisticRegression::new().fit(&data).unwrap_err(),
            ModelError::BinaryOnly { .. }
        ));
    }

    #[test]
    fn test_fitted_model_serde_round_trip() {
        let data = separable_data();
        let model = LogisticRegression::new().fit(&data).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let restored: LogisticRegressionModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.weights(), model.weights());
    }
}
