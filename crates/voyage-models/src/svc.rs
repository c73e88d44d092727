//! Linear support-vector classification.
//!
//! Hinge loss with L2 regularization, minimized by Pegasos-style
//! stochastic subgradient descent: one pass per epoch over a seeded
//! shuffle of the rows, step size `1 / (reg_param * t)` decaying with the
//! update counter. The intercept is updated alongside the weights but is
//! not regularized.

use crate::data::LabeledData;
use crate::error::{ModelError, ModelResult};
use crate::model::ClassificationModel;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Trainer configuration for a linear SVC.
///
/// # Example
///
/// ```
/// use voyage_models::svc::LinearSvc;
///
/// let trainer = LinearSvc::new()
///     .with_max_iter(100)
///     .with_reg_param(0.01)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvc {
    /// Number of epochs over the training data.
    pub max_iter: usize,
    /// L2 regularization strength; also sets the step-size decay.
    pub reg_param: f64,
    /// Seed for the per-epoch row shuffle.
    pub seed: u64,
}

impl Default for LinearSvc {
    fn default() -> Self {
        Self {
            max_iter: 100,
            reg_param: 0.01,
            seed: 42,
        }
    }
}

impl LinearSvc {
    /// Creates a trainer with default hyperparameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the epoch count.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the regularization strength.
    pub fn with_reg_param(mut self, reg_param: f64) -> Self {
        self.reg_param = reg_param;
        self
    }

    /// Sets the shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fits the model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::BinaryOnly`] for more than two classes.
    pub fn fit(&self, data: &LabeledData) -> ModelResult<LinearSvcModel> {
        if data.num_classes() > 2 {
            return Err(ModelError::BinaryOnly {
                model: "LinearSvc".to_string(),
                classes: data.num_classes(),
            });
        }
        if self.reg_param <= 0.0 {
            return Err(ModelError::InvalidConfig {
                message: format!("reg_param must be positive, got {}", self.reg_param),
            });
        }

        let n = data.len();
        let d = data.num_features();
        let features = data.features();
        let labels = data.labels();

        // Single-class data: the decision is already made.
        let positives = labels.iter().filter(|l| **l == 1.0).count();
        if positives == 0 || positives == n {
            return Ok(LinearSvcModel {
                weights: vec![0.0; d],
                bias: 0.0,
                constant: Some(labels[0]),
            });
        }

        // Labels map to {-1, +1} for the margin.
        let signed: Vec<f64> = labels.iter().map(|y| if *y == 1.0 { 1.0 } else { -1.0 }).collect();

        let mut weights = vec![0.0f64; d];
        let mut bias = 0.0f64;
        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut t = 0usize;

        for _epoch in 0..self.max_iter {
            order.shuffle(&mut rng);
            for &row in &order {
                t += 1;
                let eta = 1.0 / (self.reg_param * t as f64);
                let x = features.row(row);
                let y = signed[row];
                let margin = y
                    * (bias + x.iter().zip(&weights).map(|(xi, wi)| xi * wi).sum::<f64>());
                let shrink = 1.0 - eta * self.reg_param;
                if margin < 1.0 {
                    for (w, xi) in weights.iter_mut().zip(x) {
                        *w = *w * shrink + eta * y * xi;
                    }
                    bias += eta * y;
                } else {
                    for w in weights.iter_mut() {
                        *w *= shrink;
                    }
                }
            }
        }
        debug!(epochs = self.max_iter, updates = t, "fitted linear svc");

        Ok(LinearSvcModel {
            weights,
            bias,
            constant: None,
        })
    }
}

/// A fitted [`LinearSvc`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvcModel {
    weights: Vec<f64>,
    bias: f64,
    /// Set when the training data held a single class.
    constant: Option<f64>,
}

impl LinearSvcModel {
    /// Returns the signed distance to the decision boundary.
    pub fn decision_value(&self, features: &[f64]) -> f64 {
        self.bias
            + features
                .iter()
                .zip(&self.weights)
                .map(|(xi, wi)| xi * wi)
                .sum::<f64>()
    }
}

impl ClassificationModel for LinearSvcModel {
    fn num_features(&self) -> usize {
        self.weights.len()
    }

    fn predict_row(&self, features: &[f64]) -> f64 {
        if let Some(c) = self.constant {
            return c;
        }
        if self.decision_value(features) >= 0.0 {
            1.0
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "LinearSvc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;

    fn separable_data() -> LabeledData {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..10 {
            let jitter = i as f64 * 0.02;
            rows.push(vec![-1.0 - jitter, -1.0 + jitter]);
            labels.push(0.0);
            rows.push(vec![1.0 + jitter, 1.0 - jitter]);
            labels.push(1.0);
        }
        LabeledData::new(Matrix::from_rows(rows).unwrap(), labels).unwrap()
    }

    #[test]
    fn test_separates_clusters() {
        let data = separable_data();
        let model = LinearSvc::new().fit(&data).unwrap();
        assert_eq!(model.predict(data.features()).unwrap(), data.labels());
    }

    #[test]
    fn test_decision_value_sign() {
        let data = separable_data();
        let model = LinearSvc::new().fit(&data).unwrap();
        assert!(model.decision_value(&[-1.0, -1.0]) < 0.0);
        assert!(model.decision_value(&[1.0, 1.0]) > 0.0);
    }

    #[test]
    fn test_seed_reproducibility() {
        let data = separable_data();
        let a = LinearSvc::new().with_seed(3).fit(&data).unwrap();
        let b = LinearSvc::new().with_seed(3).fit(&data).unwrap();
        assert_eq!(a.decision_value(&[0.3, -0.2]), b.decision_value(&[0.3, -0.2]));
    }

    #[test]
    fn test_single_class_shortcut() {
        let features = Matrix::from_rows(vec![vec![1.0], vec![2.0]]).unwrap();
        let data = LabeledData::new(features, vec![1.0, 1.0]).unwrap();
        let model = LinearSvc::new().fit(&data).unwrap();
        assert_eq!(model.predict_row(&[-5.0]), 1.0);
    }

    #[test]
    fn test_non_positive_reg_param_rejected() {
        let data = separable_data();
        let err = LinearSvc::new().with_reg_param(0.0).fit(&data).unwrap_err();
        assert!(matches!(err, ModelError::InvalidConfig { .. }));
    }
}
