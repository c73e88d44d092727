//! Gradient-boosted trees for binary classification.
//!
//! Logit boosting: starting from the log-odds of the positive class, each
//! round fits a variance-split regression tree to the pseudo-residuals of
//! the log loss (`label - predicted probability`) and adds it to the
//! ensemble scaled by the step size. Prediction thresholds the sigmoid of
//! the summed scores at one half.

use crate::data::LabeledData;
use crate::error::{ModelError, ModelResult};
use crate::model::ClassificationModel;
use crate::tree::{grow_regression, TreeNode, TreeParams};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Trainer configuration for gradient-boosted trees.
///
/// # Example
///
/// ```
/// use voyage_models::gbt::GradientBoostedTrees;
///
/// let trainer = GradientBoostedTrees::new()
///     .with_max_iter(20)
///     .with_step_size(0.1)
///     .with_max_depth(5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    /// Number of boosting rounds.
    pub max_iter: usize,
    /// Shrinkage applied to each tree's contribution.
    pub step_size: f64,
    /// Depth cap per regression tree.
    pub max_depth: usize,
    /// Minimum rows each child of a split must hold.
    pub min_instances_per_node: usize,
}

impl Default for GradientBoostedTrees {
    fn default() -> Self {
        Self {
            max_iter: 20,
            step_size: 0.1,
            max_depth: 5,
            min_instances_per_node: 1,
        }
    }
}

impl GradientBoostedTrees {
    /// Creates a trainer with default hyperparameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of boosting rounds.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the shrinkage.
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Sets the per-tree depth cap.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the minimum rows per child node.
    pub fn with_min_instances_per_node(mut self, min: usize) -> Self {
        self.min_instances_per_node = min;
        self
    }

    /// Fits the ensemble.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::BinaryOnly`] for more than two classes.
    pub fn fit(&self, data: &LabeledData) -> ModelResult<GradientBoostedTreesModel> {
        if data.num_classes() > 2 {
            return Err(ModelError::BinaryOnly {
                model: "GradientBoostedTrees".to_string(),
                classes: data.num_classes(),
            });
        }
        if self.step_size <= 0.0 || self.step_size > 1.0 {
            return Err(ModelError::InvalidConfig {
                message: format!("step_size must be in (0, 1], got {}", self.step_size),
            });
        }

        let n = data.len();
        let labels = data.labels();
        let positives = labels.iter().filter(|l| **l == 1.0).count();

        // Single-class data: the decision is already made.
        if positives == 0 || positives == n {
            return Ok(GradientBoostedTreesModel {
                init_score: 0.0,
                step_size: self.step_size,
                trees: Vec::new(),
                num_features: data.num_features(),
                constant: Some(labels[0]),
            });
        }

        let p0 = positives as f64 / n as f64;
        let init_score = (p0 / (1.0 - p0)).ln();
        let params = TreeParams {
            max_depth: self.max_depth,
            min_instances_per_node: self.min_instances_per_node.max(1),
            min_info_gain: 0.0,
        };
        let indices: Vec<usize> = (0..n).collect();

        let mut scores = vec![init_score; n];
        let mut trees = Vec::with_capacity(self.max_iter);
        for round in 0..self.max_iter {
            let residuals: Vec<f64> = scores
                .iter()
                .zip(labels)
                .map(|(s, y)| y - sigmoid(*s))
                .collect();
            let tree = grow_regression(data.features(), &residuals, &indices, 0, &params);
            for (row, score) in scores.iter_mut().enumerate() {
                *score += self.step_size * tree.predict(data.features().row(row));
            }
            trees.push(tree);
            if round + 1 == self.max_iter {
                let loss: f64 = scores
                    .iter()
                    .zip(labels)
                    .map(|(s, y)| {
                        let p = sigmoid(*s).clamp(1e-12, 1.0 - 1e-12);
                        -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
                    })
                    .sum::<f64>()
                    / n as f64;
                debug!(rounds = trees.len(), loss, "fitted gradient-boosted trees");
            }
        }

        Ok(GradientBoostedTreesModel {
            init_score,
            step_size: self.step_size,
            trees,
            num_features: data.num_features(),
            constant: None,
        })
    }
}

/// A fitted [`GradientBoostedTrees`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedTreesModel {
    init_score: f64,
    step_size: f64,
    trees: Vec<TreeNode>,
    num_features: usize,
    /// Set when the training data held a single class.
    constant: Option<f64>,
}

impl GradientBoostedTreesModel {
    /// Returns the number of boosting rounds kept.
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Returns the positive-class probability for one feature row.
    pub fn predict_probability(&self, features: &[f64]) -> f64 {
        if let Some(c) = self.constant {
            return c;
        }
        let mut score = self.init_score;
        for tree in &self.trees {
            score += self.step_size * tree.predict(features);
        }
        sigmoid(score)
    }
}

impl ClassificationModel for GradientBoostedTreesModel {
    fn num_features(&self) -> usize {
        self.num_features
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
        "GradientBoostedTrees"
    }
}
