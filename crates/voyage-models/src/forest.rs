//! Random forest classification.
//!
//! Bagging over seeded bootstrap samples with per-split feature
//! subsampling. Trees are independent, so they train in parallel with
//! rayon; each tree derives its RNG from the base seed and its index,
//! keeping the whole ensemble reproducible regardless of thread
//! scheduling.

use crate::data::LabeledData;
use crate::error::{ModelError, ModelResult};
use crate::model::ClassificationModel;
use crate::tree::{grow_classification, TreeNode, TreeParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How many features each split may consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureSubset {
    /// The square root of the feature count, rounded up. The usual
    /// choice for classification.
    #[default]
    Sqrt,
    /// All features; disables subsampling.
    All,
    /// A fixed count, clamped to the feature count.
    Count(usize),
}

impl FeatureSubset {
    fn resolve(&self, num_features: usize) -> usize {
        match self {
            FeatureSubset::Sqrt => (num_features as f64).sqrt().ceil() as usize,
            FeatureSubset::All => num_features,
            FeatureSubset::Count(k) => (*k).min(num_features),
        }
        .max(1)
    }
}

/// Trainer configuration for a random forest.
///
/// # Example
///
/// ```
/// use voyage_models::forest::{FeatureSubset, RandomForest};
///
/// let trainer = RandomForest::new()
///     .with_num_trees(20)
///     .with_max_depth(5)
///     .with_feature_subset(FeatureSubset::Sqrt)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    /// Number of trees in the ensemble.
    pub num_trees: usize,
    /// Depth cap per tree.
    pub max_depth: usize,
    /// Minimum rows each child of a split must hold.
    pub min_instances_per_node: usize,
    /// Features considered per split.
    pub feature_subset: FeatureSubset,
    /// Base seed for bootstrap sampling and feature subsampling.
    pub seed: u64,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self {
            num_trees: 20,
            max_depth: 5,
            min_instances_per_node: 1,
            feature_subset: FeatureSubset::Sqrt,
            seed: 42,
        }
    }
}

impl RandomForest {
    /// Creates a trainer with default hyperparameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ensemble size.
    pub fn with_num_trees(mut self, num_trees: usize) -> Self {
        self.num_trees = num_trees;
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

    /// Sets the per-split feature subsampling policy.
    pub fn with_feature_subset(mut self, subset: FeatureSubset) -> Self {
        self.feature_subset = subset;
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fits the forest.
    pub fn fit(&self, data: &LabeledData) -> ModelResult<RandomForestModel> {
        if self.num_trees == 0 {
            return Err(ModelError::InvalidConfig {
                message: "num_trees must be at least 1".to_string(),
            });
        }
        let n = data.len();
        let subset = self.feature_subset.resolve(data.num_features());
        let params = TreeParams {
            max_depth: self.max_depth,
            min_instances_per_node: self.min_instances_per_node.max(1),
            min_info_gain: 0.0,
        };

        let trees: Vec<TreeNode> = (0..self.num_trees)
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = StdRng::seed_from_u64(
                    self.seed.wrapping_add(tree_idx as u64),
                );
                let bootstrap: Vec<usize> =
                    (0..n).map(|_| rng.gen_range(0..n)).collect();
                grow_classification(
                    data.features(),
                    data.labels(),
                    data.num_classes(),
                    &bootstrap,
                    0,
                    &params,
                    Some(subset),
                    &mut Some(&mut rng),
                )
            })
            .collect();

        debug!(trees = trees.len(), subset, "fitted random forest");
        Ok(RandomForestModel {
            trees,
            num_features: data.num_features(),
            num_classes: data.num_classes(),
        })
    }
}

/// A fitted [`RandomForest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestModel {
    trees: Vec<TreeNode>,
    num_features: usize,
    num_classes: usize,
}

impl RandomForestModel {
    /// Returns the number of trees.
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

impl ClassificationModel for RandomForestModel {
    fn num_features(&self) -> usize {
        self.num_features
    }

    fn predict_row(&self, features: &[f64]) -> f64 {
        let mut votes = vec![0usize; self.num_classes];
        for tree in &self.trees {
            let class = tree.predict(features) as usize;
            if class < votes.len() {
                votes[class] += 1;
            }
        }
        let mut best = 0usize;
        for (class, count) in votes.iter().enumerate() {
            if *count > votes[best] {
                best = class;
            }
        }
        best as f64
    }

    fn name(&self) -> &str {
        "RandomForest"
    }
}
