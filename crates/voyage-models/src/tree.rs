//! Decision trees.
//!
//! [`DecisionTree`] trains a CART classifier: greedy binary splits on
//! feature thresholds chosen by Gini impurity decrease, with majority-class
//! leaves. The same node representation and growing machinery also serve
//! the ensemble trainers: the forest grows classification trees over
//! bootstrap samples with per-split feature subsampling, and boosting
//! grows variance-split regression trees on pseudo-residuals.

use crate::data::LabeledData;
use crate::error::{ModelError, ModelResult};
use crate::matrix::Matrix;
use crate::model::ClassificationModel;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One node of a fitted tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) enum TreeNode {
    /// Terminal node carrying the predicted value.
    Leaf { value: f64 },
    /// Internal node routing rows by `feature <= threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub(crate) fn predict(&self, row: &[f64]) -> f64 {
        match self {
            TreeNode::Leaf { value } => *value,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] <= *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }

    pub(crate) fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub(crate) fn num_nodes(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => 1 + left.num_nodes() + right.num_nodes(),
        }
    }
}

/// Growth limits shared by every tree trainer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct TreeParams {
    pub max_depth: usize,
    pub min_instances_per_node: usize,
    pub min_info_gain: f64,
}

/// The best split found for a node, if any.
struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let t = total as f64;
    1.0 - counts
        .iter()
        .map(|c| {
            let p = *c as f64 / t;
            p * p
        })
        .sum::<f64>()
}

fn majority(counts: &[usize]) -> f64 {
    let mut best = 0usize;
    for (class, count) in counts.iter().enumerate() {
        if *count > counts[best] {
            best = class;
        }
    }
    best as f64
}

/// Picks the candidate features for one split: either all of them, or a
/// seeded sample of `k` without replacement.
fn candidate_features(
    num_features: usize,
    subset: Option<usize>,
    rng: &mut Option<&mut StdRng>,
) -> Vec<usize> {
    match (subset, rng) {
        (Some(k), Some(rng)) if k < num_features => {
            let mut picked = sample(&mut **rng, num_features, k).into_vec();
            picked.sort_unstable();
            picked
        }
        _ => (0..num_features).collect(),
    }
}

fn best_classification_split(
    features: &Matrix,
    labels: &[f64],
    num_classes: usize,
    indices: &[usize],
    params: &TreeParams,
    subset: Option<usize>,
    rng: &mut Option<&mut StdRng>,
) -> Option<BestSplit> {
    let total = indices.len();
    let mut parent_counts = vec![0usize; num_classes];
    for &i in indices {
        parent_counts[labels[i] as usize] += 1;
    }
    let parent_impurity = gini(&parent_counts, total);
    if parent_impurity == 0.0 {
        return None;
    }

    let mut best: Option<BestSplit> = None;
    for feature in candidate_features(features.cols(), subset, rng) {
        let mut ordered: Vec<usize> = indices.to_vec();
        ordered.sort_by(|&a, &b| {
            features
                .get(a, feature)
                .partial_cmp(&features.get(b, feature))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut left_counts = vec![0usize; num_classes];
        for split_at in 1..total {
            let prev = ordered[split_at - 1];
            left_counts[labels[prev] as usize] += 1;

            let value = features.get(prev, feature);
            let next_value = features.get(ordered[split_at], feature);
            if value == next_value {
                continue;
            }
            if split_at < params.min_instances_per_node
                || total - split_at < params.min_instances_per_node
            {
                continue;
            }

            let right_counts: Vec<usize> = parent_counts
                .iter()
                .zip(&left_counts)
                .map(|(p, l)| p - l)
                .collect();
            let left_impurity = gini(&left_counts, split_at);
            let right_impurity = gini(&right_counts, total - split_at);
            let weighted = (split_at as f64 * left_impurity
                + (total - split_at) as f64 * right_impurity)
                / total as f64;
            let gain = parent_impurity - weighted;

            if gain > params.min_info_gain
                && best.as_ref().map_or(true, |b| gain > b.gain)
            {
                best = Some(BestSplit {
                    feature,
                    threshold: (value + next_value) / 2.0,
                    gain,
                    left: ordered[..split_at].to_vec(),
                    right: ordered[split_at..].to_vec(),
                });
            }
        }
    }
    best
}

pub(crate) fn grow_classification(
    features: &Matrix,
    labels: &[f64],
    num_classes: usize,
    indices: &[usize],
    depth: usize,
    params: &TreeParams,
    subset: Option<usize>,
    rng: &mut Option<&mut StdRng>,
) -> TreeNode {
    let mut counts = vec![0usize; num_classes];
    for &i in indices {
        counts[labels[i] as usize] += 1;
    }
    if depth >= params.max_depth || indices.len() < 2 * params.min_instances_per_node.max(1) {
        return TreeNode::Leaf {
            value: majority(&counts),
        };
    }
    match best_classification_split(features, labels, num_classes, indices, params, subset, rng) {
        Some(split) => TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(grow_classification(
                features,
                labels,
                num_classes,
                &split.left,
                depth + 1,
                params,
                subset,
                rng,
            )),
            right: Box::new(grow_classification(
                features,
                labels,
                num_classes,
                &split.right,
                depth + 1,
                params,
                subset,
                rng,
            )),
        },
        None => TreeNode::Leaf {
            value: majority(&counts),
        },
    }
}

fn best_regression_split(
    features: &Matrix,
    targets: &[f64],
    indices: &[usize],
    params: &TreeParams,
) -> Option<BestSplit> {
    let total = indices.len();
    let total_sum: f64 = indices.iter().map(|&i| targets[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| targets[i] * targets[i]).sum();
    let parent_var = total_sq / total as f64 - (total_sum / total as f64).powi(2);
    if parent_var <= 0.0 {
        return None;
    }

    let mut best: Option<BestSplit> = None;
    for feature in 0..features.cols() {
        let mut ordered: Vec<usize> = indices.to_vec();
        ordered.sort_by(|&a, &b| {
            features
                .get(a, feature)
                .partial_cmp(&features.get(b, feature))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut left_sum = 0.0f64;
        let mut left_sq = 0.0f64;
        for split_at in 1..total {
            let prev = ordered[split_at - 1];
            left_sum += targets[prev];
            left_sq += targets[prev] * targets[prev];

            let value = features.get(prev, feature);
            let next_value = features.get(ordered[split_at], feature);
            if value == next_value {
                continue;
            }
            if split_at < params.min_instances_per_node
                || total - split_at < params.min_instances_per_node
            {
                continue;
            }

            let nl = split_at as f64;
            let nr = (total - split_at) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let left_var = left_sq / nl - (left_sum / nl).powi(2);
            let right_var = right_sq / nr - (right_sum / nr).powi(2);
            let weighted = (nl * left_var + nr * right_var) / total as f64;
            let gain = parent_var - weighted;

            if gain > params.min_info_gain
                && best.as_ref().map_or(true, |b| gain > b.gain)
            {
                best = Some(BestSplit {
                    feature,
                    threshold: (value + next_value) / 2.0,
                    gain,
                    left: ordered[..split_at].to_vec(),
                    right: ordered[split_at..].to_vec(),
                });
            }
        }
    }
    best
}

pub(crate) fn grow_regression(
    features: &Matrix,
    targets: &[f64],
    indices: &[usize],
    depth: usize,
    params: &TreeParams,
) -> TreeNode {
    let mean = indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64;
    if depth >= params.max_depth || indices.len() < 2 * params.min_instances_per_node.max(1) {
        return TreeNode::Leaf { value: mean };
    }
    match best_regression_split(features, targets, indices, params) {
        Some(split) => TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(grow_regression(
                features,
                targets,
                &split.left,
                depth + 1,
                params,
            )),
            right: Box::new(grow_regression(
                features,
                targets,
                &split.right,
                depth + 1,
                params,
            )),
        },
        None => TreeNode::Leaf { value: mean },
    }
}

/// Trainer configuration for a single CART classifier.
///
/// # Example
///
/// ```
/// use voyage_models::tree::DecisionTree;
///
/// let trainer = DecisionTree::new().with_max_depth(5).with_min_instances_per_node(1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Maximum tree depth; a depth of 0 is a single leaf.
    pub max_depth: usize,
    /// Minimum rows each child of a split must hold.
    pub min_instances_per_node: usize,
    /// Minimum impurity decrease for a split to be kept.
    pub min_info_gain: f64,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self {
            max_depth: 5,
            min_instances_per_node: 1,
            min_info_gain: 0.0,
        }
    }
}

impl DecisionTree {
    /// Creates a trainer with default hyperparameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the depth cap.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the minimum rows per child node.
    pub fn with_min_instances_per_node(mut self, min: usize) -> Self {
        self.min_instances_per_node = min;
        self
    }

    /// Sets the minimum impurity decrease per split.
    pub fn with_min_info_gain(mut self, gain: f64) -> Self {
        self.min_info_gain = gain;
        self
    }

    pub(crate) fn params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_instances_per_node: self.min_instances_per_node,
            min_info_gain: self.min_info_gain,
        }
    }

    /// Fits the tree.
    pub fn fit(&self, data: &LabeledData) -> ModelResult<DecisionTreeModel> {
        if self.min_instances_per_node == 0 {
            return Err(ModelError::InvalidConfig {
                message: "min_instances_per_node must be at least 1".to_string(),
            });
        }
        let indices: Vec<usize> = (0..data.len()).collect();
        let root = grow_classification(
            data.features(),
            data.labels(),
            data.num_classes(),
            &indices,
            0,
            &self.params(),
            None,
            &mut None,
        );
        debug!(
            depth = root.depth(),
            nodes = root.num_nodes(),
            "fitted decision tree"
        );
        Ok(DecisionTreeModel {
            root,
            num_features: data.num_features(),
        })
    }
}

/// A fitted [`DecisionTree`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeModel {
    root: TreeNode,
    num_features: usize,
}

impl DecisionTreeModel {
    /// Returns the depth of the fitted tree.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Returns the number of nodes, leaves included.
    pub fn num_nodes(&self) -> usize {
        self.root.num_nodes()
    }
}

impl ClassificationModel for DecisionTreeModel {
    fn num_features(&self) -> usize {
        self.num_features
    }

    fn predict_row(&self, features: &[f64]) -> f64 {
        self.root.predict(features)
    }

    fn name(&self) -> &str {
        "DecisionTree"
    }
}
