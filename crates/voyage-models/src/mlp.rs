//! Multilayer perceptron classification.
//!
//! A stack of [`Dense`] layers with sigmoid hidden activations and a
//! softmax output, trained by minibatch gradient descent on the
//! cross-entropy loss. Initialization and minibatch order both derive
//! from the configured seed.

use crate::data::LabeledData;
use crate::dense::{sigmoid, softmax_rows, Dense};
use crate::error::{ModelError, ModelResult};
use crate::matrix::Matrix;
use crate::model::ClassificationModel;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Trainer configuration for the perceptron classifier.
///
/// # Example
///
/// ```
/// use voyage_models::mlp::MlpClassifier;
///
/// let trainer = MlpClassifier::new()
///     .with_hidden_layers(vec![16, 8])
///     .with_max_iter(200)
///     .with_block_size(32)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpClassifier {
    /// Hidden layer widths, input to output.
    pub hidden_layers: Vec<usize>,
    /// Gradient step size.
    pub learning_rate: f64,
    /// Training epochs.
    pub max_iter: usize,
    /// Minibatch size.
    pub block_size: usize,
    /// Seed for initialization and minibatch shuffling.
    pub seed: u64,
}

impl Default for MlpClassifier {
    fn default() -> Self {
        Self {
            hidden_layers: vec![16, 8],
            learning_rate: 0.1,
            max_iter: 300,
            block_size: 32,
            seed: 42,
        }
    }
}

impl MlpClassifier {
    /// Creates a trainer with default hyperparameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hidden layer widths.
    pub fn with_hidden_layers(mut self, hidden_layers: Vec<usize>) -> Self {
        self.hidden_layers = hidden_layers;
        self
    }

    /// Sets the gradient step size.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the epoch count.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the minibatch size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fits the network.
    pub fn fit(&self, data: &LabeledData) -> ModelResult<MlpClassifierModel> {
        if self.block_size == 0 {
            return Err(ModelError::InvalidConfig {
                message: "block_size must be at least 1".to_string(),
            });
        }
        if self.hidden_layers.iter().any(|w| *w == 0) {
            return Err(ModelError::InvalidConfig {
                message: "hidden layer widths must be positive".to_string(),
            });
        }

        let n = data.len();
        let d = data.num_features();
        let labels = data.labels();

        // Single-class data: the decision is already made.
        let first = labels[0];
        if labels.iter().all(|l| *l == first) {
            return Ok(MlpClassifierModel {
                layers: Vec::new(),
                num_features: d,
                constant: Some(first),
            });
        }

        // Softmax needs at least two output units.
        let k = data.num_classes().max(2);
        let mut dims = Vec::with_capacity(self.hidden_layers.len() + 2);
        dims.push(d);
        dims.extend_from_slice(&self.hidden_layers);
        dims.push(k);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut layers: Vec<Dense> = dims
            .windows(2)
            .map(|w| Dense::glorot(w[0], w[1], &mut rng))
            .collect();

        let mut order: Vec<usize> = (0..n).collect();
        for epoch in 0..self.max_iter {
            order.shuffle(&mut rng);
            let mut epoch_loss = 0.0f64;
            for block in order.chunks(self.block_size) {
                let batch = data.features().take_rows(block);
                let batch_labels: Vec<usize> =
                    block.iter().map(|&i| labels[i] as usize).collect();
                epoch_loss +=
                    train_block(&mut layers, &batch, &batch_labels, self.learning_rate)?;
            }
            if epoch + 1 == self.max_iter {
                debug!(
                    epochs = self.max_iter,
                    loss = epoch_loss / n as f64,
                    "fitted perceptron classifier"
                );
            }
        }

        Ok(MlpClassifierModel {
            layers,
            num_features: d,
            constant: None,
        })
    }
}

/// Runs forward and backward passes for one minibatch, updating the
/// layers in place. Returns the summed cross-entropy loss of the batch.
fn train_block(
    layers: &mut [Dense],
    batch: &Matrix,
    batch_labels: &[usize],
    learning_rate: f64,
) -> ModelResult<f64> {
    let batch_n = batch.rows();
    let last = layers.len() - 1;

    // Forward pass, keeping every activation for the backward pass.
    let mut activations: Vec<Matrix> = Vec::with_capacity(layers.len() + 1);
    activations.push(batch.clone());
    for (idx, layer) in layers.iter().enumerate() {
        let z = layer.forward(activations.last().ok_or(ModelError::EmptyTrainingSet {
            message: "no activations".to_string(),
        })?)?;
        let a = if idx == last { softmax_rows(&z) } else { sigmoid(&z) };
        activations.push(a);
    }

    let output = &activations[layers.len()];
    let mut loss = 0.0f64;
    for (row, label) in batch_labels.iter().enumerate() {
        let p = output.get(row, *label).clamp(1e-12, 1.0);
        loss -= p.ln();
    }

    // Output delta: (softmax - onehot) averaged over the batch.
    let mut delta = output.clone();
    for (row, label) in batch_labels.iter().enumerate() {
        delta.set(row, *label, delta.get(row, *label) - 1.0);
    }
    let delta_scale = 1.0 / batch_n as f64;
    let mut delta = delta.map(|v| v * delta_scale);

    // Backward pass.
    for idx in (0..layers.len()).rev() {
        let input = &activations[idx];
        let grad_weights = input.transposed().matmul(&delta)?;
        let mut grad_bias = vec![0.0f64; delta.cols()];
        for row in 0..delta.rows() {
            for (col, g) in grad_bias.iter_mut().enumerate() {
                *g += delta.get(row, col);
            }
        }
        if idx > 0 {
            let back = delta.matmul(&layers[idx].weights().transposed())?;
            let a = &activations[idx];
            let derivative = a.map(|v| v * (1.0 - v));
            delta = back.hadamard(&derivative)?;
        }
        layers[idx].apply_gradients(&grad_weights, &grad_bias, learning_rate);
    }

    Ok(loss)
}

/// A fitted [`MlpClassifier`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpClassifierModel {
    layers: Vec<Dense>,
    num_features: usize,
    /// Set when the training data held a single class.
    constant: Option<f64>,
}

impl MlpClassifierModel {
    /// Returns the per-class probabilities for one feature row.
    pub fn predict_probabilities(&self, features: &[f64]) -> ModelResult<Vec<f64>> {
        if let Some(c) = self.constant {
            let mut probs = vec![0.0; (c as usize + 1).max(2)];
            probs[c as usize] = 1.0;
            return Ok(probs);
        }
        let mut current = Matrix::from_data(1, features.len(), features.to_vec())?;
        let last = self.layers.len().saturating_sub(1);
        for (idx, layer) in self.layers.iter().enumerate() {
            let z = layer.forward(&current)?;
            current = if idx == last { softmax_rows(&z) } else { sigmoid(&z) };
        }
        Ok(current.row(0).to_vec())
    }
}

impl ClassificationModel for MlpClassifierModel {
    fn num_features(&self) -> usize {
        self.num_features
    }

    fn predict_row(&self, features: &[f64]) -> f64 {
        if let Some(c) = self.constant {
            return c;
        }
        match self.predict_probabilities(features) {
            Ok(probs) => {
                let mut best = 0usize;
                for (class, p) in probs.iter().enumerate() {
                    if *p > probs[best] {
                        best = class;
                    }
                }
                best as f64
            }
            Err(_) => 0.0,
        }
    }

    fn name(&self) -> &str {
        "MultilayerPerceptron"
    }
}
