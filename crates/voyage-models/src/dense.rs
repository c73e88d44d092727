//! Dense layers and activations for the perceptron classifier.
//!
//! A [`Dense`] layer performs the linear transformation `y = xW + b` for
//! a batch of feature rows. Weights are initialized with Glorot uniform
//! draws from a caller-supplied RNG so the whole network derives from one
//! seed.

use crate::error::ModelResult;
use crate::matrix::Matrix;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A fully connected layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    /// Weight matrix of shape [in_features, out_features].
    weights: Matrix,
    /// Bias vector of length out_features.
    bias: Vec<f64>,
}

impl Dense {
    /// Creates a layer with Glorot-uniform weights and zero biases.
    pub fn glorot(in_features: usize, out_features: usize, rng: &mut StdRng) -> Self {
        let limit = (6.0 / (in_features + out_features) as f64).sqrt();
        let mut weights = Matrix::zeros(in_features, out_features);
        for i in 0..in_features {
            for j in 0..out_features {
                weights.set(i, j, rng.gen_range(-limit..limit));
            }
        }
        Self {
            weights,
            bias: vec![0.0; out_features],
        }
    }

    /// Returns the input width.
    pub fn in_features(&self) -> usize {
        self.weights.rows()
    }

    /// Returns the output width.
    pub fn out_features(&self) -> usize {
        self.weights.cols()
    }

    /// Computes `input * W + b` for a batch of rows.
    pub fn forward(&self, input: &Matrix) -> ModelResult<Matrix> {
        input.matmul(&self.weights)?.add_row_vector(&self.bias)
    }

    pub(crate) fn weights(&self) -> &Matrix {
        &self.weights
    }

    /// Applies a gradient step to weights and biases.
    pub(crate) fn apply_gradients(
        &mut self,
        grad_weights: &Matrix,
        grad_bias: &[f64],
        learning_rate: f64,
    ) {
        for i in 0..self.weights.rows() {
            for j in 0..self.weights.cols() {
                let updated = self.weights.get(i, j) - learning_rate * grad_weights.get(i, j);
                self.weights.set(i, j, updated);
            }
        }
        for (b, g) in self.bias.iter_mut().zip(grad_bias) {
            *b -= learning_rate * g;
        }
    }
}

/// Element-wise logistic sigmoid.
pub fn sigmoid(input: &Matrix) -> Matrix {
    input.map(|x| 1.0 / (1.0 + (-x).exp()))
}

/// Row-wise softmax with the usual max-shift for stability.
pub fn softmax_rows(input: &Matrix) -> Matrix {
    let mut out = input.clone();
    for row in 0..input.rows() {
        let values = input.row(row);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
        let sum: f64 = exps.iter().sum();
        for (col, e) in exps.iter().enumerate() {
            out.set(row, col, e / sum);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_glorot_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let layer = Dense::glorot(8, 4, &mut rng);
        let limit = (6.0f64 / 12.0).sqrt();
        assert_eq!(layer.in_features(), 8);
        assert_eq!(layer.out_features(), 4);
        for v in layer.weights().data() {
            assert!(v.abs() <= limit);
        }
    }

    #[test]
    fn test_forward_shape_and_bias() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut layer = Dense::glorot(2, 3, &mut rng);
        layer.apply_gradients(&Matrix::zeros(2, 3), &[-1.0, -2.0, -3.0], 1.0);
        let input = Matrix::zeros(4, 2);
        let out = layer.forward(&input).unwrap();
        assert_eq!(out.rows(), 4);
        assert_eq!(out.cols(), 3);
        // Zero input: output is exactly the bias.
        assert_eq!(out.row(0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_softmax_rows_normalizes() {
        let input = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![0.0, 0.0, 0.0]]).unwrap();
        let out = softmax_rows(&input);
        for row in 0..2 {
            let sum: f64 = out.row(row).iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
        assert!(out.get(0, 2) > out.get(0, 0));
        assert!((out.get(1, 0) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_sigmoid_range() {
        let input = Matrix::from_rows(vec![vec![-100.0, 0.0, 100.0]]).unwrap();
        let out = sigmoid(&input);
        assert!(out.get(0, 0) < 1e-12);
        assert!((out.get(0, 1) - 0.5).abs() < 1e-12);
        assert!(out.get(0, 2) > 1.0 - 1e-12);
    }
}
