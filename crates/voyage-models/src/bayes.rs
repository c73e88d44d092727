//! Gaussian naive Bayes.
//!
//! Each feature is modeled as a per-class Gaussian; features are assumed
//! independent given the class. A Gaussian likelihood handles the
//! standardized (and therefore negative) feature values the pipeline
//! produces, where a count-based likelihood would be undefined.

use crate::data::LabeledData;
use crate::error::{ModelError, ModelResult};
use crate::model::ClassificationModel;
use serde::{Deserialize, Serialize};
use tracing::debug;

const LN_2PI: f64 = 1.8378770664093453;

/// Trainer configuration for Gaussian naive Bayes.
///
/// # Example
///
/// ```
/// use voyage_models::bayes::NaiveBayes;
///
/// let trainer = NaiveBayes::new().with_smoothing(1e-9);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayes {
    /// Variance smoothing: this fraction of the largest feature variance
    /// is added to every variance, keeping likelihoods finite for
    /// constant features.
    pub smoothing: f64,
}

impl Default for NaiveBayes {
    fn default() -> Self {
        Self { smoothing: 1e-9 }
    }
}

impl NaiveBayes {
    /// Creates a trainer with default smoothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the variance smoothing fraction.
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Fits the model.
    pub fn fit(&self, data: &LabeledData) -> ModelResult<NaiveBayesModel> {
        if self.smoothing < 0.0 {
            return Err(ModelError::InvalidConfig {
                message: format!("smoothing must be non-negative, got {}", self.smoothing),
            });
        }
        let n = data.len();
        let d = data.num_features();
        let k = data.num_classes();
        let features = data.features();
        let labels = data.labels();

        let counts = data.class_counts();
        let mut means = vec![vec![0.0f64; d]; k];
        let mut vars = vec![vec![0.0f64; d]; k];

        for row in 0..n {
            let class = labels[row] as usize;
            for (j, x) in features.row(row).iter().enumerate() {
                means[class][j] += x;
            }
        }
        for class in 0..k {
            if counts[class] == 0 {
                continue;
            }
            for j in 0..d {
                means[class][j] /= counts[class] as f64;
            }
        }
        for row in 0..n {
            let class = labels[row] as usize;
            for (j, x) in features.row(row).iter().enumerate() {
                let diff = x - means[class][j];
                vars[class][j] += diff * diff;
            }
        }
        let mut max_var = 0.0f64;
        for class in 0..k {
            if counts[class] == 0 {
                continue;
            }
            for j in 0..d {
                vars[class][j] /= counts[class] as f64;
                max_var = max_var.max(vars[class][j]);
            }
        }
        let epsilon = (self.smoothing * max_var).max(1e-300);
        for class_vars in &mut vars {
            for v in class_vars.iter_mut() {
                *v += epsilon;
            }
        }

        let log_priors: Vec<f64> = counts
            .iter()
            .map(|c| {
                if *c == 0 {
                    f64::NEG_INFINITY
                } else {
                    (*c as f64 / n as f64).ln()
                }
            })
            .collect();

        debug!(classes = k, features = d, "fitted naive bayes");
        Ok(NaiveBayesModel {
            log_priors,
            means,
            vars,
        })
    }
}

/// A fitted [`NaiveBayes`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    log_priors: Vec<f64>,
    means: Vec<Vec<f64>>,
    vars: Vec<Vec<f64>>,
}

impl NaiveBayesModel {
    /// Returns the per-class joint log likelihood of one feature row.
    pub fn log_likelihoods(&self, features: &[f64]) -> Vec<f64> {
        self.log_priors
            .iter()
            .enumerate()
            .map(|(class, prior)| {
                if prior.is_infinite() {
                    return f64::NEG_INFINITY;
                }
                let mut ll = *prior;
                for (j, x) in features.iter().enumerate() {
                    let mean = self.means[class][j];
                    let var = self.vars[class][j];
                    ll += -0.5 * (LN_2PI + var.ln()) - (x - mean).powi(2) / (2.0 * var);
                }
                ll
            })
            .collect()
    }
}

impl ClassificationModel for NaiveBayesModel {
    fn num_features(&self) -> usize {
        self.means.first().map_or(0, Vec::len)
    }

    fn predict_row(&self, features: &[f64]) -> f64 {
        let likelihoods = self.log_likelihoods(features);
        let mut best = 0usize;
        for (class, ll) in likelihoods.iter().enumerate() {
            if *ll > likelihoods[best] {
                best = class;
            }
        }
        best as f64
    }

    fn name(&self) -> &str {
        "NaiveBayes"
    }
}
