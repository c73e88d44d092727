//! Confusion counts over (prediction, label) pairs.

use crate::error::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A confusion matrix over the classes seen in either sequence.
///
/// Classes are the sorted distinct values across predictions and labels;
/// `count(p, l)` is how often class `p` was predicted where class `l` was
/// true.
///
/// # Example
///
/// ```
/// use voyage_metrics::confusion::ConfusionMatrix;
///
/// let cm = ConfusionMatrix::from_pairs(&[1.0, 0.0, 1.0], &[1.0, 0.0, 0.0]).unwrap();
/// assert_eq!(cm.count(1.0, 1.0), 1);
/// assert_eq!(cm.count(1.0, 0.0), 1);
/// assert_eq!(cm.total(), 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    classes: Vec<f64>,
    /// Row-major counts indexed `[predicted][actual]`.
    counts: Vec<Vec<usize>>,
    total: usize,
}

impl ConfusionMatrix {
    /// Builds the matrix from aligned prediction and label sequences.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::LengthMismatch`] for unaligned input and
    /// [`EvalError::EmptyInput`] for empty sequences.
    pub fn from_pairs(predictions: &[f64], labels: &[f64]) -> EvalResult<Self> {
        if predictions.len() != labels.len() {
            return Err(EvalError::LengthMismatch {
                predictions: predictions.len(),
                labels: labels.len(),
            });
        }
        if predictions.is_empty() {
            return Err(EvalError::EmptyInput);
        }

        let mut distinct = BTreeSet::new();
        for v in predictions.iter().chain(labels) {
            distinct.insert(v.to_bits());
        }
        let mut classes: Vec<f64> = distinct.into_iter().map(f64::from_bits).collect();
        classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let k = classes.len();
        let index = |v: f64| classes.iter().position(|c| *c == v).unwrap_or(0);
        let mut counts = vec![vec![0usize; k]; k];
        for (p, l) in predictions.iter().zip(labels) {
            counts[index(*p)][index(*l)] += 1;
        }
        Ok(Self {
            classes,
            counts,
            total: predictions.len(),
        })
    }

    /// Returns the classes in ascending order.
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    /// Returns how often `predicted` was predicted where `actual` was true.
    pub fn count(&self, predicted: f64, actual: f64) -> usize {
        let p = self.classes.iter().position(|c| *c == predicted);
        let a = self.classes.iter().position(|c| *c == actual);
        match (p, a) {
            (Some(p), Some(a)) => self.counts[p][a],
            _ => 0,
        }
    }

    /// Returns the total pair count.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns the diagonal sum: pairs where prediction matched label.
    pub fn correct(&self) -> usize {
        (0..self.classes.len()).map(|i| self.counts[i][i]).sum()
    }

    /// True positives for one class.
    pub fn true_positives(&self, class: f64) -> usize {
        self.count(class, class)
    }

    /// All predictions of one class, right or wrong.
    pub fn predicted_positives(&self, class: f64) -> usize {
        match self.classes.iter().position(|c| *c == class) {
            Some(p) => self.counts[p].iter().sum(),
            None => 0,
        }
    }

    /// All rows truly of one class.
    pub fn actual_positives(&self, class: f64) -> usize {
        match self.classes.iter().position(|c| *c == class) {
            Some(a) => self.counts.iter().map(|row| row[a]).sum(),
            None => 0,
        }
    }
}
