//! Multiclass evaluation over prediction and label columns.

use crate::confusion::ConfusionMatrix;
use crate::error::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};
use voyage_frame::DataFrame;

/// The metric an evaluator computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Metric {
    /// Fraction of predictions matching labels.
    #[default]
    Accuracy,
    /// Precision per class, weighted by class frequency.
    WeightedPrecision,
    /// Recall per class, weighted by class frequency.
    WeightedRecall,
    /// F1 per class, weighted by class frequency.
    WeightedF1,
}

/// Evaluator comparing a prediction column against a label column.
///
/// # Example
///
/// ```
/// use voyage_frame::prelude::*;
/// use voyage_metrics::evaluator::{Metric, MulticlassEvaluator};
///
/// let frame = DataFrame::new(vec![
///     Column::from_f64("prediction", vec![1.0, 0.0, 1.0, 1.0]),
///     Column::from_i64("Survived", vec![1, 0, 0, 1]),
/// ])
/// .unwrap();
///
/// let evaluator = MulticlassEvaluator::new("prediction", "Survived");
/// let accuracy = evaluator.evaluate(&frame).unwrap();
/// assert_eq!(accuracy, 0.75);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MulticlassEvaluator {
    /// The column holding predictions.
    pub prediction_col: String,
    /// The column holding true labels.
    pub label_col: String,
    /// The metric to compute.
    pub metric: Metric,
}

impl MulticlassEvaluator {
    /// Creates an accuracy evaluator over the given columns.
    pub fn new(prediction_col: impl Into<String>, label_col: impl Into<String>) -> Self {
        Self {
            prediction_col: prediction_col.into(),
            label_col: label_col.into(),
            metric: Metric::Accuracy,
        }
    }

    /// Sets the metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Evaluates the configured metric over a frame.
    pub fn evaluate(&self, frame: &DataFrame) -> EvalResult<f64> {
        let predictions = self.numeric_column(frame, &self.prediction_col)?;
        let labels = self.numeric_column(frame, &self.label_col)?;
        self.evaluate_pairs(&predictions, &labels)
    }

    fn numeric_column(&self, frame: &DataFrame, name: &str) -> EvalResult<Vec<f64>> {
        let column = frame.column(name)?;
        let mut values = Vec::with_capacity(column.len());
        for row in 0..column.len() {
            match column.f64_value(row)? {
                Some(v) => values.push(v),
                None => {
                    return Err(EvalError::NullValue {
                        column: name.to_string(),
                        row,
                    })
                }
            }
        }
        Ok(values)
    }

    /// Evaluates the configured metric over aligned slices.
    pub fn evaluate_pairs(&self, predictions: &[f64], labels: &[f64]) -> EvalResult<f64> {
        let cm = ConfusionMatrix::from_pairs(predictions, labels)?;
        Ok(match self.metric {
            Metric::Accuracy => cm.correct() as f64 / cm.total() as f64,
            Metric::WeightedPrecision => weighted_average(&cm, precision),
            Metric::WeightedRecall => weighted_average(&cm, recall),
            Metric::WeightedF1 => weighted_average(&cm, f1),
        })
    }
}

fn precision(cm: &ConfusionMatrix, class: f64) -> f64 {
    let predicted = cm.predicted_positives(class);
    if predicted == 0 {
        0.0
    } else {
        cm.true_positives(class) as f64 / predicted as f64
    }
}

fn recall(cm: &ConfusionMatrix, class: f64) -> f64 {
    let actual = cm.actual_positives(class);
    if actual == 0 {
        0.0
    } else {
        cm.true_positives(class) as f64 / actual as f64
    }
}

fn f1(cm: &ConfusionMatrix, class: f64) -> f64 {
    let p = precision(cm, class);
    let r = recall(cm, class);
    if p + r == 0.0 {
        0.0
    } else {
        2.0 * p * r / (p + r)
    }
}

/// Averages a per-class metric weighted by true class frequency.
fn weighted_average(cm: &ConfusionMatrix, metric: fn(&ConfusionMatrix, f64) -> f64) -> f64 {
    let total = cm.total() as f64;
    cm.classes()
        .iter()
        .map(|class| {
            let weight = cm.actual_positives(*class) as f64 / total;
            weight * metric(cm, *class)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<f64>, Vec<f64>) {
        (
            vec![1.0, 0.0, 1.0, 1.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0],
        )
    }

    #[test]
    fn test_accuracy() {
        let (p, l) = sample();
        let evaluator = MulticlassEvaluator::new("prediction", "label");
        let acc = evaluator.evaluate_pairs(&p, &l).unwrap();
        assert!((acc - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_predictor_scores_one_everywhere() {
        let labels = vec![0.0, 1.0, 2.0, 1.0, 0.0];
        for metric in [
            Metric::Accuracy,
            Metric::WeightedPrecision,
            Metric::WeightedRecall,
            Metric::WeightedF1,
        ] {
            let evaluator =
                MulticlassEvaluator::new("prediction", "label").with_metric(metric);
            let score = evaluator.evaluate_pairs(&labels, &labels).unwrap();
            assert!((score - 1.0).abs() < 1e-12, "{:?} was {}", metric, score);
        }
    }

    #[test]
    fn test_weighted_recall_matches_hand_count() {
        let (p, l) = sample();
        let evaluator =
            MulticlassEvaluator::new("prediction", "label").with_metric(Metric::WeightedRecall);
        // Class 0: 2/3 recalled; class 1: 2/3 recalled; weights 0.5 each.
        let score = evaluator.evaluate_pairs(&p, &l).unwrap();
        assert!((score - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_null_prediction_rejected() {
        use voyage_frame::{Column, DataFrame};
        let frame = DataFrame::new(vec![
            Column::from_f64_options("prediction", vec![Some(1.0), None]),
            Column::from_i64("label", vec![1, 0]),
        ])
        .unwrap();
        let err = MulticlassEvaluator::new("prediction", "label")
            .evaluate(&frame)
            .unwrap_err();
        assert!(matches!(err, EvalError::NullValue { row: 1, .. }));
    }
}
