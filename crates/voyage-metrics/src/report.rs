//! Per-model evaluation reports.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Evaluation results for one fitted model.
///
/// # Example
///
/// ```
/// use voyage_metrics::report::ModelReport;
///
/// let report = ModelReport::new("LogisticRegression", 0.8475);
/// assert_eq!(report.report_line(), "LogisticRegression accuracy: 0.85");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReport {
    /// The model name.
    pub model: String,
    /// Held-out accuracy.
    pub accuracy: f64,
    /// Additional named metrics.
    pub extra: HashMap<String, f64>,
}

impl ModelReport {
    /// Creates a report with the given accuracy.
    pub fn new(model: impl Into<String>, accuracy: f64) -> Self {
        Self {
            model: model.into(),
            accuracy,
            extra: HashMap::new(),
        }
    }

    /// Adds a named metric.
    pub fn with_extra(mut self, name: impl Into<String>, value: f64) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    /// Renders the one-line accuracy report, two decimal places.
    pub fn report_line(&self) -> String {
        format!("{} accuracy: {:.2}", self.model, self.accuracy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_line_rounds_to_two_decimals() {
        assert_eq!(
            ModelReport::new("NaiveBayes", 0.666_666).report_line(),
            "NaiveBayes accuracy: 0.67"
        );
        assert_eq!(
            ModelReport::new("LinearSvc", 0.8).report_line(),
            "LinearSvc accuracy: 0.80"
        );
    }

    #[test]
    fn test_extra_metrics() {
        let report = ModelReport::new("DecisionTree", 0.81).with_extra("f1", 0.79);
        assert_eq!(report.extra.get("f1"), Some(&0.79));
    }
}
