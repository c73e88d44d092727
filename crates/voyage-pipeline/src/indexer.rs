//! Categorical string indexing.
//!
//! [`StringIndexer`] fits a vocabulary over one string column and maps each
//! distinct value to a double label index, ordered by descending frequency
//! with lexical tie-break, so index 0 is always the most frequent value.
//! Nulls and values unseen at fit time are *invalid* and are handled
//! according to the configured [`HandleInvalid`] policy.

use crate::error::{PipelineError, PipelineResult};
use crate::stage::{Estimator, Transformer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use voyage_frame::{Column, DataFrame};

/// Policy for nulls and unseen values during transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandleInvalid {
    /// Fail the transform with an error.
    #[default]
    Error,
    /// Drop the offending rows.
    Skip,
    /// Assign the extra index `vocabulary_size` to all invalid values.
    Keep,
}

/// Estimator that learns a string-to-index vocabulary for one column.
///
/// # Example
///
/// ```
/// use voyage_frame::prelude::*;
/// use voyage_pipeline::indexer::StringIndexer;
/// use voyage_pipeline::stage::{Estimator, Transformer};
///
/// let frame = DataFrame::new(vec![Column::from_str_values(
///     "Sex",
///     vec!["male".into(), "female".into(), "male".into()],
/// )])
/// .unwrap();
///
/// let model = StringIndexer::new("Sex", "SexIndex").fit(&frame).unwrap();
/// let indexed = model.transform(&frame).unwrap();
/// // "male" is most frequent, so it gets index 0.
/// assert_eq!(indexed.column("SexIndex").unwrap().f64_value(0).unwrap(), Some(0.0));
/// assert_eq!(indexed.column("SexIndex").unwrap().f64_value(1).unwrap(), Some(1.0));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringIndexer {
    /// The string column to index.
    pub input_col: String,
    /// The name of the produced index column.
    pub output_col: String,
    /// How to treat nulls and unseen values.
    pub handle_invalid: HandleInvalid,
}

impl StringIndexer {
    /// Creates an indexer reading `input_col` and writing `output_col`.
    pub fn new(input_col: impl Into<String>, output_col: impl Into<String>) -> Self {
        Self {
            input_col: input_col.into(),
            output_col: output_col.into(),
            handle_invalid: HandleInvalid::Error,
        }
    }

    /// Sets the invalid-value policy.
    pub fn with_handle_invalid(mut self, policy: HandleInvalid) -> Self {
        self.handle_invalid = policy;
        self
    }
}

impl Estimator for StringIndexer {
    fn fit(&self, frame: &DataFrame) -> PipelineResult<Box<dyn Transformer>> {
        let column = frame.column(&self.input_col)?;
        let mut counts: HashMap<String, usize> = HashMap::new();
        for row in 0..column.len() {
            if let Some(value) = column.str_value(row)? {
                *counts.entry(value.to_string()).or_insert(0) += 1;
            }
        }
        if counts.is_empty() {
            return Err(PipelineError::AllNull {
                column: self.input_col.clone(),
            });
        }

        let mut labels: Vec<(String, usize)> = counts.into_iter().collect();
        labels.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let labels: Vec<String> = labels.into_iter().map(|(label, _)| label).collect();
        debug!(
            column = %self.input_col,
            vocabulary = labels.len(),
            "fitted string indexer"
        );

        Ok(Box::new(StringIndexerModel {
            input_col: self.input_col.clone(),
            output_col: self.output_col.clone(),
            handle_invalid: self.handle_invalid,
            labels,
        }))
    }

    fn name(&self) -> &str {
        "StringIndexer"
    }
}

/// A fitted [`StringIndexer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringIndexerModel {
    input_col: String,
    output_col: String,
    handle_invalid: HandleInvalid,
    /// Vocabulary in index order: `labels[i]` has index `i`.
    labels: Vec<String>,
}

impl StringIndexerModel {
    /// Returns the vocabulary in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn index_of(&self, value: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == value)
            .map(|i| i as f64)
    }
}

impl Transformer for StringIndexerModel {
    fn transform(&self, frame: &DataFrame) -> PipelineResult<DataFrame> {
        let column = frame.column(&self.input_col)?;

        // First resolve every row; None marks an invalid value.
        let mut resolved: Vec<Option<f64>> = Vec::with_capacity(column.len());
        for row in 0..column.len() {
            resolved.push(column.str_value(row)?.and_then(|v| self.index_of(v)));
        }

        match self.handle_invalid {
            HandleInvalid::Error => {
                if let Some(row) = resolved.iter().position(Option::is_none) {
                    let value = column
                        .str_value(row)?
                        .map_or_else(|| "null".to_string(), |v| format!("{:?}", v));
                    return Err(PipelineError::InvalidValue {
                        column: self.input_col.clone(),
                        row,
                        value,
                    });
                }
                let values: Vec<f64> = resolved.into_iter().flatten().collect();
                Ok(frame.with_column(Column::from_f64(self.output_col.clone(), values))?)
            }
            HandleInvalid::Keep => {
                let extra = self.labels.len() as f64;
                let values: Vec<f64> = resolved.into_iter().map(|v| v.unwrap_or(extra)).collect();
                Ok(frame.with_column(Column::from_f64(self.output_col.clone(), values))?)
            }
            HandleInvalid::Skip => {
                let keep: Vec<usize> = resolved
                    .iter()
                    .enumerate()
                    .filter_map(|(row, v)| v.map(|_| row))
                    .collect();
                let values: Vec<f64> = resolved.into_iter().flatten().collect();
                let kept = frame.take_rows(&keep)?;
                Ok(kept.with_column(Column::from_f64(self.output_col.clone(), values))?)
            }
        }
    }

    fn name(&self) -> &str {
        "StringIndexerModel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embarked_frame() -> DataFrame {
        DataFrame::new(vec![Column::from_str_options(
            "Embarked",
            vec![
                Some("S".to_string()),
                Some("C".to_string()),
                Some("S".to_string()),
                None,
                Some("Q".to_string()),
                Some("S".to_string()),
                Some("C".to_string()),
            ],
        )])
        .unwrap()
    }

    #[test]
    fn test_frequency_ordering_with_lexical_ties() {
        let frame = DataFrame::new(vec![Column::from_str_values(
            "port",
            vec!["b".into(), "a".into(), "c".into(), "c".into()],
        )])
        .unwrap();
        let model = StringIndexer::new("port", "idx").fit(&frame).unwrap();
        let out = model.transform(&frame).unwrap();
        let idx = out.column("idx").unwrap();
        // c (2 occurrences) -> 0; a and b tie at 1 occurrence -> lexical.
        assert_eq!(idx.f64_value(2).unwrap(), Some(0.0));
        assert_eq!(idx.f64_value(1).unwrap(), Some(1.0));
        assert_eq!(idx.f64_value(0).unwrap(), Some(2.0));
    }

    #[test]
    fn test_error_policy_rejects_null() {
        let frame = embarked_frame();
        let model = StringIndexer::new("Embarked", "idx").fit(&frame).unwrap();
        let err = model.transform(&frame).unwrap_err();
        match err {
            PipelineError::InvalidValue { row, value, .. } => {
                assert_eq!(row, 3);
                assert_eq!(value, "null");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_keep_policy_buckets_invalid() {
        let frame = embarked_frame();
        let model = StringIndexer::new("Embarked", "idx")
            .with_handle_invalid(HandleInvalid::Keep)
            .fit(&frame)
            .unwrap();
        let out = model.transform(&frame).unwrap();
        assert_eq!(out.num_rows(), 7);
        // Vocabulary is {S, C, Q}, so the null bucket is 3.
        assert_eq!(out.column("idx").unwrap().f64_value(3).unwrap(), Some(3.0));
    }

    #[test]
    fn test_skip_policy_drops_rows() {
        let frame = embarked_frame();
        let model = StringIndexer::new("Embarked", "idx")
            .with_handle_invalid(HandleInvalid::Skip)
            .fit(&frame)
            .unwrap();
        let out = model.transform(&frame).unwrap();
        assert_eq!(out.num_rows(), 6);
        assert_eq!(out.column("idx").unwrap().null_count(), 0);
    }

    #[test]
    fn test_all_null_fit_fails() {
        let frame =
            DataFrame::new(vec![Column::from_str_options("c", vec![None, None])]).unwrap();
        let err = StringIndexer::new("c", "idx").fit(&frame).unwrap_err();
        assert!(matches!(err, PipelineError::AllNull { .. }));
    }
}
