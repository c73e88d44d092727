//! The [`DataFrame`] type: an ordered collection of equal-length columns.

use crate::column::Column;
use crate::error::{FrameError, FrameResult};
use crate::schema::Schema;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An in-memory table.
///
/// A frame owns its columns; every operation that changes shape returns a
/// new frame and leaves the input untouched.
///
/// # Example
///
/// ```
/// use voyage_frame::column::Column;
/// use voyage_frame::frame::DataFrame;
///
/// let frame = DataFrame::new(vec![
///     Column::from_i64("Survived", vec![0, 1, 1]),
///     Column::from_f64("Fare", vec![7.25, 71.28, 7.92]),
/// ])
/// .unwrap();
/// assert_eq!(frame.num_rows(), 3);
/// assert_eq!(frame.num_columns(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    columns: Vec<Column>,
}

impl DataFrame {
    /// Creates a frame from columns.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::LengthMismatch`] if column lengths differ and
    /// [`FrameError::DuplicateColumn`] if two columns share a name.
    pub fn new(columns: Vec<Column>) -> FrameResult<Self> {
        if let Some(first) = columns.first() {
            let rows = first.len();
            for col in &columns {
                if col.len() != rows {
                    return Err(FrameError::LengthMismatch {
                        name: col.name().to_string(),
                        expected: rows,
                        actual: col.len(),
                    });
                }
            }
        }
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name() == col.name()) {
                return Err(FrameError::DuplicateColumn {
                    name: col.name().to_string(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Returns the number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns the columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the schema derived from the columns.
    pub fn schema(&self) -> Schema {
        Schema::new(self.columns.iter().map(|c| c.field().clone()).collect())
    }

    /// Prints the schema tree to standard output.
    pub fn print_schema(&self) {
        print!("{}", self.schema().tree_string());
    }

    /// Returns `true` if a column with the given name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name() == name)
    }

    /// Looks up a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ColumnNotFound`] if the name is unknown.
    pub fn column(&self, name: &str) -> FrameResult<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| FrameError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Returns a new frame with the given column appended, or replacing an
    /// existing column of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::LengthMismatch`] if the column's length does
    /// not match the frame (non-empty frames only).
    pub fn with_column(&self, column: Column) -> FrameResult<Self> {
        if self.num_columns() > 0 && column.len() != self.num_rows() {
            return Err(FrameError::LengthMismatch {
                name: column.name().to_string(),
                expected: self.num_rows(),
                actual: column.len(),
            });
        }
        let mut columns = self.columns.clone();
        match columns.iter().position(|c| c.name() == column.name()) {
            Some(idx) => columns[idx] = column,
            None => columns.push(column),
        }
        Ok(Self { columns })
    }

    /// Returns a new frame without the named column.
    pub fn drop_column(&self, name: &str) -> FrameResult<Self> {
        if !self.has_column(name) {
            return Err(FrameError::ColumnNotFound {
                name: name.to_string(),
            });
        }
        Ok(Self {
            columns: self
                .columns
                .iter()
                .filter(|c| c.name() != name)
                .cloned()
                .collect(),
        })
    }

    /// Returns a new frame containing only the named columns, in the given
    /// order.
    pub fn select(&self, names: &[&str]) -> FrameResult<Self> {
        let columns = names
            .iter()
            .map(|name| self.column(name).cloned())
            .collect::<FrameResult<Vec<_>>>()?;
        Self::new(columns)
    }

    /// Returns a new frame containing the given rows, in order.
    pub fn take_rows(&self, indices: &[usize]) -> FrameResult<Self> {
        let columns = self
            .columns
            .iter()
            .map(|c| c.take(indices))
            .collect::<FrameResult<Vec<_>>>()?;
        Ok(Self { columns })
    }

    /// Splits the frame into disjoint row subsets with sizes proportional
    /// to `weights`.
    ///
    /// Rows are shuffled with a [`StdRng`] seeded from `seed`, so a fixed
    /// seed always produces the same partition. Every row lands in exactly
    /// one output frame; rounding remainders go to the last subset.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::InvalidSplit`] for an empty weight list or a
    /// non-positive weight.
    pub fn random_split(&self, weights: &[f64], seed: u64) -> FrameResult<Vec<Self>> {
        if weights.is_empty() {
            return Err(FrameError::InvalidSplit {
                message: "weight list is empty".to_string(),
            });
        }
        if weights.iter().any(|w| *w <= 0.0 || !w.is_finite()) {
            return Err(FrameError::InvalidSplit {
                message: format!("weights must be positive and finite, got {:?}", weights),
            });
        }

        let mut indices: Vec<usize> = (0..self.num_rows()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let total: f64 = weights.iter().sum();
        let rows = indices.len();
        let mut splits = Vec::with_capacity(weights.len());
        let mut start = 0usize;
        let mut cumulative = 0.0;
        for (i, w) in weights.iter().enumerate() {
            cumulative += w;
            let end = if i + 1 == weights.len() {
                rows
            } else {
                ((cumulative / total) * rows as f64).round() as usize
            };
            let end = end.clamp(start, rows);
            splits.push(self.take_rows(&indices[start..end])?);
            start = end;
        }
        debug!(
            rows,
            subsets = splits.len(),
            seed,
            "split frame into random subsets"
        );
        Ok(splits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::from_i64("Survived", vec![0, 1, 1, 0, 1, 0, 0, 1, 0, 1]),
            Column::from_f64(
                "Fare",
                vec![7.25, 71.28, 7.92, 53.1, 8.05, 8.46, 51.86, 21.08, 11.13, 30.07],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = DataFrame::new(vec![
            Column::from_i64("a", vec![1, 2]),
            Column::from_i64("b", vec![1]),
        ])
        .unwrap_err();
        assert!(matches!(err, FrameError::LengthMismatch { .. }));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = DataFrame::new(vec![
            Column::from_i64("a", vec![1]),
            Column::from_i64("a", vec![2]),
        ])
        .unwrap_err();
        assert!(matches!(err, FrameError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_with_column_replaces() {
        let frame = sample_frame();
        let replaced = frame
            .with_column(Column::from_f64("Fare", vec![0.0; 10]))
            .unwrap();
        assert_eq!(replaced.num_columns(), 2);
        assert_eq!(replaced.column("Fare").unwrap().f64_value(0).unwrap(), Some(0.0));
        // Original untouched.
        assert_eq!(frame.column("Fare").unwrap().f64_value(0).unwrap(), Some(7.25));
    }

    #[test]
    fn test_select_and_drop() {
        let frame = sample_frame();
        let selected = frame.select(&["Fare"]).unwrap();
        assert_eq!(selected.num_columns(), 1);
        let dropped = frame.drop_column("Fare").unwrap();
        assert!(!dropped.has_column("Fare"));
        assert!(frame.select(&["Cabin"]).is_err());
    }

    #[test]
    fn test_random_split_partitions_rows() {
        let frame = sample_frame();
        let splits = frame.random_split(&[0.8, 0.2], 42).unwrap();
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].num_rows() + splits[1].num_rows(), 10);
        assert_eq!(splits[0].num_rows(), 8);
    }

    #[test]
    fn test_random_split_deterministic() {
        let frame = sample_frame();
        let a = frame.random_split(&[0.5, 0.5], 7).unwrap();
        let b = frame.random_split(&[0.5, 0.5], 7).unwrap();
        assert_eq!(a[0], b[0]);
        assert_eq!(a[1], b[1]);
    }

    #[test]
    fn test_random_split_rejects_bad_weights() {
        let frame = sample_frame();
        assert!(frame.random_split(&[], 1).is_err());
        assert!(frame.random_split(&[0.5, -0.5], 1).is_err());
    }

    #[test]
    fn test_schema_tree() {
        let frame = sample_frame();
        let tree = frame.schema().tree_string();
        assert!(tree.contains(" |-- Survived: integer (nullable = false)"));
        assert!(tree.contains(" |-- Fare: double (nullable = false)"));
    }
}
