//! Nullable columnar storage.
//!
//! A [`Column`] stores the values of one frame column together with a
//! validity mask. Values at null positions hold a type default and must
//! never be observed; every accessor routes through the mask.

use crate::error::{FrameError, FrameResult};
use crate::schema::{DataType, Field};
use serde::{Deserialize, Serialize};

/// The typed value storage behind a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum ColumnValues {
    Integer(Vec<i64>),
    Double(Vec<f64>),
    Boolean(Vec<bool>),
    String(Vec<String>),
}

impl ColumnValues {
    fn len(&self) -> usize {
        match self {
            ColumnValues::Integer(v) => v.len(),
            ColumnValues::Double(v) => v.len(),
            ColumnValues::Boolean(v) => v.len(),
            ColumnValues::String(v) => v.len(),
        }
    }

    fn data_type(&self) -> DataType {
        match self {
            ColumnValues::Integer(_) => DataType::Integer,
            ColumnValues::Double(_) => DataType::Double,
            ColumnValues::Boolean(_) => DataType::Boolean,
            ColumnValues::String(_) => DataType::String,
        }
    }
}

/// A single named, typed, nullable column.
///
/// # Example
///
/// ```
/// use voyage_frame::column::Column;
///
/// let col = Column::from_f64_options("Age", vec![Some(22.0), None, Some(26.0)]);
/// assert_eq!(col.len(), 3);
/// assert_eq!(col.null_count(), 1);
/// assert!(col.is_null(1));
/// assert_eq!(col.f64_value(0).unwrap(), Some(22.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    field: Field,
    values: ColumnValues,
    validity: Vec<bool>,
}

impl Column {
    fn build(field: Field, values: ColumnValues, validity: Vec<bool>) -> Self {
        debug_assert_eq!(values.len(), validity.len());
        Self {
            field,
            values,
            validity,
        }
    }

    /// Creates a non-nullable double column.
    pub fn from_f64(name: impl Into<String>, values: Vec<f64>) -> Self {
        let validity = vec![true; values.len()];
        Self::build(
            Field::new(name, DataType::Double, false),
            ColumnValues::Double(values),
            validity,
        )
    }

    /// Creates a double column from optional values; null slots hold `0.0`.
    pub fn from_f64_options(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let validity: Vec<bool> = values.iter().map(Option::is_some).collect();
        let nullable = validity.iter().any(|v| !v);
        let raw: Vec<f64> = values.into_iter().map(|v| v.unwrap_or(0.0)).collect();
        Self::build(
            Field::new(name, DataType::Double, nullable),
            ColumnValues::Double(raw),
            validity,
        )
    }

    /// Creates a non-nullable integer column.
    pub fn from_i64(name: impl Into<String>, values: Vec<i64>) -> Self {
        let validity = vec![true; values.len()];
        Self::build(
            Field::new(name, DataType::Integer, false),
            ColumnValues::Integer(values),
            validity,
        )
    }

    /// Creates an integer column from optional values; null slots hold `0`.
    pub fn from_i64_options(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        let validity: Vec<bool> = values.iter().map(Option::is_some).collect();
        let nullable = validity.iter().any(|v| !v);
        let raw: Vec<i64> = values.into_iter().map(|v| v.unwrap_or(0)).collect();
        Self::build(
            Field::new(name, DataType::Integer, nullable),
            ColumnValues::Integer(raw),
            validity,
        )
    }

    /// Creates a boolean column from optional values; null slots hold `false`.
    pub fn from_bool_options(name: impl Into<String>, values: Vec<Option<bool>>) -> Self {
        let validity: Vec<bool> = values.iter().map(Option::is_some).collect();
        let nullable = validity.iter().any(|v| !v);
        let raw: Vec<bool> = values.into_iter().map(|v| v.unwrap_or(false)).collect();
        Self::build(
            Field::new(name, DataType::Boolean, nullable),
            ColumnValues::Boolean(raw),
            validity,
        )
    }

    /// Creates a non-nullable string column.
    pub fn from_str_values(name: impl Into<String>, values: Vec<String>) -> Self {
        let validity = vec![true; values.len()];
        Self::build(
            Field::new(name, DataType::String, false),
            ColumnValues::String(values),
            validity,
        )
    }

    /// Creates a string column from optional values; null slots hold `""`.
    pub fn from_str_options(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        let validity: Vec<bool> = values.iter().map(Option::is_some).collect();
        let nullable = validity.iter().any(|v| !v);
        let raw: Vec<String> = values.into_iter().map(Option::unwrap_or_default).collect();
        Self::build(
            Field::new(name, DataType::String, nullable),
            ColumnValues::String(raw),
            validity,
        )
    }

    /// Returns the field descriptor for this column.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.field.name
    }

    /// Returns the column type.
    pub fn data_type(&self) -> DataType {
        self.values.data_type()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of null rows.
    pub fn null_count(&self) -> usize {
        self.validity.iter().filter(|v| !**v).count()
    }

    /// Returns `true` if the value at `row` is null.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn is_null(&self, row: usize) -> bool {
        !self.validity[row]
    }

    /// Returns a renamed copy of this column.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let mut out = self.clone();
        out.field.name = name.into();
        out
    }

    /// Marks the column nullable regardless of its current contents.
    ///
    /// File readers use this: a column inferred from data that happens to
    /// contain no nulls may still receive them in other files of the same
    /// shape.
    pub fn marked_nullable(mut self) -> Self {
        self.field.nullable = true;
        self
    }

    fn check_row(&self, row: usize) -> FrameResult<()> {
        if row >= self.len() {
            return Err(FrameError::RowOutOfBounds {
                index: row,
                rows: self.len(),
            });
        }
        Ok(())
    }

    fn type_mismatch(&self, expected: &str) -> FrameError {
        FrameError::TypeMismatch {
            name: self.field.name.clone(),
            expected: expected.to_string(),
            actual: self.data_type().to_string(),
        }
    }

    /// Reads a numeric value as `f64`, widening integers.
    ///
    /// Returns `None` for a null cell.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TypeMismatch`] for boolean or string columns.
    pub fn f64_value(&self, row: usize) -> FrameResult<Option<f64>> {
        self.check_row(row)?;
        if !self.validity[row] {
            return Ok(None);
        }
        match &self.values {
            ColumnValues::Double(v) => Ok(Some(v[row])),
            ColumnValues::Integer(v) => Ok(Some(v[row] as f64)),
            _ => Err(self.type_mismatch("numeric")),
        }
    }

    /// Reads an integer value.
    pub fn i64_value(&self, row: usize) -> FrameResult<Option<i64>> {
        self.check_row(row)?;
        if !self.validity[row] {
            return Ok(None);
        }
        match &self.values {
            ColumnValues::Integer(v) => Ok(Some(v[row])),
            _ => Err(self.type_mismatch("integer")),
        }
    }

    /// Reads a string value.
    pub fn str_value(&self, row: usize) -> FrameResult<Option<&str>> {
        self.check_row(row)?;
        if !self.validity[row] {
            return Ok(None);
        }
        match &self.values {
            ColumnValues::String(v) => Ok(Some(v[row].as_str())),
            _ => Err(self.type_mismatch("string")),
        }
    }

    /// Materializes the whole column as optional `f64` values.
    pub fn f64_values(&self) -> FrameResult<Vec<Option<f64>>> {
        (0..self.len()).map(|row| self.f64_value(row)).collect()
    }

    /// Materializes the whole column as optional strings.
    pub fn str_values(&self) -> FrameResult<Vec<Option<String>>> {
        (0..self.len())
            .map(|row| Ok(self.str_value(row)?.map(str::to_string)))
            .collect()
    }

    /// Returns a new column containing the given rows, in order.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::RowOutOfBounds`] if any index is out of range.
    pub fn take(&self, indices: &[usize]) -> FrameResult<Self> {
        for &idx in indices {
            self.check_row(idx)?;
        }
        let validity: Vec<bool> = indices.iter().map(|&i| self.validity[i]).collect();
        let values = match &self.values {
            ColumnValues::Integer(v) => {
                ColumnValues::Integer(indices.iter().map(|&i| v[i]).collect())
            }
            ColumnValues::Double(v) => {
                ColumnValues::Double(indices.iter().map(|&i| v[i]).collect())
            }
            ColumnValues::Boolean(v) => {
                ColumnValues::Boolean(indices.iter().map(|&i| v[i]).collect())
            }
            ColumnValues::String(v) => {
                ColumnValues::String(indices.iter().map(|&i| v[i].clone()).collect())
            }
        };
        Ok(Self::build(self.field.clone(), values, validity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_column_with_nulls() {
        let col = Column::from_f64_options("Age", vec![Some(22.0), None, Some(26.0)]);
        assert_eq!(col.len(), 3);
        assert_eq!(col.null_count(), 1);
        assert!(col.field().nullable);
        assert_eq!(col.f64_value(0).unwrap(), Some(22.0));
        assert_eq!(col.f64_value(1).unwrap(), None);
    }

    #[test]
    fn test_integer_widening() {
        let col = Column::from_i64("Pclass", vec![3, 1, 2]);
        assert_eq!(col.data_type(), DataType::Integer);
        assert_eq!(col.f64_value(0).unwrap(), Some(3.0));
        assert!(!col.field().nullable);
    }

    #[test]
    fn test_type_mismatch() {
        let col = Column::from_str_values("Name", vec!["Braund".to_string()]);
        let err = col.f64_value(0).unwrap_err();
        assert!(err.to_string().contains("expected numeric"));
    }

    #[test]
    fn test_take_preserves_nulls() {
        let col = Column::from_f64_options("Fare", vec![Some(7.25), None, Some(8.05), None]);
        let taken = col.take(&[3, 0]).unwrap();
        assert_eq!(taken.len(), 2);
        assert!(taken.is_null(0));
        assert_eq!(taken.f64_value(1).unwrap(), Some(7.25));
    }

    #[test]
    fn test_take_out_of_bounds() {
        let col = Column::from_f64("Fare", vec![7.25]);
        assert!(col.take(&[1]).is_err());
    }

    #[test]
    fn test_renamed() {
        let col = Column::from_f64("a", vec![1.0]);
        let renamed = col.renamed("b");
        assert_eq!(renamed.name(), "b");
        assert_eq!(renamed.f64_value(0).unwrap(), Some(1.0));
    }
}
