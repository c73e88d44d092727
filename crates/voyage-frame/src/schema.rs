//! Schema types describing the columns of a frame.
//!
//! A [`Schema`] is an ordered list of [`Field`]s, each carrying a name, a
//! [`DataType`], and a nullability flag. Schemas are rendered in tree form
//! for display, one line per field under a `root` node.

use crate::error::{FrameError, FrameResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Double,
    /// Boolean
    Boolean,
    /// UTF-8 string
    String,
}

impl DataType {
    /// Returns `true` for types that can be read as `f64` values.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Double)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Integer => "integer",
            DataType::Double => "double",
            DataType::Boolean => "boolean",
            DataType::String => "string",
        };
        write!(f, "{}", name)
    }
}

/// A named, typed column descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name
    pub name: String,
    /// Column type
    pub data_type: DataType,
    /// Whether the column may contain nulls
    pub nullable: bool,
}

impl Field {
    /// Creates a new field.
    ///
    /// # Arguments
    ///
    /// * `name` - The column name
    /// * `data_type` - The column type
    /// * `nullable` - Whether nulls are allowed
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

/// An ordered collection of fields.
///
/// # Example
///
/// ```
/// use voyage_frame::schema::{DataType, Field, Schema};
///
/// let schema = Schema::new(vec![
///     Field::new("PassengerId", DataType::Integer, true),
///     Field::new("Name", DataType::String, true),
/// ]);
/// assert_eq!(schema.len(), 2);
/// assert!(schema.field("Name").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Creates a schema from an ordered list of fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field by name.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ColumnNotFound`] if no field has that name.
    pub fn field(&self, name: &str) -> FrameResult<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| FrameError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Returns the position of a field by name.
    pub fn index_of(&self, name: &str) -> FrameResult<usize> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| FrameError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Renders the schema as a tree, one line per field.
    ///
    /// The output mirrors the familiar inspection format:
    ///
    /// ```text
    /// root
    ///  |-- PassengerId: integer (nullable = true)
    ///  |-- Name: string (nullable = true)
    /// ```
    pub fn tree_string(&self) -> String {
        let mut out = String::from("root\n");
        for field in &self.fields {
            out.push_str(&format!(
                " |-- {}: {} (nullable = {})\n",
                field.name, field.data_type, field.nullable
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema::new(vec![
            Field::new("PassengerId", DataType::Integer, true),
            Field::new("Survived", DataType::Integer, true),
            Field::new("Name", DataType::String, true),
            Field::new("Fare", DataType::Double, true),
        ])
    }

    #[test]
    fn test_field_lookup() {
        let schema = sample_schema();
        assert_eq!(schema.field("Fare").unwrap().data_type, DataType::Double);
        assert_eq!(schema.index_of("Name").unwrap(), 2);
        assert!(schema.field("Cabin").is_err());
    }

    #[test]
    fn test_tree_string_format() {
        let schema = sample_schema();
        let tree = schema.tree_string();
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines[0], "root");
        assert_eq!(lines[1], " |-- PassengerId: integer (nullable = true)");
        assert_eq!(lines[4], " |-- Fare: double (nullable = true)");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_numeric_types() {
        assert!(DataType::Integer.is_numeric());
        assert!(DataType::Double.is_numeric());
        assert!(!DataType::String.is_numeric());
        assert!(!DataType::Boolean.is_numeric());
    }
}
