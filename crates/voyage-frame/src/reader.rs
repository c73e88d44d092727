//! CSV ingestion with schema inference.
//!
//! The reader delegates tokenization to the `csv` crate and layers type
//! inference on top: each column is scanned and assigned the narrowest of
//! `integer`, `double`, `boolean`, or `string` that every non-empty cell
//! satisfies. Empty cells are nulls, and every inferred column is marked
//! nullable since a header-only schema carries no stronger guarantee.
//!
//! # Example
//!
//! ```no_run
//! use voyage_frame::reader::CsvReadOptions;
//! use voyage_frame::frame::DataFrame;
//!
//! let frame = DataFrame::read_csv("data/titanic.csv", CsvReadOptions::default()).unwrap();
//! frame.print_schema();
//! ```

use crate::column::Column;
use crate::error::{FrameError, FrameResult};
use crate::frame::DataFrame;
use crate::schema::DataType;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Options controlling CSV reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvReadOptions {
    /// Whether the first row is a header naming the columns.
    pub header: bool,
    /// How many rows to scan for type inference; `None` scans all rows.
    pub infer_rows: Option<usize>,
    /// The field delimiter.
    pub delimiter: u8,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            header: true,
            infer_rows: None,
            delimiter: b',',
        }
    }
}

impl CsvReadOptions {
    /// Sets whether the first row is a header.
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Limits type inference to the first `rows` rows.
    pub fn with_infer_rows(mut self, rows: usize) -> Self {
        self.infer_rows = Some(rows);
        self
    }

    /// Sets the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Per-column inference state. Starts at the narrowest type and widens as
/// cells rule candidates out.
#[derive(Debug, Clone, Copy)]
struct TypeCandidates {
    integer: bool,
    double: bool,
    boolean: bool,
    saw_value: bool,
}

impl TypeCandidates {
    fn new() -> Self {
        Self {
            integer: true,
            double: true,
            boolean: true,
            saw_value: false,
        }
    }

    fn observe(&mut self, cell: &str) {
        if cell.is_empty() {
            return;
        }
        self.saw_value = true;
        if self.integer && cell.parse::<i64>().is_err() {
            self.integer = false;
        }
        if self.double && cell.parse::<f64>().is_err() {
            self.double = false;
        }
        if self.boolean && !matches!(cell.to_ascii_lowercase().as_str(), "true" | "false") {
            self.boolean = false;
        }
    }

    fn resolve(&self) -> DataType {
        // A column with no values at all stays string-typed.
        if !self.saw_value {
            DataType::String
        } else if self.integer {
            DataType::Integer
        } else if self.double {
            DataType::Double
        } else if self.boolean {
            DataType::Boolean
        } else {
            DataType::String
        }
    }
}

fn parse_error(line: usize, column: &str, value: &str, expected: DataType) -> FrameError {
    FrameError::ParseError {
        line,
        column: column.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

/// Reads a CSV file into a [`DataFrame`].
///
/// # Errors
///
/// Returns [`FrameError::EmptyInput`] for a file with no data rows,
/// [`FrameError::ParseError`] when a cell outside the inference window
/// contradicts the inferred type, and I/O or CSV errors from the
/// underlying reader (ragged rows included).
pub fn read_csv(path: impl AsRef<Path>, options: CsvReadOptions) -> FrameResult<DataFrame> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(options.header)
        .delimiter(options.delimiter)
        .from_path(path)?;

    let names: Vec<String> = if options.header {
        reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect()
    } else {
        Vec::new()
    };

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    if rows.is_empty() {
        return Err(FrameError::EmptyInput {
            path: path.display().to_string(),
        });
    }

    let num_columns = names.len().max(rows[0].len());
    let names: Vec<String> = if names.is_empty() {
        (0..num_columns).map(|i| format!("_c{}", i)).collect()
    } else {
        names
    };

    // First pass: type inference over the configured window.
    let window = options.infer_rows.unwrap_or(rows.len()).min(rows.len());
    let mut candidates = vec![TypeCandidates::new(); num_columns];
    for row in rows.iter().take(window) {
        for (col, cell) in row.iter().enumerate() {
            candidates[col].observe(cell.trim());
        }
    }
    let types: Vec<DataType> = candidates.iter().map(TypeCandidates::resolve).collect();

    // Second pass: materialize typed columns. Line numbers are 1-based and
    // account for the header row.
    let line_offset = if options.header { 2 } else { 1 };
    let mut columns = Vec::with_capacity(num_columns);
    for (col, (name, data_type)) in names.iter().zip(&types).enumerate() {
        let cells = rows.iter().enumerate().map(|(row_idx, row)| {
            (row_idx + line_offset, row.get(col).map(|s| s.trim()).unwrap_or(""))
        });
        let column = match data_type {
            DataType::Integer => {
                let values = cells
                    .map(|(line, cell)| {
                        if cell.is_empty() {
                            Ok(None)
                        } else {
                            cell.parse::<i64>()
                                .map(Some)
                                .map_err(|_| parse_error(line, name, cell, DataType::Integer))
                        }
                    })
                    .collect::<FrameResult<Vec<_>>>()?;
                Column::from_i64_options(name.clone(), values)
            }
            DataType::Double => {
                let values = cells
                    .map(|(line, cell)| {
                        if cell.is_empty() {
                            Ok(None)
                        } else {
                            cell.parse::<f64>()
                                .map(Some)
                                .map_err(|_| parse_error(line, name, cell, DataType::Double))
                        }
                    })
                    .collect::<FrameResult<Vec<_>>>()?;
                Column::from_f64_options(name.clone(), values)
            }
            DataType::Boolean => {
                let values = cells
                    .map(|(line, cell)| match cell.to_ascii_lowercase().as_str() {
                        "" => Ok(None),
                        "true" => Ok(Some(true)),
                        "false" => Ok(Some(false)),
                        _ => Err(parse_error(line, name, cell, DataType::Boolean)),
                    })
                    .collect::<FrameResult<Vec<_>>>()?;
                Column::from_bool_options(name.clone(), values)
            }
            DataType::String => {
                let values = cells
                    .map(|(_, cell)| {
                        if cell.is_empty() {
                            None
                        } else {
                            Some(cell.to_string())
                        }
                    })
                    .collect();
                Column::from_str_options(name.clone(), values)
            }
        };
        columns.push(column.marked_nullable());
    }

    let frame = DataFrame::new(columns)?;
    info!(
        path = %path.display(),
        rows = frame.num_rows(),
        columns = frame.num_columns(),
        "read CSV file"
    );
    Ok(frame)
}

impl DataFrame {
    /// Reads a CSV file into a frame. See [`read_csv`].
    pub fn read_csv(path: impl AsRef<Path>, options: CsvReadOptions) -> FrameResult<Self> {
        read_csv(path, options)
    }
}
