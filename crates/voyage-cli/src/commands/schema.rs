//! Schema Command Implementation
//!
//! Reads a CSV file, infers its schema, and prints the schema tree.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use voyage_frame::{CsvReadOptions, DataFrame};

/// Print the inferred schema of a CSV file
///
/// # Example
///
/// ```bash
/// voyage schema --data data/titanic.csv
/// ```
#[derive(Args, Debug, Clone)]
pub struct SchemaCommand {
    /// Path to the CSV file to inspect
    #[arg(long, short = 'd', env = "VOYAGE_DATA", default_value = "data/titanic.csv")]
    pub data: PathBuf,

    /// Limit type inference to the first N rows
    #[arg(long)]
    pub infer_rows: Option<usize>,
}

impl SchemaCommand {
    /// Reads the file and prints the schema tree.
    pub fn run(&self) -> Result<()> {
        let mut options = CsvReadOptions::default();
        if let Some(rows) = self.infer_rows {
            options = options.with_infer_rows(rows);
        }
        let frame = DataFrame::read_csv(&self.data, options)
            .with_context(|| format!("failed to read {}", self.data.display()))?;
        print!("{}", frame.schema().tree_string());
        Ok(())
    }
}
