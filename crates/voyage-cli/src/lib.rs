//! Voyage CLI library: argument types and command implementations.
//!
//! The binary in `main.rs` parses [`Cli`] and dispatches to the command
//! modules. Command logic lives here so integration tests can drive the
//! commands without spawning a process.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod commands;

use clap::{Parser, Subcommand};
pub use commands::run::RunCommand;
pub use commands::schema::SchemaCommand;

/// Train and evaluate survival classifiers on the Titanic passenger table.
#[derive(Parser, Debug)]
#[command(name = "voyage", version, about)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline: ingest, prepare, train, evaluate.
    Run(RunCommand),
    /// Print the inferred schema of a CSV file and exit.
    Schema(SchemaCommand),
}
