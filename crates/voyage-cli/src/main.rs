//! Voyage CLI - train and evaluate survival classifiers on the Titanic
//! passenger table.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use voyage_cli::{Cli, Commands};

fn main() -> Result<()> {
    // RUST_LOG overrides the default info-level pipeline logging.
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("voyage=info".parse()?))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(cmd) => cmd.run()?,
        Commands::Schema(cmd) => cmd.run()?,
    }

    Ok(())
}
