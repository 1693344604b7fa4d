//! shelfpage CLI — static reading-shelf page generator.
//!
//! Fetches the published spreadsheet export and renders the shelf page,
//! either once or on an interval.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
