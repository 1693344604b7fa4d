//! shelfpage TUI — live terminal view of the reading shelf.
//!
//! Shows the three shelf categories side by side and refreshes them from the
//! published spreadsheet on demand, built with `ratatui` + `crossterm`.

mod app;
mod widgets;

use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;

    let runtime = tokio::runtime::Runtime::new()?;
    app::run(runtime.handle().clone())
}
