//! docbuild CLI: regenerate the ReST sources of the documentation site.
//!
//! Converts notebooks, module reference pages, and the corpus listing,
//! rewriting only the files whose content actually changed.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
