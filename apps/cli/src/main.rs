//! docgen CLI — exported-symbol documentation generator.
//!
//! Walks the local import graph from an entry file, extracts documentation
//! for exported symbols, and writes (or merges into) a Markdown API document.

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
