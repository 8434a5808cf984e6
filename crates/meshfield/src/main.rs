//! Entry point wiring the CLI surface to the preview runtime and the export
//! commands.
//!
//! Types:
//!
//! - None; this module focuses on orchestrating submodules.
//!
//! Functions:
//!
//! - `main` parses CLI input, initialises tracing, and dispatches to modes.

mod cli;
mod controller;
mod export;
mod run;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Export(export_cmd)) => run::export(&cli.run, &export_cmd.format),
        None => run::run(cli.run),
    }
}
