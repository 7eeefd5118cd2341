//! gidctl - encode, decode and inspect global IDs from the command line.
//!
//! Types and parser versions come from a registry file (see
//! `globalid::RegistryConfig`).

use anyhow::Result;
use clap::Parser;

mod commands;
mod config;
mod error;
mod output;

use commands::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_tracing();

    // Run the command
    if let Err(e) = cli.run() {
        // Print error in a user-friendly way
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
