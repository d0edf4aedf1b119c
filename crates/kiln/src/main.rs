//! kiln CLI - finish a generated Django backend skeleton
//!
//! This is the main entry point for the kiln command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let globals = cli.globals();
    match cli.command {
        Commands::Validate(args) => commands::validate::run(args, &globals),
        Commands::Configure(args) => commands::configure::run(args, &globals),
        Commands::Env => commands::env::run(&globals),
        Commands::Git => commands::git::run(&globals),
        Commands::CiVars(args) => commands::ci::run(args, &globals),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // step progress is logged at info
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
