//! Moorage CLI - a workspace linker for monorepos

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("moorage=debug")
    } else {
        EnvFilter::new("moorage=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Link(args) => commands::link::execute(args),
        Commands::Workspace(args) => commands::workspace::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
