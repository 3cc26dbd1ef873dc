//! extconf CLI - build configuration for native extension modules

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

    // Set up logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("extconf=debug")
        } else {
            EnvFilter::new("extconf=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cwd = commands::working_dir(cli.directory.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Stamp(args) => commands::stamp::execute(args, &cwd),
        Commands::Flags(args) => commands::flags::execute(args),
        Commands::Describe(args) => commands::describe::execute(args, &cwd),
        Commands::CompileCommands(args) => commands::compile_commands::execute(args, &cwd),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
