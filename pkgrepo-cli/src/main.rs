//! pkgrepo CLI - Command-line interface
//!
//! Serves a directory of package artifacts as a local repository, or just
//! regenerates its index.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::index::IndexArgs;
use commands::serve::ServeArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "pkgrepo")]
#[command(version = pkgrepo::VERSION)]
#[command(about = "Index and serve a local package repository", long_about = None)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the index and serve the repository over HTTP
    Serve(ServeArgs),

    /// Regenerate index.toml for a directory without serving it
    Index(IndexArgs),
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Serve(args) => commands::serve::run(args, cli.debug),
        Commands::Index(args) => commands::index::run(args, cli.debug),
    };

    if let Err(e) = result {
        e.exit();
    }
}
