//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use pkgrepo::config::ConfigFileError;
use pkgrepo::index::IndexError;
use pkgrepo::server::ServeError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Index generation failed
    Index(IndexError),
    /// Repository server failed to start or stopped
    Serve(ServeError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Serve(e) if e.is_not_found() => {
                eprintln!();
                eprintln!("The repository directory must exist before serving.");
                eprintln!("Create it, or point at another one with --repo-path");
                eprintln!("or repo_path in the [serve] section of config.ini.");
            }
            CliError::Serve(e) if e.is_bind_failure() => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. Another process is already listening on that address");
                eprintln!("  2. The address is not a valid host:port pair");
                eprintln!("Choose another address with --address or in config.ini.");
            }
            CliError::Index(IndexError::Collision { .. })
            | CliError::Serve(ServeError::Index(IndexError::Collision { .. })) => {
                eprintln!();
                eprintln!("Remove one of the duplicate artifacts, or drop --strict to");
                eprintln!("keep the artifact whose path sorts last.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Index(e) => write!(f, "Failed to generate index: {}", e),
            CliError::Serve(e) => write!(f, "Repository server error: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Index(e) => Some(e),
            CliError::Serve(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<IndexError> for CliError {
    fn from(e: IndexError) -> Self {
        CliError::Index(e)
    }
}

impl From<ServeError> for CliError {
    fn from(e: ServeError) -> Self {
        CliError::Serve(e)
    }
}
