//! User configuration stored in `~/.pkgrepo/config.ini`.
//!
//! # Example
//!
//! ```ignore
//! use pkgrepo::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! println!("serving {} on {}", config.serve.repo_path.display(), config.serve.address);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;

pub use defaults::{
    default_log_file, default_repo_path, DEFAULT_LOG_FILE_NAME, DEFAULT_REPOSITORY_SUBDIR,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, LoggingSettings, ServeSettings};
