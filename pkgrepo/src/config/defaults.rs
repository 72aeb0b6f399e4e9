//! Default values for all configuration settings.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::server::DEFAULT_ADDRESS;

/// Repository directory under the config directory.
pub const DEFAULT_REPOSITORY_SUBDIR: &str = "repository/local";

/// Log file name under `<config dir>/logs`.
pub const DEFAULT_LOG_FILE_NAME: &str = "pkgrepo.log";

/// Default repository path (~/.pkgrepo/repository/local).
pub fn default_repo_path() -> PathBuf {
    config_directory().join(DEFAULT_REPOSITORY_SUBDIR)
}

/// Default log file path (~/.pkgrepo/logs/pkgrepo.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join("logs").join(DEFAULT_LOG_FILE_NAME)
}

impl Default for ServeSettings {
    fn default() -> Self {
        Self {
            repo_path: default_repo_path(),
            address: DEFAULT_ADDRESS.to_string(),
            recursive: false,
            strict_collisions: false,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}
