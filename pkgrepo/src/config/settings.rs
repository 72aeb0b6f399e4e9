//! Settings structs for each configuration section.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// Repository server settings
    pub serve: ServeSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Repository server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeSettings {
    /// Directory served as the local repository
    pub repo_path: PathBuf,
    /// Listen address, `host:port`
    pub address: String,
    /// Descend into subdirectories when indexing
    pub recursive: bool,
    /// Fail indexing on duplicate (name, version) instead of keeping the last
    pub strict_collisions: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
