//! Loading ~/.pkgrepo/config.ini.
//!
//! The file is optional and never written by pkgrepo; every key falls back
//! to the values in [`super::defaults`].

use ini::Ini;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but could not be read or is not valid INI
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// A key holds a value pkgrepo cannot use
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Load configuration from the default path (~/.pkgrepo/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// A missing file yields the defaults. Nothing is created on disk.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        match Ini::load_from_file(path) {
            Ok(ini) => super::parser::parse_ini(&ini),
            Err(ini::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Get the path to the config directory (~/.pkgrepo).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pkgrepo")
}

/// Get the path to the config file (~/.pkgrepo/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_log_file, default_repo_path};
    use crate::server::DEFAULT_ADDRESS;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert!(config
            .serve
            .repo_path
            .ends_with(Path::new(".pkgrepo").join("repository").join("local")));
        assert_eq!(config.serve.address, DEFAULT_ADDRESS);
        assert!(!config.serve.recursive);
        assert!(!config.serve.strict_collisions);
        assert!(config.logging.file.ends_with("pkgrepo.log"));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
        assert!(!config_path.exists());
    }

    #[test]
    fn test_load_overrides_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        fs::write(
            &config_path,
            "[serve]\nrepo_path = /srv/packages\naddress = 0.0.0.0:9000\nstrict_collisions = yes\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config.serve.repo_path, PathBuf::from("/srv/packages"));
        assert_eq!(config.serve.address, "0.0.0.0:9000");
        assert!(config.serve.strict_collisions);
        assert!(!config.serve.recursive);
        assert_eq!(config.logging.file, default_log_file());
    }

    #[test]
    fn test_tilde_paths_expand_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        fs::write(
            &config_path,
            "[serve]\nrepo_path = ~/.pkgrepo/repository/local\n\n[logging]\nfile = ~/.pkgrepo/logs/pkgrepo.log\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&config_path).unwrap();
        if dirs::home_dir().is_some() {
            assert_eq!(config.serve.repo_path, default_repo_path());
            assert_eq!(config.logging.file, default_log_file());
        }
    }

    #[test]
    fn test_directory_path_is_read_error() {
        let temp_dir = TempDir::new().unwrap();

        let result = ConfigFile::load_from(temp_dir.path());
        assert!(matches!(result, Err(ConfigFileError::ReadError(_))));
    }

    #[test]
    fn test_config_file_path() {
        assert!(config_file_path().ends_with(Path::new(".pkgrepo").join("config.ini")));
    }
}
