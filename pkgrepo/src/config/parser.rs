//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
/// Empty path values leave the default in place.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [serve] section
    if let Some(section) = ini.section(Some("serve")) {
        if let Some(v) = section.get("repo_path") {
            let v = v.trim();
            if !v.is_empty() {
                config.serve.repo_path = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("address") {
            let v = v.trim();
            if v.is_empty() {
                return Err(ConfigFileError::InvalidValue {
                    section: "serve".to_string(),
                    key: "address".to_string(),
                    value: v.to_string(),
                    reason: "must be a host:port address such as 127.0.0.1:8879".to_string(),
                });
            }
            config.serve.address = v.to_string();
        }
        if let Some(v) = section.get("recursive") {
            config.serve.recursive = parse_bool("serve", "recursive", v)?;
        }
        if let Some(v) = section.get("strict_collisions") {
            config.serve.strict_collisions = parse_bool("serve", "strict_collisions", v)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Parse a boolean setting.
fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigFileError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be true or false".to_string(),
        }),
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
