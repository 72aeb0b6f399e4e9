//! Serving configuration.

use std::path::{Path, PathBuf};

use crate::index::{CollisionPolicy, ScanMode};

/// Default listen address.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:8879";

/// Everything the bootstrap sequence needs, fixed for the process lifetime.
///
/// The repository path is taken as given; defaults such as a home directory
/// location are the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    repo_path: PathBuf,
    address: String,
    scan_mode: ScanMode,
    collision_policy: CollisionPolicy,
}

impl ServeConfig {
    pub fn new(repo_path: impl Into<PathBuf>, address: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            address: address.into(),
            scan_mode: ScanMode::default(),
            collision_policy: CollisionPolicy::default(),
        }
    }

    pub fn with_scan_mode(mut self, scan_mode: ScanMode) -> Self {
        self.scan_mode = scan_mode;
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn scan_mode(&self) -> ScanMode {
        self.scan_mode
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    /// Base URL that index entries are anchored at.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_uses_address() {
        let config = ServeConfig::new("/srv/repo", DEFAULT_ADDRESS);
        assert_eq!(config.base_url(), "http://127.0.0.1:8879");
    }

    #[test]
    fn test_defaults() {
        let config = ServeConfig::new("/srv/repo", "localhost:9000");
        assert_eq!(config.scan_mode(), ScanMode::Flat);
        assert_eq!(config.collision_policy(), CollisionPolicy::LastWriteWins);
        assert_eq!(config.repo_path(), Path::new("/srv/repo"));
    }
}
