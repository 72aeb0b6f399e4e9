//! Index builder error types.

use std::io;
use std::path::PathBuf;

use semver::Version;
use thiserror::Error;

use crate::package::ArtifactError;

/// Errors that abort an index build.
///
/// Malformed artifacts never show up here; they are skipped during the scan.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The repository directory does not exist
    #[error("repository directory not found: {0}")]
    NotFound(PathBuf),

    /// The repository path exists but is not a directory
    #[error("repository path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Reading or writing failed mid-operation
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Two artifacts provide the same package version (strict mode only)
    #[error("{name} {version} is provided by both {first} and {second}")]
    Collision {
        name: String,
        version: Version,
        first: PathBuf,
        second: PathBuf,
    },

    /// The document could not be serialized
    #[error("failed to serialize index: {0}")]
    Serialize(String),

    /// An index file could not be parsed
    #[error("invalid index document: {0}")]
    Parse(String),
}

impl IndexError {
    /// Returns true if the repository directory was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<ArtifactError> for IndexError {
    fn from(e: ArtifactError) -> Self {
        match e {
            ArtifactError::Io { path, source } | ArtifactError::WriteFailed { path, source } => {
                Self::Io { path, source }
            }
            other => Self::Parse(other.to_string()),
        }
    }
}

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
