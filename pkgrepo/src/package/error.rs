//! Artifact error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing a package artifact.
///
/// Only [`ArtifactError::Io`] and [`ArtifactError::WriteFailed`] are fatal
/// to an index build. Everything else means the file is not a usable
/// artifact and should be skipped.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The artifact could not be opened or read from disk
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The archive could not be decoded or carries no descriptor
    #[error("malformed artifact {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// The descriptor exists but is not valid
    #[error("invalid package descriptor: {0}")]
    InvalidDescriptor(String),

    /// Writing an archive failed
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ArtifactError {
    /// Returns true if this error must abort the operation that raised it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::WriteFailed { .. })
    }
}

/// Result type for artifact operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;
