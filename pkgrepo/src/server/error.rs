//! Repository server error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::state::BootstrapState;
use crate::index::IndexError;

/// Errors that stop the repository server from reaching the serving state.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The repository directory does not exist
    #[error("repository directory not found: {0}")]
    NotFound(PathBuf),

    /// The repository path is not a directory
    #[error("repository path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Resolving the repository path failed
    #[error("failed to resolve repository path {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Building or writing the index failed
    #[error("failed to regenerate index: {0}")]
    Index(#[source] IndexError),

    /// The listen address could not be bound
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The HTTP server stopped with an error
    #[error("server error: {0}")]
    Serve(#[source] io::Error),

    /// A bootstrap step was attempted out of order
    #[error("invalid bootstrap transition from {from} to {to}")]
    InvalidTransition {
        from: BootstrapState,
        to: BootstrapState,
    },
}

impl ServeError {
    /// Returns true if the repository directory was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Index(IndexError::NotFound(_)))
    }

    /// Returns true if binding the listen address failed.
    pub fn is_bind_failure(&self) -> bool {
        matches!(self, Self::Bind { .. })
    }
}

impl From<IndexError> for ServeError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::NotFound(path) => Self::NotFound(path),
            IndexError::NotADirectory(path) => Self::NotADirectory(path),
            other => Self::Index(other),
        }
    }
}

/// Result type for server operations.
pub type ServeResult<T> = Result<T, ServeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_not_found_maps_to_not_found() {
        let err: ServeError = IndexError::NotFound(PathBuf::from("/nope")).into();
        assert!(matches!(err, ServeError::NotFound(_)));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_bind_error_message() {
        let err = ServeError::Bind {
            address: "127.0.0.1:8879".to_string(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };
        assert!(err.is_bind_failure());
        assert!(err.to_string().contains("127.0.0.1:8879"));
    }
}
