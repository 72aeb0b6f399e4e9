//! Path resolution for the served root and for request paths.

use std::io;
use std::path::{Component, Path, PathBuf};

use super::{ServeError, ServeResult};

/// Resolve the configured repository path to a canonical absolute directory.
///
/// Relative paths are taken against the current directory and symlinks are
/// resolved, so index generation and file serving agree on one root.
pub fn resolve_repo_path(path: &Path) -> ServeResult<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| ServeError::Io {
                path: path.to_path_buf(),
                source: e,
            })?
            .join(path)
    };

    let canonical = absolute.canonicalize().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ServeError::NotFound(absolute.clone()),
        _ => ServeError::Io {
            path: absolute.clone(),
            source: e,
        },
    })?;

    if !canonical.is_dir() {
        return Err(ServeError::NotADirectory(canonical));
    }

    Ok(canonical)
}

/// Why a request path could not be mapped to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPathError {
    /// Nothing servable at that path
    NotFound,
    /// The path escapes the served root
    Forbidden,
}

/// Map a decoded request path onto a file under `root`.
///
/// `root` must already be canonical. Traversal segments are rejected
/// outright and the final target is canonicalized so that symlinks
/// pointing outside the root are refused as well.
pub fn resolve_request_path(root: &Path, request_path: &str) -> Result<PathBuf, RequestPathError> {
    let mut target = root.to_path_buf();

    for segment in request_path.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment == ".." || segment.contains('\\') || segment.contains('\0') {
            return Err(RequestPathError::Forbidden);
        }
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => target.push(segment),
            _ => return Err(RequestPathError::Forbidden),
        }
    }

    let canonical = target
        .canonicalize()
        .map_err(|_| RequestPathError::NotFound)?;
    if !canonical.starts_with(root) {
        return Err(RequestPathError::Forbidden);
    }
    if !canonical.is_file() {
        return Err(RequestPathError::NotFound);
    }

    Ok(canonical)
}
