//! Artifact discovery.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::package::is_artifact_path;

use super::{IndexError, IndexResult};

/// How far below the repository root artifacts are discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Only files directly inside the root.
    #[default]
    Flat,
    /// Every subdirectory. Symlinked directories are not followed.
    Recursive,
}

impl ScanMode {
    /// Map a boolean "recursive" setting to a scan mode.
    pub fn from_recursive(recursive: bool) -> Self {
        if recursive {
            Self::Recursive
        } else {
            Self::Flat
        }
    }
}

/// Discover candidate artifacts under `root`.
///
/// Returns paths relative to `root`, ordered byte-wise by their
/// `/`-separated form so that scan order is stable across runs and
/// platforms. Hidden entries (leading `.`) are skipped, as are symlinks
/// whose target lies outside the root: the server refuses to serve those.
pub fn discover_artifacts(root: &Path, mode: ScanMode) -> IndexResult<Vec<PathBuf>> {
    let canonical_root = fs::canonicalize(root).map_err(io_err(root))?;
    let mut found = Vec::new();
    walk(root, &canonical_root, Path::new(""), mode, &mut found)?;
    found.sort_by_cached_key(|rel| scan_key(rel));
    Ok(found)
}

/// Sort key for a relative path: its segments joined with `/`, as bytes.
fn scan_key(relative: &Path) -> Vec<u8> {
    let mut key = Vec::new();
    for (i, segment) in relative.iter().enumerate() {
        if i > 0 {
            key.push(b'/');
        }
        key.extend_from_slice(segment.as_encoded_bytes());
    }
    key
}

fn walk(
    root: &Path,
    canonical_root: &Path,
    relative: &Path,
    mode: ScanMode,
    found: &mut Vec<PathBuf>,
) -> IndexResult<()> {
    let dir = root.join(relative);

    for entry in fs::read_dir(&dir).map_err(io_err(&dir))? {
        let entry = entry.map_err(io_err(&dir))?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let rel = relative.join(&name);
        let file_type = entry.file_type().map_err(io_err(&path))?;

        if file_type.is_dir() {
            if mode == ScanMode::Recursive {
                walk(root, canonical_root, &rel, mode, found)?;
            }
            continue;
        }

        let is_file = if file_type.is_symlink() {
            linked_file_within(&path, canonical_root)
        } else {
            file_type.is_file()
        };

        if is_file && is_artifact_path(&rel) {
            found.push(rel);
        }
    }

    Ok(())
}

/// True if a symlink resolves to a regular file inside the root.
///
/// Dangling links are not artifacts.
fn linked_file_within(link: &Path, canonical_root: &Path) -> bool {
    let Ok(target) = fs::canonicalize(link) else {
        return false;
    };
    if !target.starts_with(canonical_root) {
        debug!(
            link = %link.display(),
            target = %target.display(),
            "skipping symlink that leaves the repository"
        );
        return false;
    }
    target.is_file()
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> IndexError {
    let path = path.to_path_buf();
    move |source| IndexError::Io { path, source }
}
