//! Index construction from a repository directory.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SubsecRound, Utc};
use semver::Version;
use tracing::{debug, info, instrument};

use super::document::{is_reserved_key, IndexDocument, IndexEntry};
use super::scan::{discover_artifacts, ScanMode};
use super::url::{anchor_url, url_path};
use super::{IndexError, IndexResult};
use crate::package::{calculate_sha256, read_descriptor};

/// What happens when two artifacts provide the same package version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// The artifact scanned later replaces the earlier one, silently.
    #[default]
    LastWriteWins,
    /// The build fails with [`IndexError::Collision`].
    Strict,
}

impl CollisionPolicy {
    /// Map a boolean "strict" setting to a policy.
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::LastWriteWins
        }
    }
}

/// Builds an [`IndexDocument`] for a directory of artifacts.
///
/// # Example
///
/// ```ignore
/// use pkgrepo::index::{IndexBuilder, ScanMode};
///
/// let document = IndexBuilder::new("/srv/packages", "http://127.0.0.1:8879")
///     .with_scan_mode(ScanMode::Recursive)
///     .build()?;
/// document.write_to_dir("/srv/packages".as_ref())?;
/// ```
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    root: PathBuf,
    base_url: String,
    scan_mode: ScanMode,
    collision_policy: CollisionPolicy,
    generated_at: Option<DateTime<Utc>>,
}

/// Outcome of indexing one candidate file.
enum Indexed {
    Entry(IndexEntry),
    Skipped,
}

impl IndexBuilder {
    /// Create a builder for `root` whose URLs are anchored at `base_url`.
    ///
    /// An empty `base_url` produces URLs relative to the served root.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
            scan_mode: ScanMode::default(),
            collision_policy: CollisionPolicy::default(),
            generated_at: None,
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

    /// Pin the generation timestamp instead of using the current time.
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Scan the directory and build the document.
    ///
    /// # Errors
    ///
    /// - [`IndexError::NotFound`] if the directory does not exist
    /// - [`IndexError::NotADirectory`] if the path is a file
    /// - [`IndexError::Io`] if any read fails; nothing is returned in that case
    /// - [`IndexError::Collision`] under [`CollisionPolicy::Strict`]
    #[instrument(skip(self), fields(root = %self.root.display(), base_url = %self.base_url))]
    pub fn build(&self) -> IndexResult<IndexDocument> {
        self.check_root()?;

        let candidates = discover_artifacts(&self.root, self.scan_mode)?;
        debug!(candidates = candidates.len(), "discovered candidate artifacts");

        let mut accepted: BTreeMap<(String, Version), IndexEntry> = BTreeMap::new();
        let mut skipped = 0usize;

        for relative in &candidates {
            let entry = match self.index_artifact(relative)? {
                Indexed::Entry(entry) => entry,
                Indexed::Skipped => {
                    skipped += 1;
                    continue;
                }
            };

            let key = (entry.name.clone(), entry.version.clone());
            if let Some(previous) = accepted.get(&key) {
                if self.collision_policy == CollisionPolicy::Strict {
                    return Err(IndexError::Collision {
                        name: key.0,
                        version: key.1,
                        first: PathBuf::from(&previous.path),
                        second: relative.clone(),
                    });
                }
                debug!(
                    name = %entry.name,
                    version = %entry.version,
                    replaced = %previous.path,
                    by = %entry.path,
                    "duplicate package version, keeping later artifact"
                );
            }
            accepted.insert(key, entry);
        }

        let generated = self
            .generated_at
            .unwrap_or_else(Utc::now)
            .trunc_subsecs(0);
        let mut document = IndexDocument::new(generated);
        for entry in accepted.into_values() {
            document.insert(entry);
        }

        info!(
            packages = document.package_count(),
            entries = document.len(),
            skipped,
            "index built"
        );
        Ok(document)
    }

    fn check_root(&self) -> IndexResult<()> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(IndexError::NotADirectory(self.root.clone())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(IndexError::NotFound(self.root.clone()))
            }
            Err(e) => Err(IndexError::Io {
                path: self.root.clone(),
                source: e,
            }),
        }
    }

    fn index_artifact(&self, relative: &Path) -> IndexResult<Indexed> {
        let path = self.root.join(relative);

        let descriptor = match read_descriptor(&path) {
            Ok(descriptor) => descriptor,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                debug!(path = %relative.display(), error = %e, "skipping unrecognized artifact");
                return Ok(Indexed::Skipped);
            }
        };

        if is_reserved_key(&descriptor.name) {
            debug!(
                path = %relative.display(),
                name = %descriptor.name,
                "skipping artifact with reserved package name"
            );
            return Ok(Indexed::Skipped);
        }

        let digest = calculate_sha256(&path)?;
        let size = fs::metadata(&path)
            .map_err(|e| IndexError::Io {
                path: path.clone(),
                source: e,
            })?
            .len();

        Ok(Indexed::Entry(IndexEntry::from_descriptor(
            descriptor,
            anchor_url(&self.base_url, relative),
            digest,
            size,
            url_path(relative),
        )))
    }
}

/// Build an index for `root` with default scan and collision settings.
pub fn build_index(root: &Path, base_url: &str) -> IndexResult<IndexDocument> {
    IndexBuilder::new(root, base_url).build()
}
