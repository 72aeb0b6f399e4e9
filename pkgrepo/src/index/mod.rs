//! Repository index generation.
//!
//! The index describes every package artifact in a repository directory.
//! Each version entry carries a download URL anchored at the base address
//! the index was built for, so an index is only valid for that address and
//! is regenerated rather than reused whenever the address changes.
//!
//! # Overview
//!
//! 1. Discover candidate files ([`discover_artifacts`], flat or recursive)
//! 2. Read each artifact's embedded descriptor and checksum it
//! 3. Resolve duplicate (name, version) pairs per [`CollisionPolicy`]
//! 4. Serialize to `index.toml` ([`serialize_index`])

mod builder;
mod document;
mod error;
mod scan;
mod url;

pub use builder::{build_index, CollisionPolicy, IndexBuilder};
pub use document::{
    is_reserved_key, parse_index, serialize_index, IndexDocument, IndexEntry, API_VERSION,
    INDEX_FILENAME,
};
pub use error::{IndexError, IndexResult};
pub use scan::{discover_artifacts, ScanMode};
pub use url::{anchor_url, url_path};
