//! Package artifacts and their embedded descriptors.
//!
//! A package artifact is a gzip-compressed tar archive carrying a
//! `package.toml` descriptor, either at the archive root or one directory
//! deep (`<name>/package.toml`). The descriptor, not the file name, is the
//! authority on which package and version an artifact provides, so a renamed
//! artifact still indexes correctly.
//!
//! # Example
//!
//! ```ignore
//! use pkgrepo::package::{read_descriptor, calculate_sha256};
//!
//! let descriptor = read_descriptor("repo/foo-1.0.0.pkg".as_ref())?;
//! let digest = calculate_sha256("repo/foo-1.0.0.pkg".as_ref())?;
//! println!("{} {} {}", descriptor.name, descriptor.version, digest);
//! ```

mod archive;
mod descriptor;
mod error;

pub use archive::{
    calculate_sha256, is_artifact_path, read_descriptor, write_archive, ARTIFACT_EXTENSIONS,
    DESCRIPTOR_FILENAME,
};
pub use descriptor::{parse_descriptor, serialize_descriptor, validate_name, PackageDescriptor};
pub use error::{ArtifactError, ArtifactResult};

// Re-export semver::Version for convenience
pub use semver::Version;
