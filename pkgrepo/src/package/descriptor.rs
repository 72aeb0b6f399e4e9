//! The `package.toml` descriptor embedded in every artifact.

use semver::Version;
use serde::{Deserialize, Serialize};

use super::{ArtifactError, ArtifactResult};

/// Package descriptor parsed from an artifact's `package.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Package name (e.g., "foo")
    pub name: String,

    /// Package version
    pub version: Version,

    /// One-line description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Package authors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    /// Project home page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,

    /// Search keywords
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl PackageDescriptor {
    /// Create a descriptor with only the required fields set.
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
            description: None,
            authors: Vec::new(),
            home: None,
            keywords: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Validate a package name.
///
/// Names are non-empty, use only ASCII letters, digits, `.`, `_` and `-`,
/// and never start with `.`.
pub fn validate_name(name: &str) -> ArtifactResult<()> {
    if name.is_empty() {
        return Err(ArtifactError::InvalidDescriptor(
            "package name is empty".to_string(),
        ));
    }
    if name.starts_with('.') {
        return Err(ArtifactError::InvalidDescriptor(format!(
            "package name '{}' starts with '.'",
            name
        )));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(ArtifactError::InvalidDescriptor(format!(
            "package name '{}' contains invalid character '{}'",
            name, c
        )));
    }
    Ok(())
}

/// Parse a descriptor from `package.toml` content.
pub fn parse_descriptor(content: &str) -> ArtifactResult<PackageDescriptor> {
    let descriptor: PackageDescriptor =
        toml::from_str(content).map_err(|e| ArtifactError::InvalidDescriptor(e.to_string()))?;
    validate_name(&descriptor.name)?;
    Ok(descriptor)
}

/// Serialize a descriptor to `package.toml` content.
pub fn serialize_descriptor(descriptor: &PackageDescriptor) -> ArtifactResult<String> {
    toml::to_string(descriptor).map_err(|e| ArtifactError::InvalidDescriptor(e.to_string()))
}
