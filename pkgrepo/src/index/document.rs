//! Index document model and the `index.toml` file format.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use toml::{Table, Value};

use super::{IndexError, IndexResult};
use crate::package::PackageDescriptor;

/// File name of the index inside a served directory.
pub const INDEX_FILENAME: &str = "index.toml";

/// Format version written to every index.
pub const API_VERSION: &str = "v1";

const API_VERSION_KEY: &str = "api_version";
const GENERATED_KEY: &str = "generated";

/// Returns true if `name` is a document-level key and cannot name a package.
pub fn is_reserved_key(name: &str) -> bool {
    name == API_VERSION_KEY || name == GENERATED_KEY
}

/// One version of one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Package name
    pub name: String,

    /// Package version
    pub version: Version,

    /// Download URL for the artifact
    pub url: String,

    /// SHA-256 checksum of the artifact bytes
    pub digest: String,

    /// Artifact size in bytes
    pub size: u64,

    /// Artifact path relative to the repository root, `/` separated
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl IndexEntry {
    /// Build an entry from a descriptor and the artifact's location facts.
    pub fn from_descriptor(
        descriptor: PackageDescriptor,
        url: String,
        digest: String,
        size: u64,
        path: String,
    ) -> Self {
        Self {
            name: descriptor.name,
            version: descriptor.version,
            url,
            digest,
            size,
            path,
            description: descriptor.description,
            authors: descriptor.authors,
            home: descriptor.home,
            keywords: descriptor.keywords,
        }
    }
}

/// The complete index of a repository at one point in time.
///
/// Package names are kept in lexicographic order and each package's
/// versions newest first, so serialization is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDocument {
    /// Format version
    pub api_version: String,

    /// Generation timestamp (UTC, whole seconds)
    pub generated: DateTime<Utc>,

    packages: BTreeMap<String, Vec<IndexEntry>>,
}

impl IndexDocument {
    /// Create an empty document.
    pub fn new(generated: DateTime<Utc>) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            generated,
            packages: BTreeMap::new(),
        }
    }

    /// Insert an entry, replacing any entry with the same name and version.
    ///
    /// Returns the replaced entry.
    pub fn insert(&mut self, entry: IndexEntry) -> Option<IndexEntry> {
        let versions = self.packages.entry(entry.name.clone()).or_default();

        if let Some(existing) = versions.iter_mut().find(|e| e.version == entry.version) {
            return Some(std::mem::replace(existing, entry));
        }

        versions.push(entry);
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        None
    }

    /// Find a specific package version.
    pub fn get(&self, name: &str, version: &Version) -> Option<&IndexEntry> {
        self.versions(name).iter().find(|e| &e.version == version)
    }

    /// All versions of a package, newest first.
    pub fn versions(&self, name: &str) -> &[IndexEntry] {
        self.packages.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Newest version of a package.
    pub fn latest(&self, name: &str) -> Option<&IndexEntry> {
        self.versions(name).first()
    }

    /// Package names in lexicographic order.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Every entry, grouped by package.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.packages.values().flatten()
    }

    /// Number of distinct packages.
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Number of entries across all packages.
    pub fn len(&self) -> usize {
        self.packages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Write the document to `dir/index.toml`.
    ///
    /// The content goes to a hidden temporary file first and is renamed into
    /// place, so readers never observe a partially written index.
    pub fn write_to_dir(&self, dir: &Path) -> IndexResult<PathBuf> {
        let content = serialize_index(self)?;
        let path = dir.join(INDEX_FILENAME);
        let temp_path = dir.join(format!(".{}.tmp", INDEX_FILENAME));

        fs::write(&temp_path, content).map_err(|e| IndexError::Io {
            path: temp_path.clone(),
            source: e,
        })?;

        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(IndexError::Io { path, source: e });
        }

        Ok(path)
    }

    /// Read `dir/index.toml`.
    pub fn load_from_dir(dir: &Path) -> IndexResult<Self> {
        let path = dir.join(INDEX_FILENAME);
        let content = fs::read_to_string(&path).map_err(|e| IndexError::Io {
            path: path.clone(),
            source: e,
        })?;
        parse_index(&content)
    }
}

/// Serialize an index document to `index.toml` content.
///
/// # Format
///
/// ```text
/// api_version = "v1"
/// generated = "2026-01-01T00:00:00Z"
///
/// [[foo]]
/// name = "foo"
/// version = "1.0.0"
/// url = "http://127.0.0.1:8879/foo-1.0.0.pkg"
/// digest = "<sha256>"
/// size = 1234
/// path = "foo-1.0.0.pkg"
/// ```
pub fn serialize_index(document: &IndexDocument) -> IndexResult<String> {
    let mut root = Table::new();
    root.insert(
        API_VERSION_KEY.to_string(),
        Value::String(document.api_version.clone()),
    );
    root.insert(
        GENERATED_KEY.to_string(),
        Value::String(
            document
                .generated
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
    );

    for (name, entries) in &document.packages {
        let values = entries
            .iter()
            .map(Value::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| IndexError::Serialize(e.to_string()))?;
        root.insert(name.clone(), Value::Array(values));
    }

    toml::to_string(&root).map_err(|e| IndexError::Serialize(e.to_string()))
}

/// Parse `index.toml` content.
pub fn parse_index(content: &str) -> IndexResult<IndexDocument> {
    let mut root: Table = content
        .parse()
        .map_err(|e: toml::de::Error| IndexError::Parse(e.to_string()))?;

    let api_version = match root.remove(API_VERSION_KEY) {
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(IndexError::Parse(format!(
                "{} must be a string, got {}",
                API_VERSION_KEY,
                other.type_str()
            )))
        }
        None => return Err(IndexError::Parse(format!("missing {}", API_VERSION_KEY))),
    };

    let generated = match root.remove(GENERATED_KEY) {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map_err(|e| IndexError::Parse(format!("invalid {}: {}", GENERATED_KEY, e)))?
            .with_timezone(&Utc),
        _ => return Err(IndexError::Parse(format!("missing {}", GENERATED_KEY))),
    };

    let mut document = IndexDocument::new(generated);
    document.api_version = api_version;

    for (name, value) in root {
        let Value::Array(values) = value else {
            return Err(IndexError::Parse(format!(
                "package '{}' must be an array of entries",
                name
            )));
        };

        for value in values {
            let entry: IndexEntry = value
                .try_into()
                .map_err(|e: toml::de::Error| IndexError::Parse(format!("{}: {}", name, e)))?;
            if entry.name != name {
                return Err(IndexError::Parse(format!(
                    "entry for '{}' listed under '{}'",
                    entry.name, name
                )));
            }
            document.insert(entry);
        }
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    fn entry(name: &str, version: &str) -> IndexEntry {
        let path = format!("{}-{}.pkg", name, version);
        IndexEntry {
            name: name.to_string(),
            version: Version::parse(version).unwrap(),
            url: format!("http://127.0.0.1:8879/{}", path),
            digest: "ab".repeat(32),
            size: 42,
            path,
            description: None,
            authors: Vec::new(),
            home: None,
            keywords: Vec::new(),
        }
    }

    #[test]
    fn test_versions_sorted_newest_first() {
        let mut doc = IndexDocument::new(fixed_time());
        doc.insert(entry("foo", "1.0.0"));
        doc.insert(entry("foo", "1.10.0"));
        doc.insert(entry("foo", "1.2.0"));

        let versions: Vec<String> = doc
            .versions("foo")
            .iter()
            .map(|e| e.version.to_string())
            .collect();
        assert_eq!(versions, vec!["1.10.0", "1.2.0", "1.0.0"]);
        assert_eq!(doc.latest("foo").unwrap().version, Version::new(1, 10, 0));
    }

    #[test]
    fn test_insert_replaces_same_version() {
        let mut doc = IndexDocument::new(fixed_time());
        assert!(doc.insert(entry("foo", "1.0.0")).is_none());

        let mut newer = entry("foo", "1.0.0");
        newer.digest = "cd".repeat(32);
        let replaced = doc.insert(newer).unwrap();

        assert_eq!(replaced.digest, "ab".repeat(32));
        assert_eq!(doc.len(), 1);
        assert_eq!(
            doc.get("foo", &Version::new(1, 0, 0)).unwrap().digest,
            "cd".repeat(32)
        );
    }

    #[test]
    fn test_serialized_layout() {
        let mut doc = IndexDocument::new(fixed_time());
        doc.insert(entry("foo", "1.0.0"));
        doc.insert(entry("bar", "2.1.0"));

        let content = serialize_index(&doc).unwrap();

        assert!(content.contains("api_version = \"v1\""));
        assert!(content.contains("generated = \"2026-01-02T03:04:05Z\""));
        let bar = content.find("[[bar]]").unwrap();
        let foo = content.find("[[foo]]").unwrap();
        assert!(bar < foo, "packages are ordered by name");
        assert!(content.contains("url = \"http://127.0.0.1:8879/foo-1.0.0.pkg\""));
    }

    #[test]
    fn test_parse_serialized_document() {
        let mut doc = IndexDocument::new(fixed_time());
        doc.insert(entry("foo", "1.0.0"));
        doc.insert(entry("foo", "0.9.0"));
        doc.insert(entry("bar", "2.1.0"));

        let parsed = parse_index(&serialize_index(&doc).unwrap()).unwrap();
        assert_eq!(parsed, doc);
        assert_eq!(parsed.package_names().collect::<Vec<_>>(), vec!["bar", "foo"]);
    }

    #[test]
    fn test_parse_rejects_missing_generated() {
        let result = parse_index("api_version = \"v1\"\n");
        assert!(matches!(result, Err(IndexError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_mismatched_entry_name() {
        let content = r#"
api_version = "v1"
generated = "2026-01-02T03:04:05Z"

[[foo]]
name = "bar"
version = "1.0.0"
url = "bar-1.0.0.pkg"
digest = "00"
size = 1
path = "bar-1.0.0.pkg"
"#;
        assert!(matches!(parse_index(content), Err(IndexError::Parse(_))));
    }

    #[test]
    fn test_reserved_keys() {
        assert!(is_reserved_key("generated"));
        assert!(is_reserved_key("api_version"));
        assert!(!is_reserved_key("foo"));
    }

    #[test]
    fn test_write_and_load() {
        let temp = TempDir::new().unwrap();
        let mut doc = IndexDocument::new(fixed_time());
        doc.insert(entry("foo", "1.0.0"));

        let path = doc.write_to_dir(temp.path()).unwrap();
        assert_eq!(path, temp.path().join(INDEX_FILENAME));
        assert!(!temp.path().join(".index.toml.tmp").exists());

        let loaded = IndexDocument::load_from_dir(temp.path()).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_write_replaces_previous_index() {
        let temp = TempDir::new().unwrap();
        let mut first = IndexDocument::new(fixed_time());
        first.insert(entry("foo", "1.0.0"));
        first.write_to_dir(temp.path()).unwrap();

        let second = IndexDocument::new(fixed_time());
        second.write_to_dir(temp.path()).unwrap();

        let loaded = IndexDocument::load_from_dir(temp.path()).unwrap();
        assert!(loaded.is_empty());
    }
}
