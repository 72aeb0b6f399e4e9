//! Download URL anchoring.

use std::path::{Component, Path};

/// Join a base URL and an artifact path relative to the repository root.
///
/// Path segments are joined with `/` and percent-encoded. An empty base
/// yields a URL relative to the served root.
///
/// ```
/// use std::path::Path;
/// use pkgrepo::index::anchor_url;
///
/// assert_eq!(
///     anchor_url("http://127.0.0.1:8879", Path::new("foo-1.0.0.pkg")),
///     "http://127.0.0.1:8879/foo-1.0.0.pkg"
/// );
/// assert_eq!(anchor_url("", Path::new("foo-1.0.0.pkg")), "foo-1.0.0.pkg");
/// ```
pub fn anchor_url(base: &str, relative: &Path) -> String {
    let path = url_path(relative);
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        path
    } else {
        format!("{}/{}", base, path)
    }
}

/// Relative path with `/` separators and encoded segments.
pub fn url_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => {
                Some(urlencoding::encode(&part.to_string_lossy()).into_owned())
            }
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
