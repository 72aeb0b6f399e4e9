//! Index command - regenerate `index.toml` for a directory without serving it.

use std::path::PathBuf;

use clap::Args;
use pkgrepo::config::ConfigFile;
use pkgrepo::index::{CollisionPolicy, IndexBuilder, IndexDocument, ScanMode};

use super::common::{ConsoleOutput, Output};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the index command.
#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Directory containing package artifacts
    pub dir: PathBuf,

    /// Base URL the directory will be served from (empty writes relative URLs)
    #[arg(long, default_value = "")]
    pub url: String,

    /// Also index artifacts in subdirectories
    #[arg(long)]
    pub recursive: bool,

    /// Fail when two artifacts provide the same package version
    #[arg(long)]
    pub strict: bool,
}

/// Run the index command.
pub fn run(args: IndexArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("index");

    execute(args, runner.config(), &ConsoleOutput::new()).map(|_| ())
}

/// Build and write the index, printing a summary.
pub fn execute(
    args: IndexArgs,
    config: &ConfigFile,
    out: &dyn Output,
) -> Result<IndexDocument, CliError> {
    let recursive = args.recursive || config.serve.recursive;
    let strict = args.strict || config.serve.strict_collisions;

    let builder = IndexBuilder::new(&args.dir, args.url)
        .with_scan_mode(ScanMode::from_recursive(recursive))
        .with_collision_policy(CollisionPolicy::from_strict(strict));

    out.print(&format!("Indexing {} ... ", args.dir.display()));
    let document = builder.build()?;
    let index_path = document.write_to_dir(&args.dir)?;
    out.println("done");
    out.newline();

    out.header("Packages");
    if document.is_empty() {
        out.indented("(none)");
    }
    for name in document.package_names() {
        let versions = document.versions(name);
        let latest = &versions[0].version;
        out.indented(&format!("{} {} ({} versions)", name, latest, versions.len()));
    }
    out.newline();
    out.println(&format!(
        "Wrote {} ({} packages, {} versions)",
        index_path.display(),
        document.package_count(),
        document.len()
    ));

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::common::testing::MockOutput;
    use pkgrepo::index::IndexError;
    use pkgrepo::package::{write_archive, PackageDescriptor, Version};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_pkg(dir: &Path, file: &str, name: &str, version: &str) {
        let descriptor = PackageDescriptor::new(name, Version::parse(version).unwrap());
        write_archive(&descriptor, &[("data.txt", b"data".as_slice())], &dir.join(file)).unwrap();
    }

    fn args(dir: &Path, url: &str) -> IndexArgs {
        IndexArgs {
            dir: dir.to_path_buf(),
            url: url.to_string(),
            recursive: false,
            strict: false,
        }
    }

    #[test]
    fn test_writes_index_with_summary() {
        let temp = TempDir::new().unwrap();
        write_pkg(temp.path(), "foo-1.0.0.pkg", "foo", "1.0.0");
        write_pkg(temp.path(), "foo-1.1.0.pkg", "foo", "1.1.0");
        let output = MockOutput::new();

        let document = execute(
            args(temp.path(), "https://example.com/repo/"),
            &ConfigFile::default(),
            &output,
        )
        .unwrap();

        assert_eq!(
            document.latest("foo").unwrap().url,
            "https://example.com/repo/foo-1.1.0.pkg"
        );
        assert!(temp.path().join("index.toml").is_file());
        assert!(output.contains("foo 1.1.0 (2 versions)"));
        assert!(output.contains("1 packages, 2 versions"));
    }

    #[test]
    fn test_empty_url_writes_relative_urls() {
        let temp = TempDir::new().unwrap();
        write_pkg(temp.path(), "bar-2.1.0.pkg", "bar", "2.1.0");

        let document = execute(
            args(temp.path(), ""),
            &ConfigFile::default(),
            &MockOutput::new(),
        )
        .unwrap();

        assert_eq!(document.latest("bar").unwrap().url, "bar-2.1.0.pkg");
    }

    #[test]
    fn test_strict_from_config() {
        let temp = TempDir::new().unwrap();
        write_pkg(temp.path(), "a.pkg", "foo", "1.0.0");
        write_pkg(temp.path(), "b.pkg", "foo", "1.0.0");
        let mut config = ConfigFile::default();
        config.serve.strict_collisions = true;

        let err = execute(args(temp.path(), ""), &config, &MockOutput::new()).unwrap_err();

        assert!(matches!(err, CliError::Index(IndexError::Collision { .. })));
        assert!(!temp.path().join("index.toml").exists());
    }

    #[test]
    fn test_missing_directory() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");

        let err = execute(args(&missing, ""), &ConfigFile::default(), &MockOutput::new())
            .unwrap_err();

        assert!(matches!(err, CliError::Index(IndexError::NotFound(_))));
        assert!(!missing.exists());
    }

    #[test]
    fn test_empty_directory() {
        let temp = TempDir::new().unwrap();
        let output = MockOutput::new();

        let document = execute(args(temp.path(), ""), &ConfigFile::default(), &output).unwrap();

        assert!(document.is_empty());
        assert!(output.contains("(none)"));
    }
}
