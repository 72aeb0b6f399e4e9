//! Integration tests for the pkgrepo binary.
//!
//! Each test runs the real binary with `HOME` pointed at a temporary
//! directory, so config and log files never touch the user's own
//! `~/.pkgrepo`.

use std::fs;
use std::path::Path;
use std::process::Command;

use pkgrepo::package::{write_archive, PackageDescriptor};
use semver::Version;
use tempfile::TempDir;

/// Run the CLI with an isolated home directory and capture output.
fn run_cli(home: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pkgrepo"))
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command")
}

/// Assert a command succeeded.
fn assert_success(output: &std::process::Output, context: &str) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!(
            "{} failed:\nstdout: {}\nstderr: {}",
            context, stdout, stderr
        );
    }
}

fn write_pkg(dir: &Path, file: &str, name: &str, version: &str) {
    let descriptor = PackageDescriptor::new(name, Version::parse(version).unwrap());
    write_archive(&descriptor, &[("README", name.as_bytes())], &dir.join(file)).unwrap();
}

#[test]
fn test_index_writes_index_file() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();
    write_pkg(repo.path(), "foo-1.0.0.pkg", "foo", "1.0.0");
    write_pkg(repo.path(), "bar-2.1.0.pkg", "bar", "2.1.0");

    let output = run_cli(
        home.path(),
        &[
            "index",
            repo.path().to_str().unwrap(),
            "--url",
            "http://127.0.0.1:8879",
        ],
    );
    assert_success(&output, "index");

    let index = fs::read_to_string(repo.path().join("index.toml")).unwrap();
    assert!(index.starts_with("api_version = \"v1\""));
    assert!(index.contains("[[bar]]"));
    assert!(index.contains("[[foo]]"));
    assert!(index.contains("url = \"http://127.0.0.1:8879/foo-1.0.0.pkg\""));

    // Logging goes to the configured file under the isolated home
    assert!(home
        .path()
        .join(".pkgrepo")
        .join("logs")
        .join("pkgrepo.log")
        .exists());
}

#[test]
fn test_serve_missing_repository_fails() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("no-such-repo");

    let output = run_cli(
        home.path(),
        &["serve", "--repo-path", missing.to_str().unwrap()],
    );

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "stderr: {}", stderr);
    assert!(stderr.contains("not found"), "stderr: {}", stderr);
    assert!(!missing.exists());

    // The path is checked before regeneration is announced
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Regenerating"), "stdout: {}", stdout);
}

#[test]
fn test_serve_default_repository_comes_from_config() {
    let home = TempDir::new().unwrap();

    // Nothing exists under the default ~/.pkgrepo/repository/local
    let output = run_cli(home.path(), &["serve"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(".pkgrepo/repository/local"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_serve_address_in_use_fails_before_serving() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();
    write_pkg(repo.path(), "foo-1.0.0.pkg", "foo", "1.0.0");

    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = occupied.local_addr().unwrap().to_string();

    let output = run_cli(
        home.path(),
        &[
            "serve",
            "--repo-path",
            repo.path().to_str().unwrap(),
            "--address",
            &address,
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Regenerating index. This may take a moment."));
    assert!(!stdout.contains("Now serving"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&address), "stderr: {}", stderr);

    // The index was still written before the bind was attempted
    assert!(repo.path().join("index.toml").is_file());
}

#[test]
fn test_invalid_config_is_reported() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".pkgrepo");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.ini"),
        "[serve]\nrecursive = sometimes\n",
    )
    .unwrap();

    let output = run_cli(home.path(), &["index", home.path().to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration error"), "stderr: {}", stderr);
    assert!(stderr.contains("serve.recursive"), "stderr: {}", stderr);
}
