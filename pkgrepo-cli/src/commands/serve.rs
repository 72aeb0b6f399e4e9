//! Serve command - regenerate the index and serve the local repository.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Args;
use pkgrepo::config::ConfigFile;
use pkgrepo::index::{CollisionPolicy, ScanMode};
use pkgrepo::server::{start_local_repo, ServeConfig, StartupObserver};
use tracing::info;

use super::common::{ConsoleOutput, Output};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Printed before the index is regenerated.
pub const REGENERATING_MESSAGE: &str = "Regenerating index. This may take a moment.";

/// Arguments for the serve command.
#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Repository directory [default: repo_path from config.ini]
    #[arg(long)]
    pub repo_path: Option<PathBuf>,

    /// Address to listen on as host:port [default: address from config.ini]
    #[arg(long)]
    pub address: Option<String>,

    /// Also index artifacts in subdirectories
    #[arg(long)]
    pub recursive: bool,

    /// Fail when two artifacts provide the same package version
    #[arg(long)]
    pub strict: bool,
}

/// Resolve serve settings. CLI arguments take precedence, then config.
pub fn resolve_config(args: ServeArgs, config: &ConfigFile) -> ServeConfig {
    let repo_path = args
        .repo_path
        .unwrap_or_else(|| config.serve.repo_path.clone());
    let address = args
        .address
        .unwrap_or_else(|| config.serve.address.clone());
    let recursive = args.recursive || config.serve.recursive;
    let strict = args.strict || config.serve.strict_collisions;

    ServeConfig::new(repo_path, address)
        .with_scan_mode(ScanMode::from_recursive(recursive))
        .with_collision_policy(CollisionPolicy::from_strict(strict))
}

/// Reports startup progress to the user.
struct OutputObserver<'a> {
    out: &'a dyn Output,
}

impl StartupObserver for OutputObserver<'_> {
    fn on_indexing(&self, _repo_path: &Path) {
        self.out.println(REGENERATING_MESSAGE);
    }

    fn on_ready(&self, address: &str, _local_addr: SocketAddr) {
        self.out.println(&format!("Now serving you on {}", address));
    }
}

/// Run the serve command.
pub fn run(args: ServeArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("serve");
    let config = resolve_config(args, runner.config());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    runtime.block_on(execute(config, &ConsoleOutput::new()))
}

/// Start the repository server. Returns only if startup or serving fails.
pub async fn execute(config: ServeConfig, out: &dyn Output) -> Result<(), CliError> {
    info!(
        repo_path = %config.repo_path().display(),
        address = config.address(),
        scan_mode = ?config.scan_mode(),
        collision_policy = ?config.collision_policy(),
        "Starting local repository"
    );

    let observer = OutputObserver { out };
    start_local_repo(config, &observer).await?;
    Ok(())
}
