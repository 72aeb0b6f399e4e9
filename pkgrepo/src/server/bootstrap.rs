//! Repository server bootstrap.
//!
//! Startup runs in four steps, each consuming the previous step's output:
//!
//! 1. [`RepositoryServer::resolve`] canonicalizes the root and checks it exists
//! 2. [`RepositoryServer::prepare`] builds and writes `index.toml`
//! 3. [`RepositoryServer::bind`] binds the configured address
//! 4. [`RepositoryServer::serve`] serves files until the process is stopped
//!
//! [`start_local_repo`] runs all four and reports progress through a
//! [`StartupObserver`].

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tokio::net::TcpListener;
use tracing::{info, instrument};

use super::config::ServeConfig;
use super::http::router;
use super::path::resolve_repo_path;
use super::state::{Bootstrap, BootstrapState};
use super::{ServeError, ServeResult};
use crate::index::{IndexBuilder, IndexDocument};

/// Receives startup progress from [`start_local_repo`].
pub trait StartupObserver: Send + Sync {
    /// Called once the root is known to exist, before the index is regenerated.
    fn on_indexing(&self, _repo_path: &Path) {}

    /// Called once the index has been written.
    fn on_indexed(&self, _index_path: &Path, _document: &IndexDocument) {}

    /// Called after the listener is bound, before any request is served.
    fn on_ready(&self, _address: &str, _local_addr: SocketAddr) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl StartupObserver for SilentObserver {}

/// A repository root that exists, ready to be indexed.
#[derive(Debug)]
pub struct ResolvedRepository {
    root: PathBuf,
}

impl ResolvedRepository {
    /// Canonical repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// A repository whose index has been written.
#[derive(Debug)]
pub struct PreparedRepository {
    root: PathBuf,
    index_path: PathBuf,
    document: IndexDocument,
}

impl PreparedRepository {
    /// Canonical repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn document(&self) -> &IndexDocument {
        &self.document
    }
}

/// A prepared repository with a bound listener.
#[derive(Debug)]
pub struct BoundRepository {
    root: PathBuf,
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl BoundRepository {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Address the listener actually bound.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

/// Drives a repository from configuration to serving.
#[derive(Debug)]
pub struct RepositoryServer {
    config: ServeConfig,
    bootstrap: Bootstrap,
}

impl RepositoryServer {
    pub fn new(config: ServeConfig) -> Self {
        Self {
            config,
            bootstrap: Bootstrap::new(),
        }
    }

    pub fn config(&self) -> &ServeConfig {
        &self.config
    }

    pub fn state(&self) -> BootstrapState {
        self.bootstrap.state()
    }

    /// Resolve the configured repository root.
    ///
    /// Only valid before indexing starts. A missing root fails the server
    /// with nothing written.
    pub fn resolve(&mut self) -> ServeResult<ResolvedRepository> {
        let current = self.bootstrap.state();
        if !current.can_transition_to(BootstrapState::Indexing) {
            return Err(ServeError::InvalidTransition {
                from: current,
                to: BootstrapState::Indexing,
            });
        }

        let root = self
            .bootstrap
            .guard(resolve_repo_path(self.config.repo_path()))?;
        Ok(ResolvedRepository { root })
    }

    /// Build and write the index for a resolved root.
    ///
    /// On success the server is left in [`BootstrapState::Indexing`] with the
    /// index on disk, which is the only state binding may start from.
    #[instrument(skip_all, fields(root = %resolved.root.display()))]
    pub fn prepare(&mut self, resolved: ResolvedRepository) -> ServeResult<PreparedRepository> {
        self.bootstrap.advance(BootstrapState::Indexing)?;
        let root = resolved.root;

        let builder = IndexBuilder::new(&root, self.config.base_url())
            .with_scan_mode(self.config.scan_mode())
            .with_collision_policy(self.config.collision_policy());
        let document = self.bootstrap.guard(builder.build().map_err(ServeError::from))?;
        let index_path = self
            .bootstrap
            .guard(document.write_to_dir(&root).map_err(ServeError::from))?;

        info!(
            root = %root.display(),
            packages = document.package_count(),
            entries = document.len(),
            "index written"
        );

        Ok(PreparedRepository {
            root,
            index_path,
            document,
        })
    }

    /// Bind the configured address.
    ///
    /// The address is used exactly as configured. Failure is final.
    pub async fn bind(&mut self, prepared: PreparedRepository) -> ServeResult<BoundRepository> {
        self.bootstrap.advance(BootstrapState::Binding)?;

        let address = self.config.address().to_string();
        let listener = self.bootstrap.guard(
            TcpListener::bind(address.as_str())
                .await
                .map_err(|e| ServeError::Bind {
                    address: address.clone(),
                    source: e,
                }),
        )?;
        let local_addr = self.bootstrap.guard(
            listener
                .local_addr()
                .map_err(|e| ServeError::Bind { address, source: e }),
        )?;

        info!(%local_addr, "listener bound");

        Ok(BoundRepository {
            root: prepared.root,
            listener,
            local_addr,
        })
    }

    /// Serve the repository root. Runs until the process is terminated.
    pub async fn serve(&mut self, bound: BoundRepository) -> ServeResult<()> {
        self.bootstrap.advance(BootstrapState::Serving)?;

        info!(
            local_addr = %bound.local_addr,
            root = %bound.root.display(),
            "serving repository"
        );
        axum::serve(bound.listener, router(bound.root))
            .await
            .map_err(ServeError::Serve)
    }
}

/// Regenerate the index for `config.repo_path()` and serve it.
///
/// Returns only on failure; a healthy server runs until the process is
/// stopped.
pub async fn start_local_repo(
    config: ServeConfig,
    observer: &dyn StartupObserver,
) -> ServeResult<()> {
    let mut server = RepositoryServer::new(config);

    let resolved = server.resolve()?;
    observer.on_indexing(resolved.root());
    let prepared = server.prepare(resolved)?;
    observer.on_indexed(prepared.index_path(), prepared.document());

    let bound = server.bind(prepared).await?;
    observer.on_ready(server.config().address(), bound.local_addr());

    server.serve(bound).await
}
