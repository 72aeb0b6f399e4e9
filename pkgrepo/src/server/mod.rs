//! Local repository server.
//!
//! Regenerates a repository's index for the address it will be served on,
//! binds that address, and serves the directory's files over HTTP.
//!
//! # Example
//!
//! ```ignore
//! use pkgrepo::server::{start_local_repo, ServeConfig, SilentObserver, DEFAULT_ADDRESS};
//!
//! let config = ServeConfig::new("/srv/packages", DEFAULT_ADDRESS);
//! start_local_repo(config, &SilentObserver).await?;
//! ```

mod bootstrap;
mod config;
mod error;
mod http;
mod path;
mod state;

pub use bootstrap::{
    start_local_repo, BoundRepository, PreparedRepository, RepositoryServer, ResolvedRepository,
    SilentObserver, StartupObserver,
};
pub use config::{ServeConfig, DEFAULT_ADDRESS};
pub use error::{ServeError, ServeResult};
pub use http::{content_type, router};
pub use path::{resolve_repo_path, resolve_request_path, RequestPathError};
pub use state::{Bootstrap, BootstrapState};
