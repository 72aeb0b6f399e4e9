//! pkgrepo - a local package repository
//!
//! Indexes a directory of versioned package artifacts and serves it over
//! HTTP so package tooling can install from it.
//!
//! # High-Level API
//!
//! For most use cases, [`server::start_local_repo`] does everything:
//!
//! ```ignore
//! use pkgrepo::server::{start_local_repo, ServeConfig, SilentObserver};
//!
//! let config = ServeConfig::new("/srv/packages", "127.0.0.1:8879");
//! start_local_repo(config, &SilentObserver).await?;
//! ```
//!
//! The [`index`] module builds `index.toml` on its own, for publishing a
//! directory through some other web server.

pub mod config;
pub mod index;
pub mod logging;
pub mod package;
pub mod server;

/// Version of the pkgrepo library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
