//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`serve`] - Regenerate the index and serve the local repository
//! - [`index`] - Regenerate the index without serving

pub mod common;
pub mod index;
pub mod serve;
