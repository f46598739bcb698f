//! MLB command-line front end
//!
//! Library half of the `mlb` binary: configuration, logging setup, the demo
//! seeder and subcommand bodies.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod commands;
pub mod config;
pub mod demo;
pub mod logging;

pub use config::{AppConfig, ConfigError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
