//! stagelog core - error taxonomy and configuration
//!
//! This crate provides the error types and the configuration record shared by
//! the changelog engine and the command-line front end.

pub mod config;
pub mod error;

pub use config::{load_config, load_config_or_default, Config};
pub use error::{ChangelogError, ConfigError, Result, StagelogError, VersionError};
