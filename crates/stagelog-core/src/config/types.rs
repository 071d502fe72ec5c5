//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::{DEFAULT_CHANGELOG_DIRECTORY, DEFAULT_OUTPUT_DIRECTORY};

/// Main configuration for stagelog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Changelog source configuration
    pub changelog: ChangelogConfig,

    /// Export configuration
    pub export: ExportConfig,
}

/// Where changelog entries and releases live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Root directory holding release and unreleased directories
    pub directory: PathBuf,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_CHANGELOG_DIRECTORY),
        }
    }
}

/// How rendered release notes are written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory receiving `<version>.adoc` files and `index.adoc`
    pub output_directory: PathBuf,

    /// AsciiDoc block placed at the top of every generated file.
    /// `None` selects the built-in Apache-2.0 comment block; an empty string disables it.
    pub license_header: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            license_header: None,
        }
    }
}

impl ExportConfig {
    /// The license block to emit, with the built-in default applied
    pub fn effective_license_header(&self) -> String {
        match &self.license_header {
            None => super::defaults::DEFAULT_LICENSE_HEADER.to_string(),
            Some(header) if header.trim().is_empty() => String::new(),
            Some(header) if header.ends_with('\n') => header.clone(),
            Some(header) => format!("{}\n", header),
        }
    }
}
