//! Error types for stagelog

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using StagelogError
pub type Result<T> = std::result::Result<T, StagelogError>;

/// Main error type for stagelog operations
#[derive(Debug, Error)]
pub enum StagelogError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Version-related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Version-related errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Failed to parse version
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, String),
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Failed to read a file or directory
    #[error("failed reading `{}`", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed writing `{}`", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a directory
    #[error("failed creating directory `{}`", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move a file or directory
    #[error("failed moving `{}` to `{}`", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed XML document
    #[error("failed parsing `{}`: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    /// Well-formed entry document that breaks an entry invariant
    #[error("invalid changelog entry `{}`: {reason}", .path.display())]
    InvalidEntry { path: PathBuf, reason: String },

    /// Release directory without its `.release.xml`
    #[error("release directory `{}` has no release metadata file", .0.display())]
    MissingReleaseMetadata(PathBuf),

    /// Nothing staged for the release being cut
    #[error("`{}` does not exist! A release without any changelogs don't make sense!", .0.display())]
    MissingUnreleasedDirectory(PathBuf),

    /// Description written in a markup other than AsciiDoc
    #[error("unsupported description format: `{0}`")]
    UnsupportedFormat(String),

    /// Exporting a single release directory failed
    #[error("failed exporting release from directory `{}`", .directory.display())]
    ExportFailed {
        directory: PathBuf,
        #[source]
        source: Box<StagelogError>,
    },
}

impl StagelogError {
    /// Walk through export wrappers to the error that actually failed
    pub fn root(&self) -> &StagelogError {
        match self {
            Self::Changelog(ChangelogError::ExportFailed { source, .. }) => source.root(),
            other => other,
        }
    }

    /// Whether this error is a broken structural precondition rather than an I/O or config problem
    pub fn is_precondition(&self) -> bool {
        matches!(
            self.root(),
            Self::Changelog(
                ChangelogError::MissingReleaseMetadata(_)
                    | ChangelogError::MissingUnreleasedDirectory(_)
                    | ChangelogError::UnsupportedFormat(_)
                    | ChangelogError::InvalidEntry { .. }
                    | ChangelogError::Parse { .. }
            )
        )
    }
}
