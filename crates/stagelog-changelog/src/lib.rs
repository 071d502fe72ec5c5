//! stagelog changelog - release notes from per-change entry files
//!
//! Changelog entries are small XML documents dropped into an unreleased
//! directory per major version line. This crate cuts releases out of those
//! directories and renders every release into AsciiDoc.

pub mod exporter;
pub mod formatter;
pub mod layout;
pub mod model;
pub mod releaser;

pub use exporter::{ChangelogExporter, ExportOptions, ExportReport};
pub use formatter::{AsciiDocFormatter, ReleaseFormatter};
pub use layout::ChangelogDirectory;
pub use model::{Author, ChangelogEntry, ChangelogRelease, Description, EntryType, Issue};
pub use releaser::{release_version_major, ChangelogReleaser, ReleaseOptions, ReleaseReport, ReleaseStep};
