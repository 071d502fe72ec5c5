//! Release document formatters

mod asciidoc;

pub use asciidoc::{strip_comment_blocks, AsciiDocFormatter, AUTO_GENERATION_WARNING};

use stagelog_core::Result;

use crate::model::{ChangelogEntry, ChangelogRelease};

/// Trait for release document formatters
pub trait ReleaseFormatter: Send + Sync {
    /// Render one release, or the upcoming placeholder of a version line
    fn format_release(
        &self,
        release: &ChangelogRelease,
        intro: &str,
        entries: &[ChangelogEntry],
    ) -> Result<String>;

    /// Render the index linking every release. `releases` is oldest first
    /// and is listed newest first.
    fn format_index(&self, releases: &[ChangelogRelease]) -> String;

    /// Get the file extension for this format
    fn extension(&self) -> &'static str;

    /// File name of a release document; only the version is used so links
    /// can be derived from a version alone
    fn release_file_name(&self, release: &ChangelogRelease) -> String {
        format!("{}.{}", release.version, self.extension())
    }

    /// File name of the index document
    fn index_file_name(&self) -> String {
        format!("index.{}", self.extension())
    }
}
