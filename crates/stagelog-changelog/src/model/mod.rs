//! Changelog documents: entries and release metadata

mod entry;
mod release;

pub use entry::{Author, ChangelogEntry, Description, EntryType, Issue, ASCIIDOC_FORMAT};
pub use release::{ChangelogRelease, CHANGELOG_NAMESPACE};
