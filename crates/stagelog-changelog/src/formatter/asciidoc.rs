//! AsciiDoc release notes formatter

use std::collections::BTreeMap;

use stagelog_core::{ChangelogError, Result};
use tracing::{debug, instrument};

use super::ReleaseFormatter;
use crate::model::{Author, ChangelogEntry, ChangelogRelease, EntryType, Issue, ASCIIDOC_FORMAT};

/// Comment block marking a file as generated
pub const AUTO_GENERATION_WARNING: &str = "////
*DO NOT EDIT THIS FILE!*
This file is automatically generated from the release changelog directory!
////
";

const COMMENT_BLOCK_DELIMITER: &str = "////";

const UPCOMING_NOTICE: &str = "Changes staged for the next version that is yet to be released.";

/// AsciiDoc formatter
pub struct AsciiDocFormatter {
    license_header: String,
}

impl AsciiDocFormatter {
    /// Create a formatter prefixing documents with the given license block.
    /// An empty block leaves only the generation warning.
    pub fn new(license_header: impl Into<String>) -> Self {
        Self {
            license_header: license_header.into(),
        }
    }

    fn preamble(&self) -> String {
        if self.license_header.is_empty() {
            format!("{}\n", AUTO_GENERATION_WARNING)
        } else {
            format!("{}\n{}\n", self.license_header, AUTO_GENERATION_WARNING)
        }
    }
}

impl ReleaseFormatter for AsciiDocFormatter {
    #[instrument(skip_all, fields(version = %release.version, entry_count = entries.len()))]
    fn format_release(
        &self,
        release: &ChangelogRelease,
        intro: &str,
        entries: &[ChangelogEntry],
    ) -> Result<String> {
        let mut parts = vec![self.preamble(), release_title(release, intro)];
        if !entries.is_empty() {
            parts.push("== Changes\n".to_string());
            for (entry_type, group) in group_by_type(entries) {
                parts.push(format!("\n{}", entry_type_header(entry_type)));
                for entry in group {
                    parts.push(entry_line(entry)?);
                }
            }
        }
        let output = parts.concat();
        debug!(output_len = output.len(), "asciidoc release formatted");
        Ok(output)
    }

    fn format_index(&self, releases: &[ChangelogRelease]) -> String {
        let bullets: String = releases
            .iter()
            .rev()
            .map(|release| index_bullet(release, &self.release_file_name(release)))
            .collect();
        format!("{}= Release changelogs\n\n{}", self.preamble(), bullets)
    }

    fn extension(&self) -> &'static str {
        "adoc"
    }
}

fn release_title(release: &ChangelogRelease, intro: &str) -> String {
    match release.date {
        Some(date) => format!("= {} ({})\n{}\n", release.version, date, intro),
        None => format!("= {}\n\n{}\n\n", release.version, UPCOMING_NOTICE),
    }
}

/// Group entries by type, keeping file order within a group
fn group_by_type(entries: &[ChangelogEntry]) -> BTreeMap<EntryType, Vec<&ChangelogEntry>> {
    let mut grouped: BTreeMap<EntryType, Vec<&ChangelogEntry>> = BTreeMap::new();
    for entry in entries {
        grouped.entry(entry.entry_type).or_default().push(entry);
    }
    grouped
}

fn entry_type_header(entry_type: EntryType) -> String {
    let name = entry_type.as_str();
    let mut chars = name.chars();
    let title = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("=== {}\n\n", title)
}

fn entry_line(entry: &ChangelogEntry) -> Result<String> {
    if entry.description.format != ASCIIDOC_FORMAT {
        return Err(ChangelogError::UnsupportedFormat(entry.description.format.clone()).into());
    }

    let mut credits = Vec::new();
    if !entry.issues.is_empty() {
        credits.push(format!("for {}", issue_links(&entry.issues)));
    }
    if !entry.authors.is_empty() {
        credits.push(format!("by {}", author_names(&entry.authors)));
    }

    if credits.is_empty() {
        Ok(format!("* {}\n", entry.description.text))
    } else {
        Ok(format!("* {} ({})\n", entry.description.text, credits.join(" ")))
    }
}

fn issue_links(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}[{}]", issue.link, issue.id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn author_names(authors: &[Author]) -> String {
    authors
        .iter()
        .map(author_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ids are quoted literally; `Doe, John` names become `John Doe`
fn author_name(author: &Author) -> String {
    match author {
        Author::Id(id) => format!("`{}`", id),
        Author::Name(name) => match name.split_once(',') {
            Some((last, first)) => [first.trim(), last.trim()]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" "),
            None => name.clone(),
        },
    }
}

fn index_bullet(release: &ChangelogRelease, file_name: &str) -> String {
    let date_suffix = release
        .date
        .map(|date| format!(" ({})", date))
        .unwrap_or_default();
    format!("* xref:{}[{}]{}\n", file_name, release.version, date_suffix)
}

/// Drop `////` comment blocks from an intro fragment.
///
/// Each line consisting of exactly four slashes toggles a block; the
/// delimiters and everything between them are removed. The remaining lines
/// are joined with `\n` and terminated by one.
pub fn strip_comment_blocks(text: &str) -> String {
    let mut in_comment_block = false;
    let mut kept = Vec::new();
    for line in text.lines() {
        if line == COMMENT_BLOCK_DELIMITER {
            in_comment_block = !in_comment_block;
        } else if !in_comment_block {
            kept.push(line);
        }
    }
    format!("{}\n", kept.join("\n"))
}
