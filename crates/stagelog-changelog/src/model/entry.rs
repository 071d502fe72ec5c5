//! Changelog entry documents

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use stagelog_core::{ChangelogError, Result};
use tracing::{debug, instrument};

/// Description markup accepted by the exporter
pub const ASCIIDOC_FORMAT: &str = "asciidoc";

/// Category of a change, in the order groups are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// New functionality
    Added,
    /// Changed behaviour
    Changed,
    /// Soon to be removed
    Deprecated,
    /// Removed functionality
    Removed,
    /// Bug fix
    Fixed,
    /// Vulnerability fix
    Security,
}

impl EntryType {
    /// Returns the lowercase name used in entry documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Changed => "changed",
            Self::Deprecated => "deprecated",
            Self::Removed => "removed",
            Self::Fixed => "fixed",
            Self::Security => "security",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "added" => Ok(Self::Added),
            "changed" => Ok(Self::Changed),
            "deprecated" => Ok(Self::Deprecated),
            "removed" => Ok(Self::Removed),
            "fixed" => Ok(Self::Fixed),
            "security" => Ok(Self::Security),
            _ => Err(format!("unknown changelog entry type: `{}`", s)),
        }
    }
}

/// Formatted text block tagged with its markup
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Description {
    /// Markup of `text`, see [`ASCIIDOC_FORMAT`]
    pub format: String,
    pub text: String,
}

/// Issue tracker reference
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Issue {
    pub id: String,
    pub link: String,
}

/// Contributor credited for a change
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    /// Handle of a committer, rendered literally
    Id(String),
    /// Free-text contributor name
    Name(String),
}

/// A single change, read from one `<entry>` document
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ChangelogEntry {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub description: Description,
    pub issues: Vec<Issue>,
    pub authors: Vec<Author>,
}

#[derive(Debug, Deserialize)]
struct EntryDocument {
    #[serde(rename = "@type")]
    entry_type: String,
    #[serde(rename = "issue", default)]
    issues: Vec<IssueDocument>,
    #[serde(rename = "author", default)]
    authors: Vec<AuthorDocument>,
    description: DescriptionDocument,
}

#[derive(Debug, Deserialize)]
struct IssueDocument {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@link")]
    link: String,
}

#[derive(Debug, Deserialize)]
struct AuthorDocument {
    #[serde(rename = "@id")]
    id: Option<String>,
    #[serde(rename = "@name")]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DescriptionDocument {
    #[serde(rename = "@format")]
    format: String,
    #[serde(rename = "$text", default)]
    text: String,
}

impl ChangelogEntry {
    /// Read an entry from an XML file
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from_xml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ChangelogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let entry = Self::from_xml_str(&content, path)?;
        debug!(
            entry_type = %entry.entry_type,
            issues = entry.issues.len(),
            authors = entry.authors.len(),
            "changelog entry read"
        );
        Ok(entry)
    }

    /// Parse an entry document; `path` is only used for error reporting
    pub fn from_xml_str(xml: &str, path: &Path) -> Result<Self> {
        let document: EntryDocument =
            quick_xml::de::from_str(xml).map_err(|e| ChangelogError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let invalid = |reason: String| ChangelogError::InvalidEntry {
            path: path.to_path_buf(),
            reason,
        };

        let entry_type = document.entry_type.parse::<EntryType>().map_err(invalid)?;

        let issues = document
            .issues
            .into_iter()
            .map(|issue| {
                let id = issue.id.trim();
                let link = issue.link.trim();
                if id.is_empty() || link.is_empty() {
                    return Err(invalid(
                        "an issue needs both a non-blank `id` and `link`".to_string(),
                    ));
                }
                Ok(Issue {
                    id: id.to_string(),
                    link: link.to_string(),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let authors = document
            .authors
            .into_iter()
            .map(|author| {
                let id = author.id.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
                let name = author
                    .name
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty());
                match (id, name) {
                    (Some(id), None) => Ok(Author::Id(id)),
                    (None, Some(name)) => Ok(Author::Name(name)),
                    _ => Err(invalid(
                        "an author needs exactly one of `id` or `name`".to_string(),
                    )),
                }
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let format = document.description.format.trim();
        if format.is_empty() {
            return Err(invalid("description `format` cannot be blank".to_string()).into());
        }

        Ok(Self {
            entry_type,
            description: Description {
                format: format.to_string(),
                text: document.description.text.trim().to_string(),
            },
            issues,
            authors,
        })
    }
}
