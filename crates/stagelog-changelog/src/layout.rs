//! Directory conventions of a changelog root
//!
//! ```text
//! <changelog>/
//!   .2.x.x/            unreleased entries of the 2.x line
//!     <entry>.xml
//!     <template>.ftl
//!   2.20.0/            a cut release
//!     .release.xml
//!     <entry>.xml
//!     intro.adoc
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use stagelog_core::{ChangelogError, Result};
use tracing::{debug, trace};

use crate::model::ChangelogRelease;

/// Release metadata file inside a release directory
pub const RELEASE_XML_FILE_NAME: &str = ".release.xml";

/// Optional free-form introduction of a release
pub const INTRO_ASCIIDOC_FILE_NAME: &str = "intro.adoc";

/// Extension of reusable changelog template files
pub const TEMPLATE_FILE_NAME_EXTENSION: &str = "ftl";

const ENTRY_FILE_NAME_EXTENSION: &str = "xml";

fn unreleased_directory_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\.(\d+)\.x\.x$").expect("unreleased directory pattern"))
}

/// Directory holding the entries of a released version
pub fn release_directory(changelog_directory: &Path, version: &str) -> PathBuf {
    changelog_directory.join(version)
}

/// Directory staging entries for the next release of a major version line
pub fn unreleased_directory(changelog_directory: &Path, version_major: u64) -> PathBuf {
    changelog_directory.join(format!(".{}.x.x", version_major))
}

/// Major version encoded in an unreleased directory name, e.g. `.2.x.x`
pub fn unreleased_directory_version_major(directory: &Path) -> Option<u64> {
    let name = directory.file_name()?.to_str()?;
    unreleased_directory_pattern()
        .captures(name)
        .and_then(|captures| captures[1].parse().ok())
}

/// All major version lines with an unreleased directory.
///
/// Children whose names don't follow the unreleased naming are skipped.
pub fn unreleased_directory_version_majors(changelog_directory: &Path) -> Result<BTreeSet<u64>> {
    let majors: BTreeSet<u64> = child_directories(changelog_directory)?
        .iter()
        .filter_map(|directory| unreleased_directory_version_major(directory))
        .collect();
    debug!(
        changelog_directory = %changelog_directory.display(),
        ?majors,
        "found unreleased version lines"
    );
    Ok(majors)
}

pub fn release_xml_file(release_directory: &Path) -> PathBuf {
    release_directory.join(RELEASE_XML_FILE_NAME)
}

pub fn intro_asciidoc_file(release_directory: &Path) -> PathBuf {
    release_directory.join(INTRO_ASCIIDOC_FILE_NAME)
}

/// Whether a file name denotes a reusable changelog template
pub fn is_template_file_name(file_name: &str) -> bool {
    file_name
        .strip_suffix(TEMPLATE_FILE_NAME_EXTENSION)
        .is_some_and(|stem| stem.len() > 1 && stem.ends_with('.'))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn list_children(directory: &Path) -> Result<Vec<PathBuf>> {
    let read_error = |source| ChangelogError::Read {
        path: directory.to_path_buf(),
        source,
    };
    let mut children = Vec::new();
    for dir_entry in std::fs::read_dir(directory).map_err(read_error)? {
        children.push(dir_entry.map_err(read_error)?.path());
    }
    children.sort();
    trace!(directory = %directory.display(), count = children.len(), "listed directory");
    Ok(children)
}

/// Immediate subdirectories, hidden ones included, sorted by name
pub fn child_directories(directory: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_children(directory)?
        .into_iter()
        .filter(|path| path.is_dir())
        .collect())
}

/// Non-hidden files of the given extension, sorted by name
fn visible_files_with_extension(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    Ok(list_children(directory)?
        .into_iter()
        .filter(|path| path.is_file() && !is_hidden(path))
        .filter(|path| path.extension().is_some_and(|e| e == extension))
        .collect())
}

/// Changelog entry documents of a release or unreleased directory, sorted by file name
pub fn entry_files(directory: &Path) -> Result<Vec<PathBuf>> {
    visible_files_with_extension(directory, ENTRY_FILE_NAME_EXTENSION)
}

/// Reusable template files of a directory, sorted by file name
pub fn template_files(directory: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_children(directory)?
        .into_iter()
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_template_file_name)
        })
        .collect())
}

/// What a child directory of the changelog root stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangelogDirectory {
    /// Staged entries of a major version line, not released yet
    Unreleased { version_major: u64 },
    /// A cut release, described by its metadata document
    Released(ChangelogRelease),
}

impl ChangelogDirectory {
    /// Resolve the state of a directory from its contents.
    ///
    /// A metadata document makes it a release; otherwise an unreleased
    /// directory name makes it unreleased. Other hidden directories are
    /// ignored (`None`), and any other directory is a release missing its
    /// metadata.
    pub fn probe(directory: &Path) -> Result<Option<Self>> {
        let release_xml_file = release_xml_file(directory);
        if release_xml_file.is_file() {
            let release = ChangelogRelease::read_from_xml_file(&release_xml_file)?;
            return Ok(Some(Self::Released(release)));
        }
        if let Some(version_major) = unreleased_directory_version_major(directory) {
            return Ok(Some(Self::Unreleased { version_major }));
        }
        if is_hidden(directory) {
            debug!(directory = %directory.display(), "ignoring hidden directory");
            return Ok(None);
        }
        Err(ChangelogError::MissingReleaseMetadata(directory.to_path_buf()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let root = Path::new("src/changelog");
        assert_eq!(
            release_directory(root, "2.20.0"),
            PathBuf::from("src/changelog/2.20.0")
        );
        assert_eq!(
            unreleased_directory(root, 2),
            PathBuf::from("src/changelog/.2.x.x")
        );
        assert_eq!(
            release_xml_file(Path::new("src/changelog/2.20.0")),
            PathBuf::from("src/changelog/2.20.0/.release.xml")
        );
        assert_eq!(
            intro_asciidoc_file(Path::new("src/changelog/2.20.0")),
            PathBuf::from("src/changelog/2.20.0/intro.adoc")
        );
    }

    #[test]
    fn test_unreleased_directory_version_major() {
        assert_eq!(unreleased_directory_version_major(Path::new("x/.2.x.x")), Some(2));
        assert_eq!(unreleased_directory_version_major(Path::new(".10.x.x")), Some(10));
        assert_eq!(unreleased_directory_version_major(Path::new("2.x.x")), None);
        assert_eq!(unreleased_directory_version_major(Path::new(".2.1.x")), None);
        assert_eq!(unreleased_directory_version_major(Path::new(".a.x.x")), None);
        assert_eq!(unreleased_directory_version_major(Path::new(".git")), None);
    }

    #[test]
    fn test_unreleased_directory_version_majors_skips_other_names() {
        let temp = TempDir::new().unwrap();
        for name in [".2.x.x", ".3.x.x", ".idea", "2.20.0", ".4.0.x"] {
            std::fs::create_dir(temp.path().join(name)).unwrap();
        }
        std::fs::write(temp.path().join(".5.x.x"), "not a directory").unwrap();

        let majors = unreleased_directory_version_majors(temp.path()).unwrap();
        assert_eq!(majors.into_iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_unreleased_directory_version_majors_missing_root() {
        let temp = TempDir::new().unwrap();
        assert!(unreleased_directory_version_majors(&temp.path().join("missing")).is_err());
    }

    #[test]
    fn test_template_file_names() {
        assert!(is_template_file_name("release-notes.adoc.ftl"));
        assert!(is_template_file_name("a.ftl"));
        assert!(!is_template_file_name(".ftl"));
        assert!(!is_template_file_name("notes.ftlx"));
        assert!(!is_template_file_name("ftl"));
    }

    #[test]
    fn test_entry_and_template_files() {
        let temp = TempDir::new().unwrap();
        for name in [
            "b.xml",
            "a.xml",
            ".release.xml",
            "intro.adoc",
            ".release-notes.adoc.ftl",
            "notes.adoc.ftl",
        ] {
            std::fs::write(temp.path().join(name), "").unwrap();
        }
        std::fs::create_dir(temp.path().join("nested.xml")).unwrap();

        let entries = entry_files(temp.path()).unwrap();
        assert_eq!(
            entries,
            vec![temp.path().join("a.xml"), temp.path().join("b.xml")]
        );

        let templates = template_files(temp.path()).unwrap();
        assert_eq!(
            templates,
            vec![
                temp.path().join(".release-notes.adoc.ftl"),
                temp.path().join("notes.adoc.ftl"),
            ]
        );
    }

    #[test]
    fn test_probe() {
        let temp = TempDir::new().unwrap();

        let released = temp.path().join("2.19.0");
        std::fs::create_dir(&released).unwrap();
        ChangelogRelease::new("2.19.0", NaiveDate::from_ymd_opt(2022, 9, 9).unwrap())
            .write_to_xml_file(&release_xml_file(&released))
            .unwrap();
        assert_eq!(
            ChangelogDirectory::probe(&released).unwrap(),
            Some(ChangelogDirectory::Released(ChangelogRelease::new(
                "2.19.0",
                NaiveDate::from_ymd_opt(2022, 9, 9).unwrap()
            )))
        );

        let unreleased = temp.path().join(".2.x.x");
        std::fs::create_dir(&unreleased).unwrap();
        assert_eq!(
            ChangelogDirectory::probe(&unreleased).unwrap(),
            Some(ChangelogDirectory::Unreleased { version_major: 2 })
        );

        let hidden = temp.path().join(".cache");
        std::fs::create_dir(&hidden).unwrap();
        assert_eq!(ChangelogDirectory::probe(&hidden).unwrap(), None);

        let broken = temp.path().join("2.20.0");
        std::fs::create_dir(&broken).unwrap();
        let err = ChangelogDirectory::probe(&broken).unwrap_err();
        assert!(matches!(
            err,
            stagelog_core::StagelogError::Changelog(ChangelogError::MissingReleaseMetadata(_))
        ));
    }
}
