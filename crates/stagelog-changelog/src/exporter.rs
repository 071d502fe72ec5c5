//! Release notes export

use std::path::{Path, PathBuf};

use serde::Serialize;
use stagelog_core::{ChangelogError, Result};
use tracing::{debug, info, instrument};

use crate::formatter::{strip_comment_blocks, AsciiDocFormatter, ReleaseFormatter};
use crate::layout::{self, ChangelogDirectory};
use crate::model::{ChangelogEntry, ChangelogRelease};

/// Options for an export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Root holding release and unreleased directories
    pub changelog_directory: PathBuf,
    /// Directory receiving the rendered documents
    pub output_directory: PathBuf,
    /// License block placed at the top of every document, may be empty
    pub license_header: String,
}

impl ExportOptions {
    /// Create options without a license header
    pub fn new(changelog_directory: impl Into<PathBuf>, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            changelog_directory: changelog_directory.into(),
            output_directory: output_directory.into(),
            license_header: String::new(),
        }
    }

    /// Set the license header
    pub fn with_license_header(mut self, license_header: impl Into<String>) -> Self {
        self.license_header = license_header.into();
        self
    }
}

/// What an export run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    /// Release directories, oldest release first
    pub release_directories: Vec<PathBuf>,
    /// Unreleased directories, highest major version first
    pub upcoming_directories: Vec<PathBuf>,
    /// Every document written, the index last
    pub written_files: Vec<PathBuf>,
}

impl ExportReport {
    /// Path of the index document
    pub fn index_file(&self) -> Option<&Path> {
        self.written_files.last().map(PathBuf::as_path)
    }
}

/// Renders every release of a changelog directory
pub struct ChangelogExporter {
    formatter: Box<dyn ReleaseFormatter>,
    options: ExportOptions,
}

impl ChangelogExporter {
    /// Create a new exporter with the AsciiDoc formatter
    pub fn new(options: ExportOptions) -> Self {
        Self {
            formatter: Box::new(AsciiDocFormatter::new(options.license_header.clone())),
            options,
        }
    }

    /// Export all releases, the upcoming releases and the index.
    ///
    /// Any failure aborts the whole run.
    #[instrument(skip(self), fields(
        changelog_directory = %self.options.changelog_directory.display(),
        output_directory = %self.options.output_directory.display(),
    ))]
    pub fn export(&self) -> Result<ExportReport> {
        let changelog_directory = &self.options.changelog_directory;
        let mut report = ExportReport::default();

        let mut releases = discover_releases(changelog_directory)?;
        releases.sort_by(|(_, a), (_, b)| a.date.cmp(&b.date));
        let version_majors: Vec<u64> = layout::unreleased_directory_version_majors(changelog_directory)?
            .into_iter()
            .rev()
            .collect();
        info!(
            releases = releases.len(),
            upcoming = version_majors.len(),
            "exporting changelog"
        );

        create_directory(&self.options.output_directory)?;

        let mut index = Vec::with_capacity(releases.len() + version_majors.len());
        for (release_directory, release) in releases {
            let written = self
                .export_release(&release_directory, &release)
                .map_err(|source| ChangelogError::ExportFailed {
                    directory: release_directory.clone(),
                    source: Box::new(source),
                })?;
            report.written_files.push(written);
            report.release_directories.push(release_directory);
            index.push(release);
        }

        for version_major in version_majors {
            let upcoming_directory = layout::unreleased_directory(changelog_directory, version_major);
            let upcoming = ChangelogRelease::upcoming(version_major);
            info!(directory = %upcoming_directory.display(), "exporting upcoming release directory");
            let written = self
                .export_upcoming(&upcoming_directory, &upcoming)
                .map_err(|source| ChangelogError::ExportFailed {
                    directory: upcoming_directory.clone(),
                    source: Box::new(source),
                })?;
            report.written_files.push(written);
            report.upcoming_directories.push(upcoming_directory);
            index.push(upcoming);
        }

        let index_file = self
            .options
            .output_directory
            .join(self.formatter.index_file_name());
        info!(path = %index_file.display(), "exporting release index");
        write_file(&index_file, &self.formatter.format_index(&index))?;
        report.written_files.push(index_file);

        Ok(report)
    }

    fn export_release(&self, release_directory: &Path, release: &ChangelogRelease) -> Result<PathBuf> {
        let intro = read_intro(release_directory)?;
        let entries = read_entries(release_directory)?;
        self.write_release(release, &intro, &entries)
    }

    fn export_upcoming(&self, upcoming_directory: &Path, upcoming: &ChangelogRelease) -> Result<PathBuf> {
        let entries = read_entries(upcoming_directory)?;
        self.write_release(upcoming, "", &entries)
    }

    fn write_release(
        &self,
        release: &ChangelogRelease,
        intro: &str,
        entries: &[ChangelogEntry],
    ) -> Result<PathBuf> {
        let document = self.formatter.format_release(release, intro, entries)?;
        let path = self
            .options
            .output_directory
            .join(self.formatter.release_file_name(release));
        write_file(&path, &document)?;
        debug!(path = %path.display(), version = %release.version, "release exported");
        Ok(path)
    }
}

/// Release directories of the changelog root with their metadata
fn discover_releases(changelog_directory: &Path) -> Result<Vec<(PathBuf, ChangelogRelease)>> {
    let mut releases = Vec::new();
    for directory in layout::child_directories(changelog_directory)? {
        if let Some(ChangelogDirectory::Released(release)) = ChangelogDirectory::probe(&directory)? {
            releases.push((directory, release));
        }
    }
    Ok(releases)
}

/// Intro fragment of a release with comment blocks removed, empty when absent
fn read_intro(release_directory: &Path) -> Result<String> {
    let intro_file = layout::intro_asciidoc_file(release_directory);
    if !intro_file.is_file() {
        return Ok(String::new());
    }
    let content = std::fs::read_to_string(&intro_file).map_err(|source| ChangelogError::Read {
        path: intro_file.clone(),
        source,
    })?;
    Ok(strip_comment_blocks(&content))
}

/// Entries of a directory; file name order keeps output stable across runs
fn read_entries(directory: &Path) -> Result<Vec<ChangelogEntry>> {
    layout::entry_files(directory)?
        .iter()
        .map(|path| ChangelogEntry::read_from_xml_file(path))
        .collect()
}

fn create_directory(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| {
        ChangelogError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| {
        ChangelogError::Write {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stagelog_core::StagelogError;
    use tempfile::TempDir;

    fn write_entry(directory: &Path, name: &str, entry_type: &str, text: &str) {
        std::fs::write(
            directory.join(name),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<entry type="{}">
  <issue id="{}" link="https://example.org/{}"/>
  <author name="Doe, Jane"/>
  <description format="asciidoc">{}</description>
</entry>
"#,
                entry_type, name, name, text
            ),
        )
        .unwrap();
    }

    fn make_release(root: &Path, version: &str, date: (i32, u32, u32)) -> PathBuf {
        let directory = layout::release_directory(root, version);
        std::fs::create_dir_all(&directory).unwrap();
        ChangelogRelease::new(
            version,
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        )
        .write_to_xml_file(&layout::release_xml_file(&directory))
        .unwrap();
        directory
    }

    fn fixture() -> (TempDir, ExportOptions) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("changelog");

        // Directory name order disagrees with release date order on purpose.
        let newer = make_release(&root, "2.0.0", (2021, 1, 1));
        write_entry(&newer, "b.xml", "fixed", "Fixed second");
        write_entry(&newer, "a.xml", "added", "Added first");
        std::fs::write(
            newer.join("intro.adoc"),
            "////\nInternal notes\n////\nThis release is great.\n",
        )
        .unwrap();

        let maintenance = make_release(&root, "1.9.0", (2022, 1, 1));
        write_entry(&maintenance, "c.xml", "changed", "Changed something");

        let upcoming = layout::unreleased_directory(&root, 3);
        std::fs::create_dir_all(&upcoming).unwrap();
        write_entry(&upcoming, "d.xml", "removed", "Removed old API");
        std::fs::write(upcoming.join(".release-notes.adoc.ftl"), "template").unwrap();

        std::fs::create_dir_all(layout::unreleased_directory(&root, 2)).unwrap();

        let options = ExportOptions::new(root, temp.path().join("site").join("changelog"));
        (temp, options)
    }

    #[test]
    fn test_export_writes_every_release_and_index() {
        let (_temp, options) = fixture();
        let output = options.output_directory.clone();
        let report = ChangelogExporter::new(options).export().unwrap();

        assert_eq!(report.release_directories.len(), 2);
        assert!(report.release_directories[0].ends_with("2.0.0"));
        assert!(report.release_directories[1].ends_with("1.9.0"));
        assert_eq!(report.upcoming_directories.len(), 2);
        assert!(report.upcoming_directories[0].ends_with(".3.x.x"));
        assert!(report.upcoming_directories[1].ends_with(".2.x.x"));
        assert_eq!(report.index_file(), Some(output.join("index.adoc").as_path()));

        for name in ["2.0.0.adoc", "1.9.0.adoc", "3.x.x.adoc", "2.x.x.adoc", "index.adoc"] {
            assert!(output.join(name).is_file(), "missing {}", name);
        }
    }

    #[test]
    fn test_release_document_content() {
        let (_temp, options) = fixture();
        let output = options.output_directory.clone();
        ChangelogExporter::new(options).export().unwrap();

        let document = std::fs::read_to_string(output.join("2.0.0.adoc")).unwrap();
        assert!(document.contains("= 2.0.0 (2021-01-01)\nThis release is great.\n\n== Changes\n"));
        assert!(!document.contains("Internal notes"));
        assert!(document.contains(
            "=== Added\n\n* Added first (for https://example.org/a.xml[a.xml] by Jane Doe)\n"
        ));
        let added = document.find("=== Added").unwrap();
        let fixed = document.find("=== Fixed").unwrap();
        assert!(added < fixed);

        let upcoming = std::fs::read_to_string(output.join("3.x.x.adoc")).unwrap();
        assert!(upcoming.contains("= 3.x.x\n\nChanges staged for the next version"));
        assert!(upcoming.contains("* Removed old API"));

        let empty_upcoming = std::fs::read_to_string(output.join("2.x.x.adoc")).unwrap();
        assert!(!empty_upcoming.contains("== Changes"));
    }

    #[test]
    fn test_index_order() {
        let (_temp, options) = fixture();
        let output = options.output_directory.clone();
        ChangelogExporter::new(options).export().unwrap();

        let index = std::fs::read_to_string(output.join("index.adoc")).unwrap();
        let bullets: Vec<&str> = index.lines().filter(|l| l.starts_with("* ")).collect();
        assert_eq!(
            bullets,
            vec![
                "* xref:2.x.x.adoc[2.x.x]",
                "* xref:3.x.x.adoc[3.x.x]",
                "* xref:1.9.0.adoc[1.9.0] (2022-01-01)",
                "* xref:2.0.0.adoc[2.0.0] (2021-01-01)",
            ]
        );
    }

    #[test]
    fn test_license_header_prefixes_documents() {
        let (_temp, options) = fixture();
        let output = options.output_directory.clone();
        let options = options.with_license_header("////\nLicensed under test terms.\n////\n");
        ChangelogExporter::new(options).export().unwrap();

        for name in ["2.0.0.adoc", "index.adoc"] {
            let document = std::fs::read_to_string(output.join(name)).unwrap();
            assert!(document.starts_with("////\nLicensed under test terms.\n////\n\n////\n*DO NOT EDIT"));
        }
    }

    #[test]
    fn test_unsupported_format_aborts_export() {
        let (_temp, options) = fixture();
        let release = options.changelog_directory.join("2.0.0");
        std::fs::write(
            release.join("z.xml"),
            r#"<entry type="fixed"><description format="markdown">**x**</description></entry>"#,
        )
        .unwrap();
        let output = options.output_directory.clone();

        let err = ChangelogExporter::new(options).export().unwrap_err();
        match &err {
            StagelogError::Changelog(ChangelogError::ExportFailed { directory, source }) => {
                assert!(directory.ends_with("2.0.0"));
                assert!(matches!(
                    **source,
                    StagelogError::Changelog(ChangelogError::UnsupportedFormat(_))
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!output.join("index.adoc").exists());
    }

    #[test]
    fn test_release_without_metadata_fails() {
        let (_temp, options) = fixture();
        std::fs::create_dir_all(options.changelog_directory.join("2.1.0")).unwrap();

        let err = ChangelogExporter::new(options).export().unwrap_err();
        assert!(matches!(
            err,
            StagelogError::Changelog(ChangelogError::MissingReleaseMetadata(_))
        ));
    }

    #[test]
    fn test_undated_release_metadata_fails() {
        let (_temp, options) = fixture();
        let undated = options.changelog_directory.join("2.1.0");
        std::fs::create_dir_all(&undated).unwrap();
        std::fs::write(layout::release_xml_file(&undated), r#"<release version="2.1.0"/>"#).unwrap();
        let output = options.output_directory.clone();

        let err = ChangelogExporter::new(options).export().unwrap_err();
        assert!(matches!(
            err,
            StagelogError::Changelog(ChangelogError::Parse { .. })
        ));
        assert!(!output.join("2.1.0.adoc").exists());
    }

    #[test]
    fn test_malformed_entry_names_directory() {
        let (_temp, options) = fixture();
        std::fs::write(
            options.changelog_directory.join(".3.x.x").join("broken.xml"),
            "<entry",
        )
        .unwrap();

        let err = ChangelogExporter::new(options).export().unwrap_err();
        assert!(err.to_string().contains(".3.x.x"));
    }

    #[test]
    fn test_export_of_empty_changelog() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("changelog");
        std::fs::create_dir_all(&root).unwrap();
        let output = temp.path().join("out");

        let report = ChangelogExporter::new(ExportOptions::new(&root, &output))
            .export()
            .unwrap();
        assert!(report.release_directories.is_empty());
        assert_eq!(report.written_files, vec![output.join("index.adoc")]);
    }
}
