//! Cutting a release out of the unreleased directory

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use stagelog_core::{ChangelogError, Result, VersionError};
use tracing::{debug, info, instrument, warn};

use crate::layout;
use crate::model::ChangelogRelease;

/// Options for a release
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Root holding release and unreleased directories
    pub changelog_directory: PathBuf,
    /// Version being released, e.g. `2.20.0`
    pub version: String,
    /// Release date, today when unset
    pub date: Option<NaiveDate>,
}

impl ReleaseOptions {
    /// Create options for releasing a version today
    pub fn new(changelog_directory: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            changelog_directory: changelog_directory.into(),
            version: version.into(),
            date: None,
        }
    }

    /// Set an explicit release date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// A filesystem operation performed while cutting a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ReleaseStep {
    RenamedUnreleasedDirectory { from: PathBuf, to: PathBuf },
    RecreatedUnreleasedDirectory { path: PathBuf },
    MovedEntryFile { from: PathBuf, to: PathBuf },
    MissingUnreleasedDirectory { path: PathBuf },
    WroteReleaseMetadata { path: PathBuf },
    MovedTemplateFile { from: PathBuf, to: PathBuf },
    KeptExistingTemplateFile { path: PathBuf },
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenamedUnreleasedDirectory { from, to } => write!(
                f,
                "moved changelog directory `{}` to `{}`",
                from.display(),
                to.display()
            ),
            Self::RecreatedUnreleasedDirectory { path } => {
                write!(f, "created empty unreleased directory `{}`", path.display())
            }
            Self::MovedEntryFile { from, to } => write!(
                f,
                "moved changelog entry file `{}` to `{}`",
                from.display(),
                to.display()
            ),
            Self::MissingUnreleasedDirectory { path } => write!(
                f,
                "`{}` does not exist, no changelog entry files were moved",
                path.display()
            ),
            Self::WroteReleaseMetadata { path } => {
                write!(f, "wrote release information to `{}`", path.display())
            }
            Self::MovedTemplateFile { from, to } => write!(
                f,
                "moved the changelog template file `{}` to `{}`",
                from.display(),
                to.display()
            ),
            Self::KeptExistingTemplateFile { path } => {
                write!(f, "kept the existing changelog template file `{}`", path.display())
            }
        }
    }
}

/// What a release run did
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseReport {
    pub version: String,
    pub date: NaiveDate,
    pub release_directory: PathBuf,
    /// Whether the release directory existed before this run
    pub release_directory_existed: bool,
    pub steps: Vec<ReleaseStep>,
}

/// Major version line of a release version.
///
/// The version has to be a full `MAJOR.MINOR.PATCH` semantic version.
pub fn release_version_major(version: &str) -> Result<u64> {
    let parsed = semver::Version::parse(version.trim())
        .map_err(|e| VersionError::ParseFailed(version.to_string(), e.to_string()))?;
    Ok(parsed.major)
}

/// Moves staged entries into a release directory and stamps it
pub struct ChangelogReleaser {
    options: ReleaseOptions,
}

impl ChangelogReleaser {
    /// Create a new releaser
    pub fn new(options: ReleaseOptions) -> Self {
        Self { options }
    }

    /// Cut the release.
    ///
    /// Entry files land before the metadata document is written, so a run
    /// interrupted halfway leaves no `.release.xml` and can be repeated.
    #[instrument(skip(self), fields(version = %self.options.version))]
    pub fn release(&self) -> Result<ReleaseReport> {
        let version = self.options.version.trim();
        let version_major = release_version_major(version)?;
        let date = self
            .options
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        info!(%date, version_major, "using release date");

        let changelog_directory = &self.options.changelog_directory;
        let unreleased_directory = layout::unreleased_directory(changelog_directory, version_major);
        let release_directory = layout::release_directory(changelog_directory, version);
        let release_directory_existed = release_directory.exists();

        let mut steps = Vec::new();
        if release_directory_existed {
            info!(
                release_directory = %release_directory.display(),
                unreleased_directory = %unreleased_directory.display(),
                "release directory exists, only moving changelog entry files"
            );
            move_entry_files(&unreleased_directory, &release_directory, &mut steps)?;
        } else {
            info!(
                release_directory = %release_directory.display(),
                unreleased_directory = %unreleased_directory.display(),
                "release directory doesn't exist, renaming the unreleased directory"
            );
            move_unreleased_directory(&unreleased_directory, &release_directory, &mut steps)?;
        }

        write_release_metadata(
            &ChangelogRelease::new(version, date),
            &release_directory,
            &mut steps,
        )?;

        move_template_files(&unreleased_directory, &release_directory, &mut steps)?;

        Ok(ReleaseReport {
            version: version.to_string(),
            date,
            release_directory,
            release_directory_existed,
            steps,
        })
    }
}

fn record(steps: &mut Vec<ReleaseStep>, step: ReleaseStep) {
    info!(step = %step, "release step");
    steps.push(step);
}

fn move_path(from: &Path, to: &Path) -> Result<()> {
    std::fs::rename(from, to).map_err(|source| {
        ChangelogError::Move {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }
        .into()
    })
}

fn move_unreleased_directory(
    unreleased_directory: &Path,
    release_directory: &Path,
    steps: &mut Vec<ReleaseStep>,
) -> Result<()> {
    if !unreleased_directory.is_dir() {
        return Err(ChangelogError::MissingUnreleasedDirectory(unreleased_directory.to_path_buf()).into());
    }

    move_path(unreleased_directory, release_directory)?;
    record(
        steps,
        ReleaseStep::RenamedUnreleasedDirectory {
            from: unreleased_directory.to_path_buf(),
            to: release_directory.to_path_buf(),
        },
    );

    std::fs::create_dir_all(unreleased_directory).map_err(|source| ChangelogError::CreateDirectory {
        path: unreleased_directory.to_path_buf(),
        source,
    })?;
    record(
        steps,
        ReleaseStep::RecreatedUnreleasedDirectory {
            path: unreleased_directory.to_path_buf(),
        },
    );
    Ok(())
}

fn move_entry_files(
    unreleased_directory: &Path,
    release_directory: &Path,
    steps: &mut Vec<ReleaseStep>,
) -> Result<()> {
    if !unreleased_directory.is_dir() {
        warn!(
            unreleased_directory = %unreleased_directory.display(),
            "no unreleased directory, nothing to move"
        );
        steps.push(ReleaseStep::MissingUnreleasedDirectory {
            path: unreleased_directory.to_path_buf(),
        });
        return Ok(());
    }

    // Every target is checked before the first move, so a clash leaves both directories as they were
    let mut moves = Vec::new();
    for entry_file in layout::entry_files(unreleased_directory)? {
        let Some(file_name) = entry_file.file_name() else {
            continue;
        };
        let target = release_directory.join(file_name);
        if target.exists() {
            return Err(ChangelogError::Move {
                from: entry_file,
                to: target,
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "target changelog entry file already exists",
                ),
            }
            .into());
        }
        moves.push((entry_file, target));
    }

    for (entry_file, target) in moves {
        move_path(&entry_file, &target)?;
        record(
            steps,
            ReleaseStep::MovedEntryFile {
                from: entry_file,
                to: target,
            },
        );
    }
    Ok(())
}

fn write_release_metadata(
    release: &ChangelogRelease,
    release_directory: &Path,
    steps: &mut Vec<ReleaseStep>,
) -> Result<()> {
    let release_xml_file = layout::release_xml_file(release_directory);
    match std::fs::remove_file(&release_xml_file) {
        Ok(()) => debug!(path = %release_xml_file.display(), "removed stale release metadata"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ChangelogError::Write {
                path: release_xml_file,
                source,
            }
            .into())
        }
    }
    release.write_to_xml_file(&release_xml_file)?;
    record(
        steps,
        ReleaseStep::WroteReleaseMetadata {
            path: release_xml_file,
        },
    );
    Ok(())
}

fn move_template_files(
    unreleased_directory: &Path,
    release_directory: &Path,
    steps: &mut Vec<ReleaseStep>,
) -> Result<()> {
    if !unreleased_directory.is_dir() {
        return Ok(());
    }

    for template_file in layout::template_files(unreleased_directory)? {
        let Some(file_name) = template_file.file_name() else {
            continue;
        };
        let target = release_directory.join(file_name);
        if target.exists() {
            record(steps, ReleaseStep::KeptExistingTemplateFile { path: target });
        } else {
            move_path(&template_file, &target)?;
            record(
                steps,
                ReleaseStep::MovedTemplateFile {
                    from: template_file,
                    to: target,
                },
            );
        }
    }
    Ok(())
}
