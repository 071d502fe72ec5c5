//! Release command

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;
use tracing::info;

use stagelog_changelog::{release_version_major, ChangelogReleaser, ReleaseOptions};

use crate::cli::output::{self, path_style, version_style};
use crate::cli::{resolve_directory, Cli, OutputFormat};

/// Move the staged entries of a version line into a release directory
#[derive(Debug, Args)]
pub struct ReleaseCommand {
    /// Version being released, e.g. 2.20.0
    #[arg(value_name = "VERSION")]
    pub release_version: String,

    /// Release date as YYYY-MM-DD (defaults to today)
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Changelog root directory
    #[arg(long, value_name = "DIR")]
    pub changelog_directory: Option<PathBuf>,
}

impl ReleaseCommand {
    /// Execute the release command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        release_version_major(&self.release_version)?;
        let cwd = std::env::current_dir()?;
        let options = self.options(cli, &cwd)?;
        info!(
            version = %options.version,
            changelog_directory = %options.changelog_directory.display(),
            "executing release command"
        );

        let report = ChangelogReleaser::new(options).release()?;

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text if !cli.quiet => {
                output::info(&format!("using `{}` for the release date", report.date));
                for step in &report.steps {
                    output::info(&step.to_string());
                }
                output::success(&format!(
                    "Released {} into {}",
                    version_style().apply_to(&report.version),
                    path_style().apply_to(report.release_directory.display())
                ));
            }
            OutputFormat::Text => {}
        }
        Ok(())
    }

    fn options(&self, cli: &Cli, cwd: &Path) -> anyhow::Result<ReleaseOptions> {
        let config = cli.load_config(cwd)?;
        let changelog_directory = resolve_directory(
            cwd,
            self.changelog_directory.as_deref(),
            &config.changelog.directory,
        );
        let options = ReleaseOptions::new(changelog_directory, self.release_version.as_str());
        Ok(match self.date {
            Some(date) => options.with_date(date),
            None => options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_options_default_directory() {
        let temp = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["stagelog", "release", "2.20.0"]).unwrap();
        let crate::cli::Commands::Release(ref cmd) = cli.command else {
            panic!("expected release command");
        };
        let options = cmd.options(&cli, temp.path()).unwrap();
        assert_eq!(options.changelog_directory, temp.path().join("src/changelog"));
        assert_eq!(options.version, "2.20.0");
        assert!(options.date.is_none());
    }

    #[test]
    fn test_options_with_date() {
        let temp = TempDir::new().unwrap();
        let cli = Cli::try_parse_from([
            "stagelog",
            "release",
            "2.20.0",
            "--date",
            "2023-02-17",
        ])
        .unwrap();
        let crate::cli::Commands::Release(ref cmd) = cli.command else {
            panic!("expected release command");
        };
        let options = cmd.options(&cli, temp.path()).unwrap();
        assert_eq!(options.date, NaiveDate::from_ymd_opt(2023, 2, 17));
    }
}
