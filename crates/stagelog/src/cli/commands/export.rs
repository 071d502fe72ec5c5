//! Export command

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use stagelog_changelog::{ChangelogExporter, ExportOptions, ExportReport};

use crate::cli::output::{self, path_style};
use crate::cli::{resolve_directory, Cli, OutputFormat};

/// Export release notes and the release index as AsciiDoc
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Changelog root directory
    #[arg(long, value_name = "DIR")]
    pub changelog_directory: Option<PathBuf>,

    /// Directory the AsciiDoc files are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_directory: Option<PathBuf>,
}

impl ExportCommand {
    /// Execute the export command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        let options = self.options(cli, &cwd)?;
        info!(
            changelog_directory = %options.changelog_directory.display(),
            output_directory = %options.output_directory.display(),
            "executing export command"
        );

        let report = ChangelogExporter::new(options).export()?;

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text if !cli.quiet => print_summary(&report),
            OutputFormat::Text => {}
        }
        Ok(())
    }

    fn options(&self, cli: &Cli, cwd: &Path) -> anyhow::Result<ExportOptions> {
        let config = cli.load_config(cwd)?;
        let changelog_directory = resolve_directory(
            cwd,
            self.changelog_directory.as_deref(),
            &config.changelog.directory,
        );
        let output_directory = resolve_directory(
            cwd,
            self.output_directory.as_deref(),
            &config.export.output_directory,
        );
        Ok(ExportOptions::new(changelog_directory, output_directory)
            .with_license_header(config.export.effective_license_header()))
    }
}

/// One-line description of the exported release directories, `None` when there are none
fn release_summary(release_directories: &[PathBuf]) -> Option<String> {
    match release_directories {
        [] => None,
        [single] => Some(format!(
            "exported a single release directory: `{}`",
            single.display()
        )),
        [.., last] => Some(format!(
            "exported {} release directories: ..., `{}`",
            release_directories.len(),
            last.display()
        )),
    }
}

fn print_summary(report: &ExportReport) {
    if let Some(summary) = release_summary(&report.release_directories) {
        output::success(&summary);
    }
    for directory in &report.upcoming_directories {
        output::success(&format!(
            "exported upcoming release directory: {}",
            path_style().apply_to(directory.display())
        ));
    }
    if let Some(index_file) = report.index_file() {
        output::info(&format!(
            "wrote release index to {}",
            path_style().apply_to(index_file.display())
        ));
    }
}
