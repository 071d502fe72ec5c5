//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use stagelog_core::{load_config, load_config_or_default, Config, ConfigError, StagelogError};
use tracing::debug;

use commands::{CompletionsCommand, ExportCommand, InitCommand, ReleaseCommand};

/// stagelog - Stage changelog entries per version line and publish AsciiDoc release notes
#[derive(Debug, Parser)]
#[command(name = "stagelog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file, instead of searching the working directory and its parents
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a starter configuration and changelog directory
    Init(InitCommand),

    /// Export release notes and the release index as AsciiDoc
    Export(ExportCommand),

    /// Move the staged entries of a version line into a release directory
    Release(ReleaseCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Export(ref cmd) => cmd.execute(&self),
            Commands::Release(ref cmd) => cmd.execute(&self),
            Commands::Completions(ref cmd) => cmd.execute(&self),
        }
    }

    /// Load the configuration named by `--config`, or the one found from `cwd` upwards.
    ///
    /// Falls back to defaults when no file is found by searching.
    pub fn load_config(&self, cwd: &Path) -> anyhow::Result<Config> {
        let config = match &self.config {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(StagelogError::from(ConfigError::NotFound(path)).into());
                }
                load_config(&path)?
            }
            None => load_config_or_default(cwd)?.0,
        };
        debug!(?config, "using configuration");
        Ok(config)
    }
}

/// Resolve a directory from a flag, falling back to the configured value, against `cwd`
pub fn resolve_directory(cwd: &Path, flag: Option<&Path>, configured: &Path) -> PathBuf {
    cwd.join(flag.unwrap_or(configured))
}
