//! Init command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use stagelog_changelog::layout::unreleased_directory;
use stagelog_core::config::defaults::{DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML};
use stagelog_core::Config;

use crate::cli::output::{self, path_style};
use crate::cli::{resolve_directory, Cli};

/// Write a starter configuration and changelog directory
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Output file path (a `.yaml`/`.yml` extension writes YAML)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also create the unreleased directory of this major version line
    #[arg(long, value_name = "MAJOR")]
    pub version_major: Option<u64>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, "executing init command");
        let cwd = std::env::current_dir()?;
        let config_path = cwd.join(
            self.output
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_TOML)),
        );

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration file already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        let content = render_config(&config_path)?;
        std::fs::write(&config_path, &content)?;

        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE)?;
        let changelog_directory = resolve_directory(&cwd, None, &config.changelog.directory);
        let created_directory = match self.version_major {
            Some(version_major) => unreleased_directory(&changelog_directory, version_major),
            None => changelog_directory,
        };
        std::fs::create_dir_all(&created_directory)?;

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                path_style().apply_to(config_path.display())
            ));
            output::success(&format!(
                "Created {}",
                path_style().apply_to(created_directory.display())
            ));
        }
        Ok(())
    }
}

fn render_config(config_path: &std::path::Path) -> anyhow::Result<String> {
    let yaml = config_path
        .extension()
        .is_some_and(|e| e == "yaml" || e == "yml");
    if !yaml {
        return Ok(DEFAULT_CONFIG_TEMPLATE.to_string());
    }
    let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE)?;
    Ok(serde_yaml::to_string(&config)?)
}
