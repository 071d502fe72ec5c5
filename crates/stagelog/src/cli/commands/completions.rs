//! Shell completions for the stagelog command set

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::cli::output::{self, path_style};
use crate::cli::Cli;

const BIN_NAME: &str = "stagelog";

/// Generate shell completions
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output to file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl CompletionsCommand {
    /// Execute the completions command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(shell = %self.shell, "executing completions command");

        let Some(output_path) = &self.output else {
            return write_completions(self.shell, &mut std::io::stdout().lock());
        };

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(output_path)?;
        write_completions(self.shell, &mut file)?;

        if !cli.quiet {
            output::success(&format!(
                "Wrote {} completions to {}",
                self.shell,
                path_style().apply_to(output_path.display())
            ));
        }
        Ok(())
    }
}

/// Render the completion script of the whole `stagelog` command tree
fn write_completions(shell: Shell, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
    out.flush()?;
    Ok(())
}
