//! CLI commands

mod completions;
mod export;
mod init;
mod release;

pub use completions::CompletionsCommand;
pub use export::ExportCommand;
pub use init::InitCommand;
pub use release::ReleaseCommand;
