//! # CLI Completions Command
//!
//! Shell completions generation for the Rukun CLI.

use clap::Command;
use clap_complete::Shell;
use error::Result;

/// Generates shell completions for the CLI
pub fn completions(shell: Shell, cmd: &mut Command) -> Result<()> {
    clap_complete::generate(shell, cmd, "rukun", &mut std::io::stdout());
    Ok(())
}
