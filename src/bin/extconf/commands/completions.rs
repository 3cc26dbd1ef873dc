//! `extconf completions` command

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::{Cli, CompletionsArgs};

pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut stdout = io::stdout().lock();
    render(args.shell, &mut stdout)?;
    stdout.flush().context("failed to write completions")
}

/// Write the completion script for `shell`, registered under the binary name.
fn render(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin, out);
    Ok(())
}
