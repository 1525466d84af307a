//! `incipit completions` - shell completion generation.

use clap::CommandFactory;
use clap_complete::{Shell as CompleteShell, generate};

use crate::cli::{Cli, CompletionsArgs, Shell};
use crate::error::CliError;

pub fn execute(args: &CompletionsArgs) -> Result<(), CliError> {
    let shell = match args.shell {
        Shell::Bash => CompleteShell::Bash,
        Shell::Zsh => CompleteShell::Zsh,
        Shell::Fish => CompleteShell::Fish,
        Shell::PowerShell => CompleteShell::PowerShell,
        Shell::Elvish => CompleteShell::Elvish,
    };
    let mut command = Cli::command();
    generate(shell, &mut command, "incipit", &mut std::io::stdout());
    Ok(())
}
