//! Shell completions generation command.
//!
//! ```bash
//! mkbench completions bash > ~/.local/share/bash-completion/completions/mkbench
//! mkbench completions zsh -o ~/.zsh/completions/_mkbench
//! ```

use crate::cli::{Cli, CompletionsArgs, ShellType};
use crate::error::{Result, ResultExt};
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::fs::File;
use std::io;
use tracing::info;

const BIN_NAME: &str = "mkbench";

/// Execute the completions command.
///
/// # Errors
///
/// Returns an error if the output file cannot be created.
pub fn execute(args: &CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let shell = convert_shell_type(args.shell);

    match &args.output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            generate(shell, &mut cmd, BIN_NAME, &mut file);
            info!(shell = ?shell, path = %path.display(), "Wrote completion script");
        }
        None => generate(shell, &mut cmd, BIN_NAME, &mut io::stdout()),
    }
    Ok(())
}

const fn convert_shell_type(shell: ShellType) -> Shell {
    match shell {
        ShellType::Bash => Shell::Bash,
        ShellType::Zsh => Shell::Zsh,
        ShellType::Fish => Shell::Fish,
        ShellType::PowerShell => Shell::PowerShell,
        ShellType::Elvish => Shell::Elvish,
    }
}
