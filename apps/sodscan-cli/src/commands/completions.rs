//! Generate shell completions for the sodscan CLI
//!
//! ```bash
//! eval "$(sodscan completions bash)"
//! sodscan completions zsh > ~/.zsh/completions/_sodscan
//! sodscan completions fish > ~/.config/fish/completions/sodscan.fish
//! ```

use clap::{Args, CommandFactory, ValueEnum};
use clap_complete::{generate, Shell as ClapShell};
use std::io::{self, Write};

/// Supported shell types for completion generation
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    fn to_clap_shell(self) -> ClapShell {
        match self {
            Shell::Bash => ClapShell::Bash,
            Shell::Zsh => ClapShell::Zsh,
            Shell::Fish => ClapShell::Fish,
        }
    }
}

/// Print a completion script for the given shell
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the completions command
pub fn execute(args: CompletionsArgs) -> crate::error::CliResult<()> {
    write_completions(args.shell, &mut io::stdout());
    Ok(())
}

fn write_completions<W: Write>(shell: Shell, out: &mut W) {
    let mut cmd = crate::Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell.to_clap_shell(), &mut cmd, bin_name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut output = Vec::new();
        write_completions(shell, &mut output);
        String::from_utf8(output).expect("valid UTF-8")
    }

    #[test]
    fn test_shell_enum_from_str() {
        assert!(matches!(Shell::from_str("bash", true), Ok(Shell::Bash)));
        assert!(matches!(Shell::from_str("ZSH", true), Ok(Shell::Zsh)));
        assert!(Shell::from_str("powershell", true).is_err());
    }

    #[test]
    fn test_completion_generation_bash() {
        let script = script(Shell::Bash);
        assert!(script.contains("sodscan"));
        assert!(script.contains("complete"));
    }

    #[test]
    fn test_completion_generation_zsh() {
        assert!(script(Shell::Zsh).contains("#compdef sodscan"));
    }

    #[test]
    fn test_completion_generation_fish() {
        assert!(script(Shell::Fish).contains("complete -c sodscan"));
    }

    #[test]
    fn test_completions_include_all_commands() {
        let script = script(Shell::Bash);
        for name in ["analyze", "check", "completions", "--rules", "--missing-marker"] {
            assert!(script.contains(name), "missing '{name}' in completions");
        }
    }
}
