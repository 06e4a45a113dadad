//! Shell completion generation

use std::io::Write;

use clap::CommandFactory;
use clap_complete::{Generator, Shell};

use super::Cli;
use crate::exit_code::ExitCode;

/// Arguments for the completions command
#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Print the completion script for the requested shell
pub fn execute(args: CompletionsArgs) -> ExitCode {
    write_completions(args.shell, &mut std::io::stdout());
    ExitCode::Success
}

fn write_completions<G: Generator>(generator: G, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(generator, &mut cmd, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_completions_bash() {
        let output = script(Shell::Bash);
        assert!(output.contains("bnav"));
        assert!(output.contains("complete"));
        assert!(output.contains("browse"));
        assert!(output.contains("profile"));
    }

    #[test]
    fn test_completions_zsh() {
        let output = script(Shell::Zsh);
        assert!(output.contains("compdef"));
    }

    #[test]
    fn test_completions_fish() {
        let output = script(Shell::Fish);
        assert!(output.contains("complete -c bnav"));
    }

    #[test]
    fn test_completions_powershell() {
        let output = script(Shell::PowerShell);
        assert!(output.contains("Register-ArgumentCompleter"));
    }
}
