//! CLI command definitions and execution
//!
//! `browse` is the interactive navigator; the remaining commands manage the
//! configuration it reads.

use clap::{Parser, Subcommand};

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

pub mod browse;
mod completions;
mod init;
mod profile;

/// bnav - interactive bucket navigator
///
/// Browse S3-compatible buckets folder by folder: download, upload,
/// create folders and delete from a single menu.
#[derive(Parser, Debug)]
#[command(name = "bnav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress indicators
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse a bucket interactively
    Browse(browse::BrowseArgs),

    /// Manage storage profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// Create the configuration directory and an example config
    Init(init::InitArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Browse(args) => browse::execute(args, output_config).await,
        Commands::Profile(cmd) => profile::execute(cmd, output_config).await,
        Commands::Init(args) => init::execute(args, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_browse_with_options() {
        let cli = Cli::try_parse_from([
            "bnav", "browse", "prod", "--bucket", "media", "--prefix", "a/b", "--max-items", "10",
        ])
        .unwrap();
        match cli.command {
            Commands::Browse(args) => {
                assert_eq!(args.profile.as_deref(), Some("prod"));
                assert_eq!(args.bucket.as_deref(), Some("media"));
                assert_eq!(args.prefix.as_deref(), Some("a/b"));
                assert_eq!(args.max_items, Some(10));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_max_items_must_be_positive() {
        assert!(Cli::try_parse_from(["bnav", "browse", "--max-items", "0"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["bnav", "profile", "list", "--json", "--debug"]).unwrap();
        assert!(cli.json);
        assert!(cli.debug);
    }
}
