//! Command-line interface for menuboard.
//!
//! This module provides the CLI structure for the `menuboard` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    ConfigCommand, HistoryCommand, MenuCommand, OrderCommand, ShellCommand, StatusCommand,
};

/// menuboard - Browse the menu, place orders and review them later
///
/// Orders are kept in a local database and survive restarts. Menu edits
/// last for the running session only.
#[derive(Debug, Parser)]
#[command(name = "menuboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Keep orders in memory only, for this run
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive session with the Dashboard and Order History tabs
    Shell(ShellCommand),

    /// Show the menu
    Menu(MenuCommand),

    /// Place a single order
    Order(OrderCommand),

    /// Show all placed orders
    History(HistoryCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            ephemeral: false,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "menuboard");
    }

    #[test]
    fn test_verbosity_quiet() {
        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_normal() {
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_verbose() {
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
    }

    #[test]
    fn test_verbosity_trace() {
        assert_eq!(cli_with(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_shell() {
        let cli = Cli::try_parse_from(["menuboard", "shell"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Shell(ShellCommand {
                format: OutputFormat::Plain
            })
        ));
    }

    #[test]
    fn test_parse_menu_search() {
        let cli =
            Cli::try_parse_from(["menuboard", "menu", "--search", "maggie", "-f", "table"]).unwrap();
        match cli.command {
            Command::Menu(cmd) => {
                assert_eq!(cmd.search.as_deref(), Some("maggie"));
                assert_eq!(cmd.format, OutputFormat::Table);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_order() {
        let cli = Cli::try_parse_from(["menuboard", "order", "Pav Bhaji", "-n", "3"]).unwrap();
        match cli.command {
            Command::Order(cmd) => {
                assert_eq!(cmd.item, "Pav Bhaji");
                assert_eq!(cmd.quantity, "3");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_order_default_quantity() {
        let cli = Cli::try_parse_from(["menuboard", "order", "Sundal"]).unwrap();
        match cli.command {
            Command::Order(cmd) => assert_eq!(cmd.quantity, "1"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_history_json() {
        let cli = Cli::try_parse_from(["menuboard", "history", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::History(HistoryCommand {
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["menuboard", "config", "validate", "--file", "x.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["menuboard", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["menuboard", "history", "-v", "--ephemeral"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(cli.ephemeral);
    }

    #[test]
    fn test_parse_with_quiet() {
        let args = vec!["menuboard", "-q", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_missing_subcommand_fails() {
        assert!(Cli::try_parse_from(["menuboard"]).is_err());
    }
}
