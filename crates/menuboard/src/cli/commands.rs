//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::format::OutputFormat;

/// Interactive session arguments.
#[derive(Debug, Args)]
pub struct ShellCommand {
    /// Output format for menus and history
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Menu command arguments.
#[derive(Debug, Args)]
pub struct MenuCommand {
    /// Only show items whose name contains this text (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Order command arguments.
#[derive(Debug, Args)]
pub struct OrderCommand {
    /// Name of the menu item to order
    pub item: String,

    /// How many to order
    #[arg(short = 'n', long, default_value = "1")]
    pub quantity: String,
}

/// History command arguments.
#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
