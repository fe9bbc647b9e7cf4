//! Command-line interface for ftcscout.
//!
//! This module provides the CLI structure for the `ftcscout` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, AveragesCommand, ConfigCommand, DeleteCommand, EditCommand, ExportCommand,
    ListCommand, LoginCommand, OutputFormat, ShowCommand, StatusCommand,
};

/// ftcscout - Record and compare FTC robot performance
///
/// Observers log per-team match observations, and the tool computes points
/// and averages across everyone's entries.
#[derive(Debug, Parser)]
#[command(name = "ftcscout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start recording as an observer
    Login(LoginCommand),

    /// Stop recording; entries are kept
    Logout,

    /// Show the current observer
    Whoami(StatusCommand),

    /// Record a new scouting entry
    Add(AddCommand),

    /// Change one of your entries
    Edit(EditCommand),

    /// Delete one of your entries
    Delete(DeleteCommand),

    /// List scouting entries
    List(ListCommand),

    /// Show one of your entries in detail
    Show(ShowCommand),

    /// Compute averages
    #[command(subcommand)]
    Averages(AveragesCommand),

    /// Export every observer's entries as CSV
    Export(ExportCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
