//! Command-line interface for fleetdash.
//!
//! This module provides the CLI structure, the interactive session shell and
//! the text renderers for the `fleetdash` binary.

mod commands;
pub mod render;
pub mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddArgs, AgeArgs, AircraftTypeArg, BreakdownArg, BreakdownArgs, ConfigCommand, ExportArgs,
    LeaseTypeArg, ListArgs, RemoveArgs, RemoveOldestArgs, StatsArgs, SummaryArgs,
};
pub use shell::{Flow, Shell, ShellCommand};

/// fleetdash - Fleet scenario planning
///
/// Explore how adding and retiring aircraft changes the average age and
/// composition of the fleet.
#[derive(Debug, Parser)]
#[command(name = "fleetdash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the baseline fleet table
    List(ListArgs),

    /// Show the average-age projection
    Age(AgeArgs),

    /// Show the fleet breakdown on a date
    Breakdown(BreakdownArgs),

    /// Show fleet statistics
    Stats(StatsArgs),

    /// Export the baseline fleet as CSV
    Export(ExportArgs),

    /// Start an interactive scenario session
    Session,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Command {
    /// The session command a one-shot report maps onto, if any.
    #[must_use]
    pub fn into_report(self) -> Option<ShellCommand> {
        match self {
            Self::List(args) => Some(ShellCommand::List(args)),
            Self::Age(args) => Some(ShellCommand::Age(args)),
            Self::Breakdown(args) => Some(ShellCommand::Breakdown(args)),
            Self::Stats(args) => Some(ShellCommand::Stats(args)),
            Self::Export(args) => Some(ShellCommand::Export(args)),
            Self::Session | Self::Config(_) => None,
        }
    }
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
