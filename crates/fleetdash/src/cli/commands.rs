//! CLI command definitions.
//!
//! This module defines the arguments shared by the one-shot subcommands and
//! the interactive session.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::analytics::BreakdownField;
use crate::record::{AircraftType, LeaseType, NewAircraft};

/// Arguments for adding an aircraft.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Registration (tail number)
    pub registration: String,

    /// Aircraft type
    #[arg(short = 't', long = "type", value_enum, ignore_case = true)]
    pub aircraft_type: AircraftTypeArg,

    /// Aircraft sub-variant
    #[arg(long, default_value = "")]
    pub variant: String,

    /// Date of manufacture (YYYY-MM-DD)
    #[arg(short, long, value_name = "DATE")]
    pub manufactured: NaiveDate,

    /// Date of entry into the fleet (YYYY-MM-DD)
    #[arg(short, long, value_name = "DATE")]
    pub entered: NaiveDate,

    /// Lease type
    #[arg(short, long, value_enum, ignore_case = true)]
    pub lease: LeaseTypeArg,

    /// Lease end date (required for operating leases)
    #[arg(long, value_name = "DATE", required_if_eq("lease", "OPS"))]
    pub lease_end: Option<NaiveDate>,

    /// Market value in USD
    #[arg(long, value_name = "USD", allow_hyphen_values = true)]
    pub market_value: f64,

    /// Monthly lease in USD (required for operating leases)
    #[arg(
        long,
        value_name = "USD",
        allow_hyphen_values = true,
        required_if_eq("lease", "OPS")
    )]
    pub monthly_lease: Option<f64>,
}

impl AddArgs {
    /// Build the candidate aircraft these arguments describe.
    #[must_use]
    pub fn into_candidate(self) -> NewAircraft {
        NewAircraft {
            registration: self.registration,
            aircraft_type: self.aircraft_type.into(),
            aircraft_variant: self.variant,
            date_of_manufacture: self.manufactured,
            date_of_entry: self.entered,
            lease_type: self.lease.into(),
            lease_end_date: self.lease_end,
            market_value: self.market_value,
            monthly_lease: self.monthly_lease,
        }
    }
}

/// Arguments for removing the oldest aircraft.
#[derive(Debug, Args)]
pub struct RemoveOldestArgs {
    /// Number of oldest aircraft to remove
    pub count: usize,

    /// Exit date (defaults to today)
    #[arg(short = 'd', long = "date", value_name = "DATE")]
    pub exit_date: Option<NaiveDate>,
}

/// Arguments for removing aircraft by registration.
#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Registrations to remove
    #[arg(required = true, num_args = 1..)]
    pub registrations: Vec<String>,

    /// Exit date (defaults to today)
    #[arg(short = 'd', long = "date", value_name = "DATE")]
    pub exit_date: Option<NaiveDate>,
}

/// Arguments for the fleet table.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show aircraft active on this date
    #[arg(short, long, value_name = "DATE")]
    pub active_on: Option<NaiveDate>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Arguments for the average-age projection.
#[derive(Debug, Args)]
pub struct AgeArgs {
    /// First projected year (defaults to the configured start year)
    #[arg(short, long)]
    pub start_year: Option<i32>,

    /// Number of projected years (defaults to the configured count)
    #[arg(short, long)]
    pub years: Option<u32>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Arguments for the fleet breakdown.
#[derive(Debug, Args)]
pub struct BreakdownArgs {
    /// Breakdown date (defaults to today)
    #[arg(short, long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// What to group by
    #[arg(short, long, value_enum, default_value = "all")]
    pub by: BreakdownArg,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Arguments for the change summary.
#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Day to summarize (defaults to today)
    #[arg(short, long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Arguments for fleet statistics.
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Arguments for the CSV export.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output file (defaults to the configured export path)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the CSV to stdout instead of a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
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

/// Aircraft type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AircraftTypeArg {
    /// Boeing 737-800NG
    #[value(name = "B737-800NG")]
    B737Ng,
    /// Boeing 737-8
    #[value(name = "B737-8")]
    B737Max8,
    /// Boeing 737-10
    #[value(name = "B737-10")]
    B737Max10,
    /// Airbus A320neo
    #[value(name = "A320neo")]
    A320Neo,
    /// Airbus A321neo
    #[value(name = "A321neo")]
    A321Neo,
    /// Any other type
    #[value(name = "Others")]
    Others,
}

impl From<AircraftTypeArg> for AircraftType {
    fn from(arg: AircraftTypeArg) -> Self {
        match arg {
            AircraftTypeArg::B737Ng => Self::B737Ng,
            AircraftTypeArg::B737Max8 => Self::B737Max8,
            AircraftTypeArg::B737Max10 => Self::B737Max10,
            AircraftTypeArg::A320Neo => Self::A320Neo,
            AircraftTypeArg::A321Neo => Self::A321Neo,
            AircraftTypeArg::Others => Self::Others,
        }
    }
}

/// Lease type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LeaseTypeArg {
    /// Owned outright
    #[value(name = "OWN")]
    Own,
    /// Finance lease
    #[value(name = "FIN")]
    Fin,
    /// Operating lease
    #[value(name = "OPS")]
    Ops,
}

impl From<LeaseTypeArg> for LeaseType {
    fn from(arg: LeaseTypeArg) -> Self {
        match arg {
            LeaseTypeArg::Own => Self::Own,
            LeaseTypeArg::Fin => Self::Fin,
            LeaseTypeArg::Ops => Self::Ops,
        }
    }
}

/// Breakdown grouping argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BreakdownArg {
    /// Aircraft type only
    Type,
    /// Lease type only
    Lease,
    /// Both aircraft type and lease type
    #[default]
    All,
}

impl BreakdownArg {
    /// The fields this grouping covers, in display order.
    #[must_use]
    pub fn fields(self) -> Vec<BreakdownField> {
        match self {
            Self::Type => vec![BreakdownField::AircraftType],
            Self::Lease => vec![BreakdownField::LeaseType],
            Self::All => vec![BreakdownField::AircraftType, BreakdownField::LeaseType],
        }
    }
}
