//! `fleetdash` - Fleet scenario planning
//!
//! This library provides the fleet table, the scenario operations that add
//! and retire aircraft, and the age and composition reports computed over it.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analytics;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod record;
pub mod seed;
pub mod session;
pub mod storage;
pub mod summary;

pub use analytics::{AgeOverview, AgeSeries, BreakdownField, Distribution};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{AircraftType, FleetRecord, LeaseType, Lifecycle, NewAircraft, RecordId};
pub use seed::{BaselineFleet, FleetSource, StaticFleet};
pub use session::{FleetSession, RemovalOutcome};
pub use storage::{FleetStore, StoreStats};
pub use summary::ChangeSummary;
