//! Core fleet record types for fleetdash.
//!
//! This module defines the data structures for a single aircraft in the
//! fleet, its ownership structure, and its lifecycle within the fleet.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Error, Result};

/// Average number of days in a year, used for fractional ages.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Stable identity of a row in the fleet store.
///
/// Identities are assigned on insert and never reused within a session, so
/// they stay valid across sorting, filtering and resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A string that does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseVariantError {
    kind: &'static str,
    value: String,
}

/// Aircraft type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AircraftType {
    /// Boeing 737-800 Next Generation.
    #[serde(rename = "B737-800NG")]
    B737Ng,
    /// Boeing 737 MAX 8.
    #[serde(rename = "B737-8")]
    B737Max8,
    /// Boeing 737 MAX 10.
    #[serde(rename = "B737-10")]
    B737Max10,
    /// Airbus A320neo.
    #[serde(rename = "A320neo")]
    A320Neo,
    /// Airbus A321neo.
    #[serde(rename = "A321neo")]
    A321Neo,
    /// Anything else.
    #[serde(rename = "Others")]
    Others,
}

impl AircraftType {
    /// Every aircraft type, in display order.
    pub const ALL: [Self; 6] = [
        Self::B737Ng,
        Self::B737Max8,
        Self::B737Max10,
        Self::A320Neo,
        Self::A321Neo,
        Self::Others,
    ];

    /// The label used in reports and exports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::B737Ng => "B737-800NG",
            Self::B737Max8 => "B737-8",
            Self::B737Max10 => "B737-10",
            Self::A320Neo => "A320neo",
            Self::A321Neo => "A321neo",
            Self::Others => "Others",
        }
    }
}

impl fmt::Display for AircraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AircraftType {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseVariantError {
                kind: "aircraft type",
                value: s.to_string(),
            })
    }
}

/// Ownership structure of an aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeaseType {
    /// Owned outright.
    Own,
    /// Finance lease.
    Fin,
    /// Operating lease; the only type with a lease end date and monthly rent.
    Ops,
}

impl LeaseType {
    /// Every lease type, in display order.
    pub const ALL: [Self; 3] = [Self::Own, Self::Fin, Self::Ops];

    /// The label used in reports and exports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Own => "OWN",
            Self::Fin => "FIN",
            Self::Ops => "OPS",
        }
    }
}

impl fmt::Display for LeaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LeaseType {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseVariantError {
                kind: "lease type",
                value: s.to_string(),
            })
    }
}

/// Where a record stands in the fleet.
///
/// `Active -> Exited` is the only transition and it is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "date", rename_all = "snake_case")]
pub enum Lifecycle {
    /// Still in the fleet.
    #[default]
    Active,
    /// Left the fleet on the given date.
    Exited(NaiveDate),
}

impl Lifecycle {
    /// Whether the record has not left the fleet.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// The exit date, if the record has left the fleet.
    #[must_use]
    pub fn exit_date(self) -> Option<NaiveDate> {
        match self {
            Self::Active => None,
            Self::Exited(date) => Some(date),
        }
    }
}

/// One aircraft in the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetRecord {
    /// Identity assigned by the store; `None` until inserted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Tail number.
    pub registration: String,
    /// Aircraft type.
    pub aircraft_type: AircraftType,
    /// Sub-variant, may be empty.
    pub aircraft_variant: String,
    /// Build date. Always present for added aircraft, may be missing in seed data.
    pub date_of_manufacture: Option<NaiveDate>,
    /// Date the aircraft joined this fleet.
    pub date_of_entry: Option<NaiveDate>,
    /// Whether and when the aircraft left the fleet.
    pub lifecycle: Lifecycle,
    /// Ownership structure.
    pub lease_type: LeaseType,
    /// End of the operating lease.
    pub lease_end_date: Option<NaiveDate>,
    /// Book/market value in USD.
    pub market_value: f64,
    /// Monthly operating lease rent in USD.
    pub monthly_lease: Option<f64>,
}

impl FleetRecord {
    /// Whether the record has not left the fleet (regardless of dates).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    /// Whether the aircraft was part of the fleet on `date`.
    ///
    /// True when it entered on or before `date` and had not exited by then.
    /// Records without a date of entry are never active.
    #[must_use]
    pub fn is_active_as_of(&self, date: NaiveDate) -> bool {
        let entered = self.date_of_entry.is_some_and(|doi| doi <= date);
        let not_exited = self.lifecycle.exit_date().map_or(true, |doe| doe > date);
        entered && not_exited
    }

    /// Age in whole days on `date`, if the manufacture date is known.
    #[must_use]
    pub fn age_in_days(&self, date: NaiveDate) -> Option<i64> {
        self.date_of_manufacture
            .map(|dom| (date - dom).num_days())
    }

    /// Fractional age in years on `date`, if the manufacture date is known.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn age_in_years(&self, date: NaiveDate) -> Option<f64> {
        self.age_in_days(date)
            .map(|days| days as f64 / DAYS_PER_YEAR)
    }
}

/// A candidate aircraft for the Add operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAircraft {
    /// Tail number.
    pub registration: String,
    /// Aircraft type.
    pub aircraft_type: AircraftType,
    /// Sub-variant, empty by default.
    #[serde(default)]
    pub aircraft_variant: String,
    /// Build date.
    pub date_of_manufacture: NaiveDate,
    /// Date of entry into the fleet.
    pub date_of_entry: NaiveDate,
    /// Ownership structure.
    pub lease_type: LeaseType,
    /// End of the operating lease; dropped unless `lease_type` is OPS.
    #[serde(default)]
    pub lease_end_date: Option<NaiveDate>,
    /// Book/market value in USD.
    pub market_value: f64,
    /// Monthly operating lease rent; dropped unless `lease_type` is OPS.
    #[serde(default)]
    pub monthly_lease: Option<f64>,
}

impl NewAircraft {
    /// Create a candidate with no variant and no operating lease terms.
    #[must_use]
    pub fn new(
        registration: impl Into<String>,
        aircraft_type: AircraftType,
        date_of_manufacture: NaiveDate,
        date_of_entry: NaiveDate,
        lease_type: LeaseType,
        market_value: f64,
    ) -> Self {
        Self {
            registration: registration.into(),
            aircraft_type,
            aircraft_variant: String::new(),
            date_of_manufacture,
            date_of_entry,
            lease_type,
            lease_end_date: None,
            market_value,
            monthly_lease: None,
        }
    }

    /// Set the aircraft variant.
    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.aircraft_variant = variant.into();
        self
    }

    /// Set the operating lease terms.
    #[must_use]
    pub fn with_lease_terms(mut self, end_date: NaiveDate, monthly_lease: f64) -> Self {
        self.lease_end_date = Some(end_date);
        self.monthly_lease = Some(monthly_lease);
        self
    }

    /// Check the candidate against the fleet's admission rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDateOrder`] when the entry date precedes the
    /// manufacture date, [`Error::NegativeAmount`] when a monetary field
    /// is negative or not finite, or [`Error::MissingLeaseTerm`] when an
    /// operating lease lacks its end date or monthly rent.
    pub fn validate(&self) -> Result<()> {
        if self.date_of_entry < self.date_of_manufacture {
            return Err(Error::InvalidDateOrder {
                entry: self.date_of_entry,
                manufacture: self.date_of_manufacture,
            });
        }

        check_amount("market value", self.market_value)?;
        if self.lease_type == LeaseType::Ops {
            if let Some(monthly) = self.monthly_lease {
                check_amount("monthly lease", monthly)?;
            }
            if self.lease_end_date.is_none() {
                return Err(Error::MissingLeaseTerm {
                    field: "lease end date",
                });
            }
            if self.monthly_lease.is_none() {
                return Err(Error::MissingLeaseTerm {
                    field: "monthly lease",
                });
            }
        }

        Ok(())
    }

    /// Turn the candidate into an active, not-yet-stored record.
    ///
    /// Lease end date and monthly lease are kept only for operating leases.
    #[must_use]
    pub fn into_record(self) -> FleetRecord {
        let is_ops = self.lease_type == LeaseType::Ops;
        FleetRecord {
            id: None,
            registration: self.registration,
            aircraft_type: self.aircraft_type,
            aircraft_variant: self.aircraft_variant,
            date_of_manufacture: Some(self.date_of_manufacture),
            date_of_entry: Some(self.date_of_entry),
            lifecycle: Lifecycle::Active,
            lease_type: self.lease_type,
            lease_end_date: self.lease_end_date.filter(|_| is_ops),
            market_value: self.market_value,
            monthly_lease: self.monthly_lease.filter(|_| is_ops),
        }
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::NegativeAmount { field, value })
    }
}
