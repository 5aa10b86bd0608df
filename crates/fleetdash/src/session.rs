//! The fleet session: the single owner of the fleet table.
//!
//! A [`FleetSession`] is created from a [`FleetSource`], lives for the
//! duration of one interactive session, and is the only way to change the
//! fleet. Queries read a snapshot; mutations take `&mut self` and either
//! apply completely or leave the fleet unchanged.

use std::cmp::Reverse;
use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analytics::{self, AgeOverview, BreakdownField, Distribution};
use crate::error::{Error, Result};
use crate::export;
use crate::record::{FleetRecord, LeaseType, NewAircraft, RecordId};
use crate::seed::FleetSource;
use crate::storage::{FleetStore, StoreStats};
use crate::summary::{self, ChangeSummary};

/// Result of a removal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovalOutcome {
    /// Exit date applied to every removed aircraft.
    pub exit_date: NaiveDate,
    /// Registrations removed, in removal order.
    pub removed: Vec<String>,
    /// Sum of market value over removed aircraft that were owned outright.
    pub own_contribution: f64,
}

impl RemovalOutcome {
    /// Number of aircraft removed.
    #[must_use]
    pub fn count(&self) -> usize {
        self.removed.len()
    }
}

/// One session over the fleet table.
#[derive(Debug)]
pub struct FleetSession {
    store: FleetStore,
    source: Box<dyn FleetSource>,
}

impl FleetSession {
    /// Start a session seeded from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be created or the seed is rejected.
    pub fn new(source: impl FleetSource + 'static) -> Result<Self> {
        let source: Box<dyn FleetSource> = Box::new(source);
        let store = FleetStore::with_records(&source.initialize())?;
        info!("Session started from {} fleet", source.name());
        Ok(Self { store, source })
    }

    /// Read access to the underlying store.
    #[must_use]
    pub fn store(&self) -> &FleetStore {
        &self.store
    }

    /// Snapshot of every record, in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn records(&self) -> Result<Vec<FleetRecord>> {
        self.store.snapshot()
    }

    /// A fresh copy of the seed fleet, untouched by this session.
    #[must_use]
    pub fn baseline(&self) -> Vec<FleetRecord> {
        self.source.initialize()
    }

    /// Replace the fleet with a fresh copy of the seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be rewritten; the fleet is then
    /// left as it was.
    pub fn reset(&mut self) -> Result<()> {
        self.store.replace_all(&self.source.initialize())?;
        info!("Fleet reset to {} baseline", self.source.name());
        Ok(())
    }

    /// Add an aircraft to the fleet.
    ///
    /// Registrations are not required to be unique; adding one that is
    /// already active is allowed and logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDateOrder`] or [`Error::NegativeAmount`] for a
    /// rejected candidate, or a storage error. The fleet is unchanged on error.
    pub fn add_aircraft(&mut self, candidate: NewAircraft) -> Result<RecordId> {
        candidate.validate()?;

        if self
            .store
            .active()?
            .iter()
            .any(|r| r.registration == candidate.registration)
        {
            warn!(
                "Registration {} is already active; adding a duplicate",
                candidate.registration
            );
        }

        let record = candidate.into_record();
        let id = self.store.insert(&record)?;
        info!("{} added to the fleet", record.registration);
        Ok(id)
    }

    /// Remove the `count` oldest active aircraft as of `exit_date`.
    ///
    /// Age is measured from manufacture to `exit_date`. Aircraft with no
    /// manufacture date rank last; equal ages keep store order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRemovalCount`] for a zero count,
    /// [`Error::InsufficientActiveFleet`] when fewer than `count` aircraft are
    /// active, or a storage error. The fleet is unchanged on error.
    pub fn remove_oldest(&mut self, exit_date: NaiveDate, count: usize) -> Result<RemovalOutcome> {
        if count == 0 {
            return Err(Error::InvalidRemovalCount);
        }

        let mut active = self.store.active()?;
        if count > active.len() {
            return Err(Error::InsufficientActiveFleet {
                requested: count,
                active: active.len(),
            });
        }

        active.sort_by_key(|r| Reverse(r.age_in_days(exit_date)));
        active.truncate(count);

        let outcome = self.retire(&active, exit_date)?;
        info!(
            removed = outcome.count(),
            own_contribution = outcome.own_contribution,
            "Removed oldest aircraft on {}",
            exit_date
        );
        Ok(outcome)
    }

    /// Remove the active aircraft whose registration is in `registrations`.
    ///
    /// Registrations that are unknown or already exited are skipped without
    /// error, so asking for nothing removable is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a storage error; the fleet is then unchanged.
    pub fn remove_by_registration<I, S>(
        &mut self,
        exit_date: NaiveDate,
        registrations: I,
    ) -> Result<RemovalOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: HashSet<String> = registrations
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();

        let selected: Vec<FleetRecord> = self
            .store
            .active()?
            .into_iter()
            .filter(|r| wanted.contains(&r.registration))
            .collect();

        for reg in &wanted {
            if !selected.iter().any(|r| &r.registration == reg) {
                debug!("Registration {} is not active, skipping", reg);
            }
        }

        let outcome = self.retire(&selected, exit_date)?;
        info!(
            removed = outcome.count(),
            own_contribution = outcome.own_contribution,
            "Removed aircraft by registration on {}",
            exit_date
        );
        Ok(outcome)
    }

    fn retire(&mut self, records: &[FleetRecord], exit_date: NaiveDate) -> Result<RemovalOutcome> {
        let ids = records
            .iter()
            .map(|r| {
                r.id
                    .ok_or_else(|| Error::internal(format!("stored record {} has no id", r.registration)))
            })
            .collect::<Result<Vec<_>>>()?;

        self.store.mark_exited(&ids, exit_date)?;

        Ok(RemovalOutcome {
            exit_date,
            removed: records.iter().map(|r| r.registration.clone()).collect(),
            own_contribution: records
                .iter()
                .filter(|r| r.lease_type == LeaseType::Own)
                .map(|r| r.market_value)
                .sum(),
        })
    }

    /// Records that were part of the fleet on `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn active_as_of(&self, date: NaiveDate) -> Result<Vec<FleetRecord>> {
        let records = self.store.snapshot()?;
        Ok(analytics::active_as_of(&records, date)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Average-age projection of the seed baseline and the session fleet.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn age_overview(&self, start_year: i32, year_count: u32) -> Result<AgeOverview> {
        let scenario = self.store.snapshot()?;
        Ok(AgeOverview::compute(
            &self.baseline(),
            &scenario,
            start_year,
            year_count,
        ))
    }

    /// Distribution of the fleet active on `date` by `field`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn distribution(&self, date: NaiveDate, field: BreakdownField) -> Result<Distribution> {
        let records = self.store.snapshot()?;
        Ok(analytics::distribution_counts(&records, date, field))
    }

    /// Additions and removals dated `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn change_summary(&self, today: NaiveDate) -> Result<ChangeSummary> {
        let records = self.store.snapshot()?;
        Ok(summary::change_summary(&records, today))
    }

    /// Summary figures for the fleet table.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn stats(&self) -> Result<StoreStats> {
        self.store.stats()
    }

    /// The fleet table as CSV bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn export_csv(&self) -> Result<Vec<u8>> {
        export::to_csv(&self.store.snapshot()?)
    }
}
