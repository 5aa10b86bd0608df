//! Seed data for a session.
//!
//! A [`FleetSource`] supplies the baseline fleet table. The session calls it
//! at start-up, on reset, and whenever a report needs the untouched baseline
//! for comparison, so every call must return the same table.

use std::fmt;

use chrono::NaiveDate;

use crate::record::{AircraftType, FleetRecord, LeaseType, Lifecycle};

/// Supplier of the baseline fleet table.
pub trait FleetSource: fmt::Debug {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Build the baseline fleet. Records must not carry ids.
    fn initialize(&self) -> Vec<FleetRecord>;
}

/// A fixed list of records, mostly useful for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticFleet {
    records: Vec<FleetRecord>,
}

impl StaticFleet {
    /// Wrap a list of records; any ids are cleared.
    #[must_use]
    pub fn new(records: Vec<FleetRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|mut r| {
                r.id = None;
                r
            })
            .collect();
        Self { records }
    }
}

impl FleetSource for StaticFleet {
    fn name(&self) -> &'static str {
        "static"
    }

    fn initialize(&self) -> Vec<FleetRecord> {
        self.records.clone()
    }
}

/// The built-in baseline fleet.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineFleet;

/// Compact row: registration, type, variant, built, entered, exited, lease,
/// lease end, market value (USD m), monthly lease (USD k).
type SeedRow = (
    &'static str,
    AircraftType,
    &'static str,
    (i32, u32, u32),
    (i32, u32, u32),
    Option<(i32, u32, u32)>,
    LeaseType,
    Option<(i32, u32, u32)>,
    f64,
    Option<f64>,
);

const BASELINE: &[SeedRow] = &[
    ("EI-DCL", AircraftType::B737Ng, "8AS", (2004, 3, 12), (2004, 4, 2), None, LeaseType::Own, None, 9.5, None),
    ("EI-DCM", AircraftType::B737Ng, "8AS", (2004, 5, 20), (2004, 6, 9), None, LeaseType::Own, None, 9.8, None),
    ("EI-DHA", AircraftType::B737Ng, "8AS", (2005, 11, 3), (2005, 12, 1), Some((2023, 10, 31)), LeaseType::Own, None, 8.1, None),
    ("EI-DPB", AircraftType::B737Ng, "8AS", (2007, 2, 14), (2007, 3, 5), None, LeaseType::Fin, None, 12.0, None),
    ("EI-DPF", AircraftType::B737Ng, "8AS", (2007, 6, 28), (2007, 7, 16), None, LeaseType::Ops, Some((2027, 7, 15)), 12.4, Some(145.0)),
    ("EI-EBA", AircraftType::B737Ng, "8AS", (2009, 8, 19), (2009, 9, 10), None, LeaseType::Own, None, 15.2, None),
    ("EI-EFB", AircraftType::B737Ng, "8AS", (2010, 1, 22), (2010, 2, 15), None, LeaseType::Fin, None, 16.0, None),
    ("EI-ENI", AircraftType::B737Ng, "8AS", (2012, 4, 11), (2012, 5, 3), None, LeaseType::Ops, Some((2028, 5, 2)), 19.3, Some(190.0)),
    ("EI-FIA", AircraftType::B737Ng, "8AS", (2014, 9, 30), (2014, 10, 21), None, LeaseType::Own, None, 23.7, None),
    ("EI-FOZ", AircraftType::B737Ng, "8AS", (2016, 3, 8), (2016, 3, 30), None, LeaseType::Own, None, 27.9, None),
    ("EI-HEA", AircraftType::B737Max8, "8200", (2021, 5, 26), (2021, 6, 14), None, LeaseType::Own, None, 48.5, None),
    ("EI-HEB", AircraftType::B737Max8, "8200", (2021, 7, 9), (2021, 7, 28), None, LeaseType::Fin, None, 49.0, None),
    ("EI-HGA", AircraftType::B737Max8, "8200", (2022, 2, 17), (2022, 3, 8), None, LeaseType::Ops, Some((2034, 3, 7)), 50.2, Some(360.0)),
    ("EI-HGB", AircraftType::B737Max8, "8200", (2022, 10, 4), (2022, 10, 25), None, LeaseType::Own, None, 51.0, None),
    ("EI-IMA", AircraftType::B737Max10, "", (2025, 9, 15), (2025, 10, 6), None, LeaseType::Fin, None, 60.5, None),
    ("EI-LNA", AircraftType::A320Neo, "", (2018, 11, 2), (2018, 11, 23), None, LeaseType::Ops, Some((2030, 11, 22)), 38.0, Some(310.0)),
    ("EI-LNB", AircraftType::A320Neo, "", (2019, 4, 16), (2019, 5, 7), None, LeaseType::Ops, Some((2031, 5, 6)), 39.1, Some(315.0)),
    ("EI-LNC", AircraftType::A320Neo, "", (2020, 1, 29), (2020, 2, 19), None, LeaseType::Own, None, 41.2, None),
    ("EI-XLA", AircraftType::A321Neo, "LR", (2020, 8, 5), (2020, 8, 26), None, LeaseType::Ops, Some((2032, 8, 25)), 50.8, Some(390.0)),
    ("EI-XLB", AircraftType::A321Neo, "XLR", (2024, 12, 3), (2024, 12, 20), None, LeaseType::Fin, None, 62.0, None),
    ("EI-STA", AircraftType::Others, "CRJ900", (2008, 6, 1), (2013, 4, 1), None, LeaseType::Ops, Some((2026, 3, 31)), 6.0, Some(95.0)),
];

fn ymd((y, m, d): (i32, u32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

impl FleetSource for BaselineFleet {
    fn name(&self) -> &'static str {
        "baseline"
    }

    fn initialize(&self) -> Vec<FleetRecord> {
        BASELINE
            .iter()
            .map(
                |&(reg, aircraft_type, variant, built, entered, exited, lease_type, lease_end, value_m, monthly_k)| {
                    FleetRecord {
                        id: None,
                        registration: reg.to_string(),
                        aircraft_type,
                        aircraft_variant: variant.to_string(),
                        date_of_manufacture: ymd(built),
                        date_of_entry: ymd(entered),
                        lifecycle: exited
                            .and_then(ymd)
                            .map_or(Lifecycle::Active, Lifecycle::Exited),
                        lease_type,
                        lease_end_date: lease_end.and_then(ymd),
                        market_value: value_m * 1_000_000.0,
                        monthly_lease: monthly_k.map(|k| k * 1_000.0),
                    }
                },
            )
            .collect()
    }
}
