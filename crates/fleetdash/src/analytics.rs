//! Age and distribution reports over a fleet snapshot.
//!
//! Everything here is a pure function of a record slice, so reports can run
//! against the live session store and the seed baseline alike.
//!
//! Per-year age computation never fails: a year that cannot be computed is
//! reported as `0.0` and flagged as degraded on its [`AgePoint`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::record::FleetRecord;

/// Records that were part of the fleet on `date`, in input order.
///
/// A record qualifies when it entered on or before `date` and had not exited
/// by then (an exit on `date` itself counts as gone).
#[must_use]
pub fn active_as_of(records: &[FleetRecord], date: NaiveDate) -> Vec<&FleetRecord> {
    records.iter().filter(|r| r.is_active_as_of(date)).collect()
}

/// Average fleet age at the start of one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgePoint {
    /// Calendar year; ages are measured on January 1st.
    pub year: i32,
    /// Mean age in years of the active fleet, `0.0` for an empty fleet.
    pub average_age: f64,
    /// The value could not be computed and was replaced by `0.0`.
    pub degraded: bool,
}

/// Average fleet age over consecutive years.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgeSeries {
    points: Vec<AgePoint>,
}

impl AgeSeries {
    /// The points in year order.
    #[must_use]
    pub fn points(&self) -> &[AgePoint] {
        &self.points
    }

    /// The average age for `year`, if the series covers it.
    #[must_use]
    pub fn average_for(&self, year: i32) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.year == year)
            .map(|p| p.average_age)
    }

    /// Years whose value was defaulted to `0.0`.
    #[must_use]
    pub fn degraded_years(&self) -> Vec<i32> {
        self.points
            .iter()
            .filter(|p| p.degraded)
            .map(|p| p.year)
            .collect()
    }

    /// Number of years in the series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series covers no years.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Average fleet age on January 1st of each year in
/// `[start_year, start_year + year_count)`.
///
/// Records without a manufacture date are left out of the mean. A year with
/// no active aircraft yields `0.0`. The series stops early if a year would
/// overflow `i32`.
#[must_use]
pub fn average_age_series(records: &[FleetRecord], start_year: i32, year_count: u32) -> AgeSeries {
    let points = (0..year_count)
        .map_while(|offset| {
            let year = i32::try_from(offset)
                .ok()
                .and_then(|o| start_year.checked_add(o))?;
            let point = match average_age_on_new_year(records, year) {
                Some(average_age) => AgePoint {
                    year,
                    average_age,
                    degraded: false,
                },
                None => {
                    warn!(year, "Average age could not be computed, reporting 0");
                    AgePoint {
                        year,
                        average_age: 0.0,
                        degraded: true,
                    }
                }
            };
            Some(point)
        })
        .collect();

    AgeSeries { points }
}

/// Last year of a `year_count`-year projection starting at `start_year`, if
/// January 1st of that year is a representable date.
#[must_use]
pub fn last_projected_year(start_year: i32, year_count: u32) -> Option<i32> {
    let span = i32::try_from(year_count.saturating_sub(1)).ok()?;
    let last = start_year.checked_add(span)?;
    NaiveDate::from_ymd_opt(last, 1, 1).map(|_| last)
}

/// Mean age on January 1st of `year`; `None` when it cannot be computed.
#[allow(clippy::cast_precision_loss)]
fn average_age_on_new_year(records: &[FleetRecord], year: i32) -> Option<f64> {
    let date = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let ages: Vec<f64> = active_as_of(records, date)
        .into_iter()
        .filter_map(|r| r.age_in_years(date))
        .collect();

    if ages.is_empty() {
        return Some(0.0);
    }

    let mean = ages.iter().sum::<f64>() / ages.len() as f64;
    mean.is_finite().then_some(mean)
}

/// Average-age projection of the seed baseline next to the current session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeOverview {
    /// The fleet as seeded, before any session changes.
    pub original: AgeSeries,
    /// The fleet as it stands in the session.
    pub scenario: AgeSeries,
}

impl AgeOverview {
    /// Compute both series over the same years.
    #[must_use]
    pub fn compute(
        original: &[FleetRecord],
        scenario: &[FleetRecord],
        start_year: i32,
        year_count: u32,
    ) -> Self {
        Self {
            original: average_age_series(original, start_year, year_count),
            scenario: average_age_series(scenario, start_year, year_count),
        }
    }
}

/// Categorical field a distribution is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownField {
    /// Group by aircraft type.
    AircraftType,
    /// Group by lease type.
    LeaseType,
}

impl BreakdownField {
    fn label_of(self, record: &FleetRecord) -> &'static str {
        match self {
            Self::AircraftType => record.aircraft_type.label(),
            Self::LeaseType => record.lease_type.label(),
        }
    }
}

impl fmt::Display for BreakdownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AircraftType => write!(f, "Aircraft Type"),
            Self::LeaseType => write!(f, "Lease Type"),
        }
    }
}

/// Count of active aircraft per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    /// What the counts are grouped by.
    pub field: BreakdownField,
    /// The date the active fleet was taken on.
    pub date: NaiveDate,
    /// Count per category label. Categories with no aircraft are absent.
    pub counts: BTreeMap<String, usize>,
}

impl Distribution {
    /// Count for one category label.
    #[must_use]
    pub fn count(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Total number of aircraft counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Whether no aircraft were counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Categories by descending count, ties by label.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(label, n)| (label.as_str(), *n))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

/// Group the fleet active on `date` by `field`.
///
/// Records missing a date of entry or a date of manufacture are left out
/// entirely.
#[must_use]
pub fn distribution_counts(
    records: &[FleetRecord],
    date: NaiveDate,
    field: BreakdownField,
) -> Distribution {
    let mut counts = BTreeMap::new();
    for record in records
        .iter()
        .filter(|r| r.date_of_entry.is_some() && r.date_of_manufacture.is_some())
        .filter(|r| r.is_active_as_of(date))
    {
        *counts.entry(field.label_of(record).to_string()).or_insert(0) += 1;
    }

    Distribution {
        field,
        date,
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AircraftType, LeaseType, Lifecycle, NewAircraft};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn aircraft(
        registration: &str,
        built: NaiveDate,
        entered: NaiveDate,
        aircraft_type: AircraftType,
        lease_type: LeaseType,
    ) -> FleetRecord {
        NewAircraft::new(registration, aircraft_type, built, entered, lease_type, 1.0).into_record()
    }

    /// Aircraft X (built 2010, joined 2015) and Y (built 2020, joined 2021).
    fn fleet_xy() -> Vec<FleetRecord> {
        vec![
            aircraft(
                "X",
                date(2010, 1, 1),
                date(2015, 1, 1),
                AircraftType::B737Ng,
                LeaseType::Own,
            ),
            aircraft(
                "Y",
                date(2020, 1, 1),
                date(2021, 1, 1),
                AircraftType::A320Neo,
                LeaseType::Ops,
            ),
        ]
    }

    #[test]
    fn test_active_as_of() {
        let mut fleet = fleet_xy();
        fleet[0].lifecycle = Lifecycle::Exited(date(2022, 1, 1));

        let regs = |d: NaiveDate| {
            active_as_of(&fleet, d)
                .iter()
                .map(|r| r.registration.clone())
                .collect::<Vec<String>>()
        };

        assert!(regs(date(2014, 12, 31)).is_empty());
        assert_eq!(regs(date(2015, 1, 1)), vec!["X"]);
        assert_eq!(regs(date(2021, 6, 1)), vec!["X", "Y"]);
        assert_eq!(regs(date(2022, 1, 1)), vec!["Y"]);
    }

    #[test]
    fn test_active_as_of_changes_only_at_entry_and_exit() {
        let mut fleet = fleet_xy();
        fleet[1].lifecycle = Lifecycle::Exited(date(2023, 7, 15));

        let checkpoints = [
            date(2012, 1, 1),
            date(2015, 1, 1),
            date(2020, 12, 31),
            date(2021, 1, 1),
            date(2023, 7, 14),
            date(2023, 7, 15),
            date(2030, 1, 1),
        ];
        for pair in checkpoints.windows(2) {
            let (d1, d2) = (pair[0], pair[1]);
            for record in &fleet {
                let at1 = record.is_active_as_of(d1);
                let at2 = record.is_active_as_of(d2);
                if at2 && !at1 {
                    let doi = record.date_of_entry.unwrap();
                    assert!(d1 < doi && doi <= d2);
                }
                if at1 && !at2 {
                    let doe = record.lifecycle.exit_date().unwrap();
                    assert!(d1 < doe && doe <= d2);
                }
            }
        }
    }

    #[test]
    fn test_average_age_worked_example() {
        let series = average_age_series(&fleet_xy(), 2025, 1);
        assert_eq!(series.len(), 1);

        let point = series.points()[0];
        assert_eq!(point.year, 2025);
        assert!(!point.degraded);
        // X is ~15.0 years old and Y ~5.0.
        assert!((point.average_age - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_average_age_series_covers_requested_years() {
        let series = average_age_series(&fleet_xy(), 2025, 11);
        let years: Vec<i32> = series.points().iter().map(|p| p.year).collect();
        assert_eq!(years, (2025..2036).collect::<Vec<_>>());

        // Nobody joins or leaves, so the fleet ages one year per year.
        let a2025 = series.average_for(2025).unwrap();
        let a2030 = series.average_for(2030).unwrap();
        assert!((a2030 - a2025 - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_average_age_empty_fleet_is_zero() {
        let series = average_age_series(&fleet_xy(), 2000, 3);
        for point in series.points() {
            assert!(point.average_age.abs() < f64::EPSILON);
            assert!(!point.degraded);
        }
        assert!(series.degraded_years().is_empty());

        let empty = average_age_series(&[], 2025, 2);
        assert_eq!(empty.len(), 2);
        assert!(empty.points().iter().all(|p| p.average_age == 0.0));
    }

    #[test]
    fn test_average_age_only_counts_active() {
        // Only X is active on 2016-01-01.
        let series = average_age_series(&fleet_xy(), 2016, 1);
        assert!((series.average_for(2016).unwrap() - 6.0).abs() < 0.01);
    }

    #[test]
    fn test_average_age_skips_missing_manufacture_date() {
        let mut fleet = fleet_xy();
        fleet[1].date_of_manufacture = None;

        let series = average_age_series(&fleet, 2025, 1);
        assert!((series.average_for(2025).unwrap() - 15.0).abs() < 0.01);
    }

    #[test]
    fn test_average_age_all_missing_manufacture_is_zero() {
        let mut fleet = fleet_xy();
        for record in &mut fleet {
            record.date_of_manufacture = None;
        }
        let series = average_age_series(&fleet, 2025, 1);
        assert_eq!(series.average_for(2025), Some(0.0));
        assert!(series.degraded_years().is_empty());
    }

    #[test]
    fn test_average_age_unrepresentable_year_is_degraded() {
        crate::logging::init_test_logging();
        let series = average_age_series(&fleet_xy(), 300_000, 2);
        assert_eq!(series.len(), 2);
        assert!(series.points().iter().all(|p| p.average_age == 0.0));
        assert_eq!(series.degraded_years(), vec![300_000, 300_001]);
    }

    #[test]
    fn test_average_age_stops_at_year_overflow() {
        let series = average_age_series(&fleet_xy(), i32::MAX - 1, 5);
        let years: Vec<i32> = series.points().iter().map(|p| p.year).collect();
        assert_eq!(years, vec![i32::MAX - 1, i32::MAX]);
        assert!(series.points().iter().all(|p| p.degraded));
    }

    #[test]
    fn test_last_projected_year() {
        assert_eq!(last_projected_year(2025, 11), Some(2035));
        assert_eq!(last_projected_year(2025, 1), Some(2025));
        assert_eq!(last_projected_year(2025, 0), Some(2025));
        assert_eq!(last_projected_year(262_000, 1_000), None);
        assert_eq!(last_projected_year(i32::MAX, 2), None);
    }

    #[test]
    fn test_average_age_zero_years() {
        assert!(average_age_series(&fleet_xy(), 2025, 0).is_empty());
    }

    #[test]
    fn test_age_overview() {
        let original = fleet_xy();
        let mut scenario = fleet_xy();
        scenario[0].lifecycle = Lifecycle::Exited(date(2024, 6, 1));

        let overview = AgeOverview::compute(&original, &scenario, 2025, 1);
        assert!((overview.original.average_for(2025).unwrap() - 10.0).abs() < 0.01);
        assert!((overview.scenario.average_for(2025).unwrap() - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_distribution_by_type() {
        let mut fleet = fleet_xy();
        fleet.push(aircraft(
            "Z",
            date(2018, 1, 1),
            date(2018, 2, 1),
            AircraftType::B737Ng,
            LeaseType::Fin,
        ));

        let dist = distribution_counts(&fleet, date(2025, 1, 1), BreakdownField::AircraftType);
        assert_eq!(dist.count("B737-800NG"), 2);
        assert_eq!(dist.count("A320neo"), 1);
        assert_eq!(dist.count("A321neo"), 0);
        assert_eq!(dist.total(), 3);
        assert_eq!(dist.sorted(), vec![("B737-800NG", 2), ("A320neo", 1)]);
    }

    #[test]
    fn test_distribution_by_lease() {
        let dist = distribution_counts(&fleet_xy(), date(2025, 1, 1), BreakdownField::LeaseType);
        assert_eq!(dist.count("OWN"), 1);
        assert_eq!(dist.count("OPS"), 1);
        assert_eq!(dist.count("FIN"), 0);
    }

    #[test]
    fn test_distribution_respects_date() {
        let dist = distribution_counts(&fleet_xy(), date(2016, 1, 1), BreakdownField::LeaseType);
        assert_eq!(dist.total(), 1);

        let none = distribution_counts(&fleet_xy(), date(2000, 1, 1), BreakdownField::LeaseType);
        assert!(none.is_empty());
    }

    #[test]
    fn test_distribution_excludes_incomplete_records() {
        let mut fleet = fleet_xy();
        fleet[0].date_of_manufacture = None;

        let dist = distribution_counts(&fleet, date(2025, 1, 1), BreakdownField::AircraftType);
        assert_eq!(dist.total(), 1);
        assert_eq!(dist.count("B737-800NG"), 0);
    }

    #[test]
    fn test_distribution_sorted_ties_by_label() {
        let dist = distribution_counts(&fleet_xy(), date(2025, 1, 1), BreakdownField::AircraftType);
        assert_eq!(dist.sorted(), vec![("A320neo", 1), ("B737-800NG", 1)]);
    }

    #[test]
    fn test_breakdown_field_display() {
        assert_eq!(BreakdownField::AircraftType.to_string(), "Aircraft Type");
        assert_eq!(BreakdownField::LeaseType.to_string(), "Lease Type");
    }
}
