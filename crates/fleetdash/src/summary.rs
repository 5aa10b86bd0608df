//! What changed in the fleet on a given day.

use chrono::NaiveDate;
use serde::Serialize;

use crate::record::FleetRecord;

/// Registrations that joined or left the fleet on one day.
///
/// The two lists are independent: an aircraft added and removed on the same
/// day appears in both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    /// The day summarized.
    pub date: NaiveDate,
    /// Registrations whose date of entry is `date`, in store order.
    pub added: Vec<String>,
    /// Registrations whose exit date is `date`, in store order.
    pub removed: Vec<String>,
}

impl ChangeSummary {
    /// Whether nothing was added or removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Summarize additions and removals dated `today`.
#[must_use]
pub fn change_summary(records: &[FleetRecord], today: NaiveDate) -> ChangeSummary {
    let added = records
        .iter()
        .filter(|r| r.date_of_entry == Some(today))
        .map(|r| r.registration.clone())
        .collect();
    let removed = records
        .iter()
        .filter(|r| r.lifecycle.exit_date() == Some(today))
        .map(|r| r.registration.clone())
        .collect();

    ChangeSummary {
        date: today,
        added,
        removed,
    }
}
