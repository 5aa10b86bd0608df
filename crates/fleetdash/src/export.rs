//! CSV export of the fleet table.
//!
//! The export is UTF-8, has one header row and one row per record (exited
//! aircraft included). Dates are written as `YYYY-MM-DD` and unset optional
//! fields are left empty.

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::record::FleetRecord;

/// Default file name for exports.
pub const DEFAULT_FILE_NAME: &str = "fleet_data.csv";

/// Header row, in column order.
pub const HEADER: [&str; 10] = [
    "Registration",
    "AircraftType",
    "AircraftVariant",
    "DateOfManufacture",
    "DateOfEntry",
    "DateOfExit",
    "LeaseType",
    "LeaseEndDate",
    "MarketValue",
    "MonthlyLease",
];

/// One exported row; field order matches [`HEADER`].
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    registration: &'a str,
    aircraft_type: &'static str,
    aircraft_variant: &'a str,
    date_of_manufacture: Option<NaiveDate>,
    date_of_entry: Option<NaiveDate>,
    date_of_exit: Option<NaiveDate>,
    lease_type: &'static str,
    lease_end_date: Option<NaiveDate>,
    market_value: f64,
    monthly_lease: Option<f64>,
}

impl<'a> From<&'a FleetRecord> for CsvRow<'a> {
    fn from(record: &'a FleetRecord) -> Self {
        Self {
            registration: &record.registration,
            aircraft_type: record.aircraft_type.label(),
            aircraft_variant: &record.aircraft_variant,
            date_of_manufacture: record.date_of_manufacture,
            date_of_entry: record.date_of_entry,
            date_of_exit: record.lifecycle.exit_date(),
            lease_type: record.lease_type.label(),
            lease_end_date: record.lease_end_date,
            market_value: record.market_value,
            monthly_lease: record.monthly_lease,
        }
    }
}

/// Serialize records to CSV bytes with CRLF line endings.
///
/// # Errors
///
/// Returns an error if a row cannot be serialized.
pub fn to_csv(records: &[FleetRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }

    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

/// Write the CSV export to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// written.
pub fn write_csv(records: &[FleetRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    std::fs::write(path, to_csv(records)?)?;
    info!("Exported {} records to {}", records.len(), path.display());
    Ok(())
}
