//! Session-scoped fleet store.
//!
//! The store keeps the fleet table in an in-memory `SQLite` database that
//! lives exactly as long as the session. Rows are addressed by a stable
//! [`RecordId`], never by position, and records are never physically
//! deleted: leaving the fleet is a lifecycle change.
//!
//! Every mutating method takes `&mut self`, so a store has exactly one
//! mutator at a time. Multi-row writes run inside a single transaction and
//! either apply completely or not at all.

pub mod schema;

use std::path::PathBuf;

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{FleetRecord, LeaseType, Lifecycle, ParseVariantError, RecordId};

use schema::RECORD_COLUMNS;

/// Format used for every date column.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The fleet table for one session.
#[derive(Debug)]
pub struct FleetStore {
    /// Database connection.
    conn: Connection,
}

impl FleetStore {
    /// Create an empty in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        schema::initialize_schema(&conn)?;

        debug!("Opened in-memory fleet store");
        Ok(Self { conn })
    }

    /// Create an in-memory store holding the given records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be created or a record is rejected.
    pub fn with_records(records: &[FleetRecord]) -> Result<Self> {
        let mut store = Self::open_in_memory()?;
        store.replace_all(records)?;
        Ok(store)
    }

    /// Append one record and return its identity.
    ///
    /// Any `id` already set on the record is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&mut self, record: &FleetRecord) -> Result<RecordId> {
        let id = insert_row(&self.conn, record)?;
        debug!("Inserted {} as {}", record.registration, id);
        Ok(id)
    }

    /// Move the given records from active to exited on `date`.
    ///
    /// All rows transition or none do: if any row is unknown or already
    /// exited, the transaction is rolled back and the store is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotActive`] for a row that is unknown or already
    /// exited, or an error if the database operation fails.
    pub fn mark_exited(&mut self, ids: &[RecordId], date: NaiveDate) -> Result<usize> {
        let date_str = date.format(DATE_FORMAT).to_string();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "UPDATE aircraft SET date_of_exit = ?1 WHERE id = ?2 AND date_of_exit IS NULL",
            )?;
            for id in ids {
                if stmt.execute(params![date_str, id.0])? == 0 {
                    // Dropping `tx` without commit rolls back earlier updates.
                    return Err(Error::RecordNotActive { id: *id });
                }
            }
        }
        tx.commit()?;

        debug!("Marked {} records exited on {}", ids.len(), date);
        Ok(ids.len())
    }

    /// Replace the whole table with `records`.
    ///
    /// Identities keep increasing across replacements, so ids handed out
    /// before a reset never alias a new row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails; the previous table
    /// is then left untouched.
    pub fn replace_all(&mut self, records: &[FleetRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM aircraft", [])?;
        for record in records {
            insert_row(&tx, record)?;
        }
        tx.commit()?;

        info!("Fleet store loaded with {} records", records.len());
        Ok(())
    }

    /// Get a record by its identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: RecordId) -> Result<Option<FleetRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM aircraft WHERE id = ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id.0])?;
        let record = rows.next()?.map(Self::row_to_record).transpose()?;
        Ok(record)
    }

    /// Read-only copy of every record, in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn snapshot(&self) -> Result<Vec<FleetRecord>> {
        self.query_records(&format!(
            "SELECT {RECORD_COLUMNS} FROM aircraft ORDER BY id"
        ))
    }

    /// Records that have not left the fleet, in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn active(&self) -> Result<Vec<FleetRecord>> {
        self.query_records(&format!(
            "SELECT {RECORD_COLUMNS} FROM aircraft WHERE date_of_exit IS NULL ORDER BY id"
        ))
    }

    /// Count all records, including exited ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<usize> {
        self.count_where("1 = 1")
    }

    /// Count records that have not left the fleet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn active_count(&self) -> Result<usize> {
        self.count_where("date_of_exit IS NULL")
    }

    /// Summary figures for the current table.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StoreStats> {
        let total = self.count()?;
        let active = self.active_count()?;

        let mut active_by_lease = Vec::with_capacity(LeaseType::ALL.len());
        for lease_type in LeaseType::ALL {
            let n: i64 = self.conn.query_row(
                "SELECT COUNT(*) FROM aircraft WHERE date_of_exit IS NULL AND lease_type = ?1",
                [lease_type.label()],
                |row| row.get(0),
            )?;
            active_by_lease.push((lease_type, to_usize(n)?));
        }

        let active_market_value: f64 = self.conn.query_row(
            "SELECT TOTAL(market_value) FROM aircraft WHERE date_of_exit IS NULL",
            [],
            |row| row.get(0),
        )?;

        let active_monthly_lease: f64 = self.conn.query_row(
            "SELECT TOTAL(monthly_lease) FROM aircraft WHERE date_of_exit IS NULL",
            [],
            |row| row.get(0),
        )?;

        Ok(StoreStats {
            total,
            active,
            exited: total - active,
            active_by_lease,
            active_market_value,
            active_monthly_lease,
        })
    }

    fn count_where(&self, predicate: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM aircraft WHERE {predicate}");
        let n: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        to_usize(n)
    }

    fn query_records(&self, sql: &str) -> Result<Vec<FleetRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(Self::row_to_record(row)?);
        }
        Ok(records)
    }

    /// Convert a database row to a `FleetRecord`.
    ///
    /// Values the domain types reject are reported as [`Error::CorruptRow`].
    fn row_to_record(row: &rusqlite::Row) -> Result<FleetRecord> {
        let id: i64 = row.get(0)?;
        let registration: String = row.get(1)?;
        let aircraft_type_str: String = row.get(2)?;
        let aircraft_variant: String = row.get(3)?;
        let date_of_manufacture = parse_date_column(row, id, 4)?;
        let date_of_entry = parse_date_column(row, id, 5)?;
        let date_of_exit = parse_date_column(row, id, 6)?;
        let lease_type_str: String = row.get(7)?;
        let lease_end_date = parse_date_column(row, id, 8)?;
        let market_value: f64 = row.get(9)?;
        let monthly_lease: Option<f64> = row.get(10)?;

        let aircraft_type = aircraft_type_str
            .parse()
            .map_err(|e: ParseVariantError| Error::corrupt_row(id, e.to_string()))?;
        let lease_type = lease_type_str
            .parse()
            .map_err(|e: ParseVariantError| Error::corrupt_row(id, e.to_string()))?;

        Ok(FleetRecord {
            id: Some(RecordId(id)),
            registration,
            aircraft_type,
            aircraft_variant,
            date_of_manufacture,
            date_of_entry,
            lifecycle: date_of_exit.map_or(Lifecycle::Active, Lifecycle::Exited),
            lease_type,
            lease_end_date,
            market_value,
            monthly_lease,
        })
    }
}

fn insert_row(conn: &Connection, record: &FleetRecord) -> Result<RecordId> {
    conn.execute(
        r"
        INSERT INTO aircraft (
            registration, aircraft_type, aircraft_variant, date_of_manufacture,
            date_of_entry, date_of_exit, lease_type, lease_end_date,
            market_value, monthly_lease
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ",
        params![
            record.registration,
            record.aircraft_type.label(),
            record.aircraft_variant,
            format_date(record.date_of_manufacture),
            format_date(record.date_of_entry),
            format_date(record.lifecycle.exit_date()),
            record.lease_type.label(),
            format_date(record.lease_end_date),
            record.market_value,
            record.monthly_lease,
        ],
    )?;
    Ok(RecordId(conn.last_insert_rowid()))
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

fn parse_date_column(row: &rusqlite::Row, id: i64, idx: usize) -> Result<Option<NaiveDate>> {
    let value: Option<String> = row.get(idx)?;
    value
        .map(|s| {
            NaiveDate::parse_from_str(&s, DATE_FORMAT)
                .map_err(|e| Error::corrupt_row(id, format!("bad date '{s}' in column {idx}: {e}")))
        })
        .transpose()
}

fn to_usize(n: i64) -> Result<usize> {
    usize::try_from(n).map_err(|_| Error::internal(format!("negative row count: {n}")))
}

/// Summary figures about the fleet table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStats {
    /// Every record, including exited ones.
    pub total: usize,
    /// Records that have not left the fleet.
    pub active: usize,
    /// Records that have left the fleet.
    pub exited: usize,
    /// Active records per lease type, in [`LeaseType::ALL`] order.
    pub active_by_lease: Vec<(LeaseType, usize)>,
    /// Sum of market value over active records, in USD.
    pub active_market_value: f64,
    /// Sum of monthly operating lease rent over active records, in USD.
    pub active_monthly_lease: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AircraftType, NewAircraft};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_store() -> FleetStore {
        FleetStore::open_in_memory().expect("failed to create test store")
    }

    fn create_test_record(registration: &str, built: i32) -> FleetRecord {
        NewAircraft::new(
            registration,
            AircraftType::B737Ng,
            date(built, 1, 1),
            date(built, 6, 1),
            LeaseType::Own,
            10_000_000.0,
        )
        .into_record()
    }

    #[test]
    fn test_open_in_memory() {
        let store = FleetStore::open_in_memory();
        assert!(store.is_ok());
        assert_eq!(store.unwrap().count().unwrap(), 0);
    }

    #[test]
    fn test_insert_and_get() {
        let mut store = create_test_store();
        let record = create_test_record("EI-AAA", 2015);

        let id = store.insert(&record).unwrap();
        let retrieved = store.get(id).unwrap().unwrap();

        assert_eq!(retrieved.id, Some(id));
        assert_eq!(retrieved.registration, "EI-AAA");
        assert_eq!(retrieved.date_of_manufacture, Some(date(2015, 1, 1)));
        assert!(retrieved.is_active());
    }

    #[test]
    fn test_get_nonexistent() {
        let store = create_test_store();
        assert!(store.get(RecordId(99_999)).unwrap().is_none());
    }

    #[test]
    fn test_round_trip_all_fields() {
        let mut store = create_test_store();
        let mut record = NewAircraft::new(
            "EI-OPS",
            AircraftType::A321Neo,
            date(2019, 2, 3),
            date(2019, 4, 5),
            LeaseType::Ops,
            52_500_000.5,
        )
        .with_variant("LR")
        .with_lease_terms(date(2031, 4, 4), 380_000.0)
        .into_record();
        record.lifecycle = Lifecycle::Exited(date(2024, 12, 31));

        let id = store.insert(&record).unwrap();
        record.id = Some(id);

        assert_eq!(store.get(id).unwrap().unwrap(), record);
    }

    #[test]
    fn test_missing_dates_round_trip() {
        let mut store = create_test_store();
        let mut record = create_test_record("EI-NUL", 2010);
        record.date_of_manufacture = None;
        record.date_of_entry = None;

        let id = store.insert(&record).unwrap();
        let retrieved = store.get(id).unwrap().unwrap();
        assert_eq!(retrieved.date_of_manufacture, None);
        assert_eq!(retrieved.date_of_entry, None);
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let mut store = create_test_store();
        for (i, reg) in ["C", "A", "B"].iter().enumerate() {
            let year = 2010 + i32::try_from(i).unwrap();
            store.insert(&create_test_record(reg, year)).unwrap();
        }

        let regs: Vec<String> = store
            .snapshot()
            .unwrap()
            .into_iter()
            .map(|r| r.registration)
            .collect();
        assert_eq!(regs, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_mark_exited() {
        let mut store = create_test_store();
        let a = store.insert(&create_test_record("A", 2010)).unwrap();
        let b = store.insert(&create_test_record("B", 2012)).unwrap();

        let n = store.mark_exited(&[a], date(2025, 6, 1)).unwrap();
        assert_eq!(n, 1);

        assert_eq!(
            store.get(a).unwrap().unwrap().lifecycle,
            Lifecycle::Exited(date(2025, 6, 1))
        );
        assert!(store.get(b).unwrap().unwrap().is_active());
        assert_eq!(store.active_count().unwrap(), 1);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_mark_exited_is_one_way() {
        let mut store = create_test_store();
        let a = store.insert(&create_test_record("A", 2010)).unwrap();

        store.mark_exited(&[a], date(2025, 1, 1)).unwrap();
        let err = store.mark_exited(&[a], date(2026, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::RecordNotActive { id } if id == a));

        // The original exit date stands.
        assert_eq!(
            store.get(a).unwrap().unwrap().lifecycle,
            Lifecycle::Exited(date(2025, 1, 1))
        );
    }

    #[test]
    fn test_mark_exited_rolls_back_on_failure() {
        let mut store = create_test_store();
        let a = store.insert(&create_test_record("A", 2010)).unwrap();
        let b = store.insert(&create_test_record("B", 2011)).unwrap();

        let result = store.mark_exited(&[a, RecordId(404), b], date(2025, 1, 1));
        assert!(result.is_err());

        assert!(store.get(a).unwrap().unwrap().is_active());
        assert!(store.get(b).unwrap().unwrap().is_active());
        assert_eq!(store.active_count().unwrap(), 2);
    }

    #[test]
    fn test_mark_exited_empty_is_noop() {
        let mut store = create_test_store();
        store.insert(&create_test_record("A", 2010)).unwrap();
        assert_eq!(store.mark_exited(&[], date(2025, 1, 1)).unwrap(), 0);
        assert_eq!(store.active_count().unwrap(), 1);
    }

    #[test]
    fn test_replace_all() {
        let mut store = create_test_store();
        let old = store.insert(&create_test_record("OLD", 2000)).unwrap();

        store
            .replace_all(&[create_test_record("N1", 2020), create_test_record("N2", 2021)])
            .unwrap();

        assert!(store.get(old).unwrap().is_none());
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        // Identities are not reused after a reset.
        assert!(snapshot.iter().all(|r| r.id.unwrap() > old));
    }

    #[test]
    fn test_replace_all_failure_keeps_previous_table() {
        let mut store = create_test_store();
        store.insert(&create_test_record("KEEP", 2000)).unwrap();

        let mut bad = create_test_record("BAD", 2020);
        bad.market_value = -5.0;
        let result = store.replace_all(&[create_test_record("N1", 2020), bad]);
        assert!(result.is_err());

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].registration, "KEEP");
    }

    #[test]
    fn test_with_records() {
        let store =
            FleetStore::with_records(&[create_test_record("A", 2010), create_test_record("B", 2011)])
                .unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_active_excludes_exited() {
        let mut store = create_test_store();
        let a = store.insert(&create_test_record("A", 2010)).unwrap();
        store.insert(&create_test_record("B", 2011)).unwrap();
        store.mark_exited(&[a], date(2020, 1, 1)).unwrap();

        let active = store.active().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].registration, "B");
    }

    #[test]
    fn test_stats() {
        let mut store = create_test_store();
        let a = store.insert(&create_test_record("A", 2010)).unwrap();
        store.insert(&create_test_record("B", 2011)).unwrap();
        let mut ops = create_test_record("C", 2012);
        ops.lease_type = LeaseType::Ops;
        ops.monthly_lease = Some(250_000.0);
        store.insert(&ops).unwrap();
        store.mark_exited(&[a], date(2020, 1, 1)).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.exited, 1);
        assert_eq!(
            stats.active_by_lease,
            vec![(LeaseType::Own, 1), (LeaseType::Fin, 0), (LeaseType::Ops, 1)]
        );
        assert!((stats.active_market_value - 20_000_000.0).abs() < f64::EPSILON);
        assert!((stats.active_monthly_lease - 250_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_empty_store() {
        let store = create_test_store();
        let stats = store.stats().unwrap();
        assert_eq!(stats.total, 0);
        assert!(stats.active_market_value.abs() < f64::EPSILON);
    }

    #[test]
    fn test_corrupt_row_is_reported() {
        let store = create_test_store();
        store
            .conn
            .execute(
                "INSERT INTO aircraft (registration, aircraft_type, lease_type, market_value) \
                 VALUES ('X', 'Zeppelin', 'OWN', 1.0)",
                [],
            )
            .unwrap();

        let err = store.snapshot().unwrap_err();
        assert!(matches!(err, Error::CorruptRow { id: 1, .. }));
        assert!(err.to_string().contains("Zeppelin"));
    }
}
