//! `SQLite` schema definitions for the session fleet store.
//!
//! Dates are stored as `YYYY-MM-DD` text. A NULL `date_of_exit` means the
//! aircraft is still in the fleet.

/// SQL statement to create the aircraft table.
pub const CREATE_AIRCRAFT_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS aircraft (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    registration TEXT NOT NULL,
    aircraft_type TEXT NOT NULL,
    aircraft_variant TEXT NOT NULL DEFAULT '',
    date_of_manufacture TEXT,
    date_of_entry TEXT,
    date_of_exit TEXT,
    lease_type TEXT NOT NULL,
    lease_end_date TEXT,
    market_value REAL NOT NULL CHECK (market_value >= 0),
    monthly_lease REAL CHECK (monthly_lease IS NULL OR monthly_lease >= 0)
)
";

/// SQL statement to create an index on `registration` for removal by tail number.
pub const CREATE_REGISTRATION_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_aircraft_registration ON aircraft(registration)
";

/// SQL statement to create an index on `date_of_exit` for active-fleet queries.
pub const CREATE_EXIT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_aircraft_exit ON aircraft(date_of_exit)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_AIRCRAFT_TABLE,
    CREATE_REGISTRATION_INDEX,
    CREATE_EXIT_INDEX,
];

/// Columns selected for a full record, in `row_to_record` order.
pub const RECORD_COLUMNS: &str = "id, registration, aircraft_type, aircraft_variant, \
     date_of_manufacture, date_of_entry, date_of_exit, lease_type, lease_end_date, \
     market_value, monthly_lease";

/// Create every table and index on a fresh connection.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub fn initialize_schema(conn: &rusqlite::Connection) -> crate::Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
    }

    #[test]
    fn test_schema_statements_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();
        for statement in SCHEMA_STATEMENTS {
            conn.execute(statement, []).unwrap();
        }
    }

    #[test]
    fn test_initialize_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();

        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='aircraft'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_indexes_created() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let indexes: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='index' AND tbl_name='aircraft'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(std::result::Result::ok)
            .collect();

        assert!(indexes.iter().any(|n| n.contains("registration")));
        assert!(indexes.iter().any(|n| n.contains("exit")));
    }

    #[test]
    fn test_negative_market_value_rejected_by_schema() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO aircraft (registration, aircraft_type, lease_type, market_value) \
             VALUES ('X', 'Others', 'OWN', -1.0)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_record_columns_match_table() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        let sql = format!("SELECT {RECORD_COLUMNS} FROM aircraft");
        assert!(conn.prepare(&sql).is_ok());
    }
}
