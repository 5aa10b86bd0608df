//! Error types for fleetdash.
//!
//! This module defines all error types used throughout the fleetdash crate.
//! Errors fall into two groups: rejections of a user request (bad dates,
//! negative amounts, removal counts the fleet cannot satisfy), which leave the
//! fleet untouched, and infrastructure failures (storage, configuration, I/O).

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::record::RecordId;

/// The main error type for fleetdash operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Fleet Rejections ===
    /// An aircraft cannot join the fleet before it was built.
    #[error(
        "date of entry into fleet ({entry}) cannot be earlier than date of manufacture ({manufacture})"
    )]
    InvalidDateOrder {
        /// The requested date of entry.
        entry: NaiveDate,
        /// The aircraft's date of manufacture.
        manufacture: NaiveDate,
    },

    /// A monetary amount was negative or not a finite number.
    #[error("{field} must be a non-negative amount, got {value}")]
    NegativeAmount {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// An operating lease was added without its lease terms.
    #[error("an operating lease requires a {field}")]
    MissingLeaseTerm {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A removal count of zero was requested.
    #[error("number of aircraft to remove must be at least 1")]
    InvalidRemovalCount,

    /// More aircraft were requested for removal than are currently active.
    #[error("cannot remove {requested} aircraft: only {active} currently active")]
    InsufficientActiveFleet {
        /// Number of aircraft requested for removal.
        requested: usize,
        /// Number of currently active aircraft.
        active: usize,
    },

    /// A record that already left the fleet was asked to leave again.
    #[error("record {id} is not active")]
    RecordNotActive {
        /// Identity of the record.
        id: RecordId,
    },

    // === Storage Errors ===
    /// Failed to open the session database.
    #[error("failed to open fleet store at {path}: {source}")]
    DatabaseOpen {
        /// Path of the database (`:memory:` for session stores).
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// A stored row could not be turned back into a record.
    #[error("corrupt fleet row {id}: {message}")]
    CorruptRow {
        /// Row identity.
        id: i64,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for fleetdash operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a corrupt row error.
    #[must_use]
    pub fn corrupt_row(id: i64, message: impl Into<String>) -> Self {
        Self::CorruptRow {
            id,
            message: message.into(),
        }
    }

    /// Check if this error is a rejected fleet request rather than a failure.
    ///
    /// Rejections never change the fleet, so callers can report them and carry on.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateOrder { .. }
                | Self::NegativeAmount { .. }
                | Self::MissingLeaseTerm { .. }
                | Self::InvalidRemovalCount
                | Self::InsufficientActiveFleet { .. }
                | Self::RecordNotActive { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_invalid_date_order_display() {
        let err = Error::InvalidDateOrder {
            entry: date(2019, 1, 1),
            manufacture: date(2020, 1, 1),
        };
        let msg = err.to_string();
        assert!(msg.contains("2019-01-01"));
        assert!(msg.contains("2020-01-01"));
        assert!(msg.contains("cannot be earlier"));
    }

    #[test]
    fn test_insufficient_active_fleet_display() {
        let err = Error::InsufficientActiveFleet {
            requested: 5,
            active: 3,
        };
        assert_eq!(
            err.to_string(),
            "cannot remove 5 aircraft: only 3 currently active"
        );
    }

    #[test]
    fn test_negative_amount_display() {
        let err = Error::NegativeAmount {
            field: "market value",
            value: -1.5,
        };
        assert_eq!(
            err.to_string(),
            "market value must be a non-negative amount, got -1.5"
        );
    }

    #[test]
    fn test_record_not_active_display() {
        let err = Error::RecordNotActive { id: RecordId(7) };
        assert_eq!(err.to_string(), "record #7 is not active");
    }

    #[test]
    fn test_is_rejection() {
        assert!(Error::InvalidRemovalCount.is_rejection());
        assert!(Error::MissingLeaseTerm {
            field: "lease end date"
        }
        .is_rejection());
        assert!(Error::InsufficientActiveFleet {
            requested: 2,
            active: 1
        }
        .is_rejection());
        assert!(!Error::internal("boom").is_rejection());
        assert!(!Error::ConfigValidation {
            message: "x".to_string()
        }
        .is_rejection());
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_corrupt_row_display() {
        let err = Error::corrupt_row(3, "bad lease type 'XYZ'");
        let msg = err.to_string();
        assert!(msg.contains("row 3"));
        assert!(msg.contains("XYZ"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_csv_error() {
        let csv_err = csv::Error::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        let err: Error = csv_err.into();
        assert!(matches!(err, Error::Csv(_)));
        assert!(err.to_string().starts_with("CSV error"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "year_count must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("year_count"));
    }
}
