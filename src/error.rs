//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the record stores, directories and payroll engine can
//! report.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All fallible operations return this error type, so callers can handle
/// failures from the stores and from the calculation in one place.
///
/// # Example
///
/// ```
/// use motorph_payroll::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "employee".to_string(),
///     key: "10001".to_string(),
/// };
/// assert_eq!(error.to_string(), "employee not found: 10001");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A contribution bracket table is empty, unordered or has negative values.
    #[error("Invalid bracket table '{table}': {message}")]
    InvalidBracketTable {
        /// The name of the table (e.g. "sss").
        table: String,
        /// What is wrong with it.
        message: String,
    },

    /// A value supplied at the boundary was malformed or out of range.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A record with the same key already exists.
    #[error("{entity} already exists: {key}")]
    DuplicateKey {
        /// The kind of record ("employee", "user", "attendance").
        entity: String,
        /// The conflicting key.
        key: String,
    },

    /// No record exists for the given key.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: String,
        /// The key that was not found.
        key: String,
    },

    /// A payslip was requested for a period with no attendance.
    #[error("No attendance for employee {employee_id} between {start_date} and {end_date}")]
    NoData {
        /// The employee the payslip was requested for.
        employee_id: u32,
        /// First day of the requested period.
        start_date: NaiveDate,
        /// Last day of the requested period.
        end_date: NaiveDate,
    },

    /// Writing, deleting or renaming a store file failed.
    #[error("Failed to {operation} '{path}': {message}")]
    Persistence {
        /// The file the operation was acting on.
        path: String,
        /// The step that failed ("write temp file", "delete", "rename", "read").
        operation: String,
        /// The underlying I/O or encoding error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::NotFound`] error.
    pub fn not_found(entity: impl Into<String>, key: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    /// Shorthand for a [`EngineError::DuplicateKey`] error.
    pub fn duplicate(entity: impl Into<String>, key: impl ToString) -> Self {
        Self::DuplicateKey {
            entity: entity.into(),
            key: key.to_string(),
        }
    }
}
