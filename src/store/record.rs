//! The row codec every persisted record implements.

use std::fmt;
use std::str::FromStr;

use csv::StringRecord;

use crate::error::{EngineError, EngineResult};

/// A value that can be stored as one row of a delimited flat file.
///
/// `HEADER` is written as the first row of the file. `key` identifies a
/// record for the uniqueness check on append and for update/delete.
pub trait Record: Clone + Send + 'static {
    /// The uniqueness key of the record.
    type Key: PartialEq + Clone + fmt::Display;

    /// Human-readable entity name used in errors and logs.
    const ENTITY: &'static str;

    /// Column names of the header row.
    const HEADER: &'static [&'static str];

    /// Returns the key of this record.
    fn key(&self) -> Self::Key;

    /// Serializes the record into one row, one string per header column.
    fn to_row(&self) -> Vec<String>;

    /// Parses a row written by [`Record::to_row`].
    fn from_row(row: &StringRecord) -> EngineResult<Self>;
}

/// Fails unless the row has exactly `expected` columns.
pub fn expect_columns(row: &StringRecord, entity: &str, expected: usize) -> EngineResult<()> {
    if row.len() != expected {
        return Err(EngineError::validation(
            entity,
            format!("expected {} columns, found {}", expected, row.len()),
        ));
    }
    Ok(())
}

/// Returns column `index` exactly as stored.
///
/// Text is not trimmed here; records normalize their text before it is
/// written, so what is read back is what was kept in memory.
pub fn column<'r>(row: &'r StringRecord, index: usize, name: &str) -> EngineResult<&'r str> {
    row.get(index)
        .ok_or_else(|| EngineError::validation(name, "column is missing"))
}

/// Parses column `index` with `FromStr`, naming the column on failure.
pub fn parse_column<T>(row: &StringRecord, index: usize, name: &str) -> EngineResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = column(row, index, name)?;
    raw.trim()
        .parse::<T>()
        .map_err(|e| EngineError::validation(name, format!("'{}': {}", raw, e)))
}
