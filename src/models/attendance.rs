//! Attendance record model and the punch formats used in the attendance file.
//!
//! Dates are stored as `MM/dd/yyyy` and punch times as `h:mm AM/PM`.

use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::store::{Record, column, expect_columns, parse_column};

/// Date format used in the attendance file.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Time format used when writing punches (`9:05 AM`).
pub const TIME_FORMAT: &str = "%-I:%M %p";

/// Parses an `MM/dd/yyyy` date.
///
/// # Examples
///
/// ```
/// use motorph_payroll::models::parse_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(
///     parse_date("06/03/2024").unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
/// );
/// assert!(parse_date("2024-06-03").is_err());
/// ```
pub fn parse_date(raw: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| {
        EngineError::validation("date", format!("'{}' is not MM/dd/yyyy: {}", raw, e))
    })
}

/// Parses an `h:mm AM/PM` punch time, case-insensitively.
///
/// # Examples
///
/// ```
/// use motorph_payroll::models::parse_time;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_time("9:05 am").unwrap(), NaiveTime::from_hms_opt(9, 5, 0).unwrap());
/// assert_eq!(parse_time("12:30 PM").unwrap(), NaiveTime::from_hms_opt(12, 30, 0).unwrap());
/// ```
pub fn parse_time(raw: &str) -> EngineResult<NaiveTime> {
    let normalized = raw.trim().to_uppercase();
    NaiveTime::parse_from_str(&normalized, "%I:%M %p").map_err(|e| {
        EngineError::validation("time", format!("'{}' is not h:mm AM/PM: {}", raw, e))
    })
}

/// Returns true if `time` has no seconds or fraction of a second.
pub fn is_whole_minute(time: NaiveTime) -> bool {
    time.second() == 0 && time.nanosecond() == 0
}

/// Drops the seconds and fraction of a second from `time`.
///
/// # Examples
///
/// ```
/// use motorph_payroll::models::truncate_to_minute;
/// use chrono::NaiveTime;
///
/// let punch = NaiveTime::from_hms_milli_opt(9, 0, 59, 500).unwrap();
/// assert_eq!(truncate_to_minute(punch), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
/// ```
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Formats a date as `MM/dd/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats a punch time as `h:mm AM/PM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Uniqueness key of an attendance record: one record per employee per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttendanceKey {
    /// The employee the record belongs to.
    pub employee_id: u32,
    /// The day worked.
    pub date: NaiveDate,
}

impl fmt::Display for AttendanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.employee_id, self.date)
    }
}

/// One day's punches for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee who punched in.
    pub employee_id: u32,
    /// Family name, copied from the employee at insert time.
    pub last_name: String,
    /// Given name, copied from the employee at insert time.
    pub first_name: String,
    /// The day worked.
    pub date: NaiveDate,
    /// Punch-in time.
    pub time_in: NaiveTime,
    /// Punch-out time; not before `time_in`.
    pub time_out: NaiveTime,
}

impl AttendanceRecord {
    /// Returns the whole minutes between punch-in and punch-out.
    ///
    /// A punch-out before the punch-in yields zero.
    pub fn minutes_worked(&self) -> i64 {
        if self.time_out < self.time_in {
            return 0;
        }
        (self.time_out - self.time_in).num_minutes()
    }

    /// Returns the uniqueness key of this record.
    pub fn attendance_key(&self) -> AttendanceKey {
        AttendanceKey {
            employee_id: self.employee_id,
            date: self.date,
        }
    }

    /// Checks that the record names an employee, that its punches are whole
    /// minutes (the attendance file has no seconds) and that they are ordered.
    pub fn validate(&self) -> EngineResult<()> {
        if self.employee_id == 0 {
            return Err(EngineError::validation(
                "employee_id",
                "must be a positive integer",
            ));
        }
        for (field, time) in [("time_in", self.time_in), ("time_out", self.time_out)] {
            if !is_whole_minute(time) {
                return Err(EngineError::validation(
                    field,
                    format!("{} has seconds; punches are recorded to the minute", time),
                ));
            }
        }
        if self.time_out < self.time_in {
            return Err(EngineError::validation(
                "time_out",
                format!(
                    "{} is before time_in {}",
                    format_time(self.time_out),
                    format_time(self.time_in)
                ),
            ));
        }
        Ok(())
    }
}

impl Record for AttendanceRecord {
    type Key = AttendanceKey;

    const ENTITY: &'static str = "attendance";

    const HEADER: &'static [&'static str] = &[
        "Employee #",
        "Last Name",
        "First Name",
        "Date",
        "Log In",
        "Log Out",
    ];

    fn key(&self) -> AttendanceKey {
        self.attendance_key()
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.employee_id.to_string(),
            self.last_name.clone(),
            self.first_name.clone(),
            format_date(self.date),
            format_time(self.time_in),
            format_time(self.time_out),
        ]
    }

    fn from_row(row: &StringRecord) -> EngineResult<Self> {
        expect_columns(row, Self::ENTITY, Self::HEADER.len())?;
        let record = AttendanceRecord {
            employee_id: parse_column(row, 0, "employee_id")?,
            last_name: column(row, 1, "last_name")?.to_string(),
            first_name: column(row, 2, "first_name")?.to_string(),
            date: parse_date(column(row, 3, "date")?)?,
            time_in: parse_time(column(row, 4, "time_in")?)?,
            time_out: parse_time(column(row, 5, "time_out")?)?,
        };
        record.validate()?;
        Ok(record)
    }
}
