//! Attendance aggregation.
//!
//! Turns a period's attendance records into regular, overtime and tardiness
//! hours. Sums are kept in minutes and converted to hours once at the end,
//! so the result does not depend on record order.

use rust_decimal::Decimal;

use crate::config::PayPolicy;
use crate::models::{AttendanceRecord, HoursSummary};

const MINUTES_PER_HOUR: i64 = 60;

/// Aggregates attendance records into an [`HoursSummary`].
///
/// For each record:
/// - worked time is the punch span less the lunch break, never below zero
/// - worked time up to the standard shift is regular, the rest is overtime
/// - every whole minute punched in after the grace time is tardiness
///
/// The records are expected to belong to one employee and one pay period.
/// An empty slice yields an all-zero summary.
///
/// # Examples
///
/// ```
/// use motorph_payroll::calculation::aggregate_attendance;
/// use motorph_payroll::config::PayPolicy;
/// use motorph_payroll::models::AttendanceRecord;
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let record = AttendanceRecord {
///     employee_id: 10001,
///     last_name: "Garcia".to_string(),
///     first_name: "Manuel".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     time_in: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///     time_out: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
/// };
///
/// let hours = aggregate_attendance(&[record], &PayPolicy::default());
/// assert_eq!(hours.regular_hours, Decimal::new(8, 0));
/// assert_eq!(hours.overtime_hours, Decimal::ZERO);
/// assert_eq!(hours.days_worked, 1);
/// ```
pub fn aggregate_attendance(records: &[AttendanceRecord], policy: &PayPolicy) -> HoursSummary {
    let lunch_minutes = policy.lunch_break_hours * Decimal::from(MINUTES_PER_HOUR);
    let shift_minutes = policy.standard_shift_hours * Decimal::from(MINUTES_PER_HOUR);

    let mut regular_minutes = Decimal::ZERO;
    let mut overtime_minutes = Decimal::ZERO;
    let mut tardy_minutes: i64 = 0;

    for record in records {
        let raw = Decimal::from(record.minutes_worked());
        let worked = (raw - lunch_minutes).max(Decimal::ZERO);

        regular_minutes += worked.min(shift_minutes);
        overtime_minutes += (worked - shift_minutes).max(Decimal::ZERO);
        tardy_minutes += record
            .time_in
            .signed_duration_since(policy.grace_time)
            .num_minutes()
            .max(0);
    }

    let to_hours = |minutes: Decimal| minutes / Decimal::from(MINUTES_PER_HOUR);

    HoursSummary {
        regular_hours: to_hours(regular_minutes),
        overtime_hours: to_hours(overtime_minutes),
        tardiness_hours: to_hours(Decimal::from(tardy_minutes)),
        days_worked: u32::try_from(records.len()).unwrap_or(u32::MAX),
    }
}
