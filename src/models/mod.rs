//! Core data models for the payroll engine.
//!
//! This module contains the persisted records (employees, attendance,
//! users) and the derived pay period and payslip types.

mod attendance;
mod employee;
mod pay_period;
mod payslip;
mod user;

pub use attendance::{
    AttendanceKey, AttendanceRecord, DATE_FORMAT, TIME_FORMAT, format_date, format_time,
    is_whole_minute, parse_date, parse_time, truncate_to_minute,
};
pub use employee::{Employee, EmployeeUpdate, GovernmentIds};
pub use pay_period::PayPeriod;
pub use payslip::{AuditStep, ContributionBreakdown, HoursSummary, Payslip};
pub use user::{Role, User, UserUpdate};
