//! Request types for the payroll API.
//!
//! This module defines the JSON bodies and query strings accepted by the
//! handlers and their conversion into domain types.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{parse_time, truncate_to_minute, Employee, GovernmentIds, Role, User};

/// Request body for `POST /employees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Unique, positive employee number.
    pub id: u32,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Birthday, MM/dd/yyyy by convention.
    #[serde(default)]
    pub birthday: String,
    /// Job title.
    #[serde(default)]
    pub position: String,
    /// Pay per hour worked.
    pub hourly_rate: Decimal,
    /// Basic monthly salary.
    pub monthly_salary: Decimal,
    /// Government identifiers.
    #[serde(default)]
    pub government_ids: GovernmentIds,
}

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee {
            id: req.id,
            first_name: req.first_name,
            last_name: req.last_name,
            birthday: req.birthday,
            position: req.position,
            hourly_rate: req.hourly_rate,
            monthly_salary: req.monthly_salary,
            government_ids: req.government_ids,
        }
        .normalized()
    }
}

/// Request body for `POST /attendance`.
///
/// Times may be given as `h:mm AM/PM` or as 24-hour `HH:MM[:SS]`; seconds
/// are dropped, since punches are recorded to the minute.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRequest {
    /// The employee who worked.
    pub employee_id: u32,
    /// The day worked.
    pub date: NaiveDate,
    /// Punch-in time.
    #[serde(deserialize_with = "deserialize_punch_time")]
    pub time_in: NaiveTime,
    /// Punch-out time.
    #[serde(deserialize_with = "deserialize_punch_time")]
    pub time_out: NaiveTime,
}

fn deserialize_punch_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_time(&raw)
        .or_else(|_| NaiveTime::from_str(raw.trim()))
        .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M"))
        .map(truncate_to_minute)
        .map_err(|_| serde::de::Error::custom(format!("invalid punch time '{}'", raw)))
}

/// Query string selecting an inclusive date range.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PeriodQuery {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Login name, matched ignoring case.
    pub username: String,
    /// Password, matched exactly.
    pub password: String,
}

/// Request body for `POST /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRequest {
    /// Login name.
    pub username: String,
    /// Password; may be empty to create a pending account.
    #[serde(default)]
    pub password: String,
    /// Account role.
    pub role: Role,
    /// Given name.
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Linked employee; required for the `Employee` role.
    #[serde(default)]
    pub employee_id: u32,
}

impl From<UserRequest> for User {
    fn from(req: UserRequest) -> Self {
        User {
            username: req.username,
            password: req.password,
            role: req.role,
            first_name: req.first_name,
            last_name: req.last_name,
            employee_id: req.employee_id,
        }
        .normalized()
    }
}

/// Response body for `POST /users/sync`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Number of pending accounts created.
    pub created: usize,
}
