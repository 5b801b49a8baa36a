//! User account model.
//!
//! Accounts gate access to the payroll system. An account with the
//! `Employee` role is linked to an employee record by id.

use std::fmt;
use std::str::FromStr;

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::store::{Record, column, expect_columns, parse_column};

/// The closed set of account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// A rank-and-file employee; must be linked to an employee record.
    Employee,
    /// A manager.
    Manager,
    /// Human resources.
    #[serde(rename = "HR")]
    Hr,
    /// IT administrator.
    #[serde(rename = "IT Admin")]
    ItAdmin,
}

impl Role {
    /// The label written to the user file.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::Manager => "Manager",
            Role::Hr => "HR",
            Role::ItAdmin => "IT Admin",
        }
    }

    /// Returns true for roles allowed to create and edit accounts.
    pub fn manages_accounts(&self) -> bool {
        matches!(self, Role::Hr | Role::ItAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "manager" => Ok(Role::Manager),
            "hr" => Ok(Role::Hr),
            "it admin" | "it_admin" => Ok(Role::ItAdmin),
            other => Err(EngineError::validation(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// A payroll system account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name, unique ignoring case.
    pub username: String,
    /// Plaintext password. Empty for accounts that have not been activated.
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Account role.
    pub role: Role,
    /// Given name shown in the UI.
    pub first_name: String,
    /// Family name shown in the UI.
    #[serde(default)]
    pub last_name: String,
    /// Linked employee id; 0 when the account is not an employee's.
    #[serde(default)]
    pub employee_id: u32,
}

impl User {
    /// Returns the name shown for this account.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Returns the lowercased username used for uniqueness and login.
    pub fn normalized_username(&self) -> String {
        self.username.trim().to_lowercase()
    }

    /// Trims the username and names. The password is kept exactly as given.
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            ..self
        }
    }

    /// Returns true for accounts created without a password, which cannot log in.
    pub fn is_pending(&self) -> bool {
        self.password.is_empty()
    }

    /// Checks the username and the employee link required by the role.
    pub fn validate(&self) -> EngineResult<()> {
        if self.username.trim().is_empty() {
            return Err(EngineError::validation("username", "must not be empty"));
        }
        if self.role == Role::Employee && self.employee_id == 0 {
            return Err(EngineError::validation(
                "employee_id",
                "an Employee account must be linked to an employee",
            ));
        }
        Ok(())
    }
}

impl Record for User {
    type Key = String;

    const ENTITY: &'static str = "user";

    const HEADER: &'static [&'static str] = &[
        "Username",
        "Password",
        "Role",
        "FirstName",
        "Last Name",
        "EmployeeId",
    ];

    fn key(&self) -> String {
        self.normalized_username()
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.password.clone(),
            self.role.label().to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.employee_id.to_string(),
        ]
    }

    fn from_row(row: &StringRecord) -> EngineResult<Self> {
        expect_columns(row, Self::ENTITY, Self::HEADER.len())?;
        let user = User {
            username: column(row, 0, "username")?.to_string(),
            password: column(row, 1, "password")?.to_string(),
            role: parse_column(row, 2, "role")?,
            first_name: column(row, 3, "first_name")?.to_string(),
            last_name: column(row, 4, "last_name")?.to_string(),
            employee_id: parse_column(row, 5, "employee_id")?,
        };
        user.validate()?;
        Ok(user)
    }
}

/// A partial edit of an account; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserUpdate {
    /// New login name.
    pub username: Option<String>,
    /// New password.
    pub password: Option<String>,
    /// New role.
    pub role: Option<Role>,
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
}

impl UserUpdate {
    /// Drops blank strings, which callers use to mean "keep the current value".
    ///
    /// Text fields are trimmed; a non-blank password is kept as given.
    pub fn normalized(self) -> Self {
        let keep = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            username: keep(self.username),
            password: self.password.filter(|p| !p.trim().is_empty()),
            role: self.role,
            first_name: keep(self.first_name),
            last_name: keep(self.last_name),
        }
    }

    /// Returns true if applying this update changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrites the fields that are `Some`.
    pub fn apply(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(password) = &self.password {
            user.password = password.clone();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.clone();
        }
    }
}
