//! Employee model and the partial update applied by edits.
//!
//! This module defines the [`Employee`] record persisted in the employee
//! store and the [`EmployeeUpdate`] used to change some of its fields.

use csv::StringRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::store::{Record, column, expect_columns, parse_column};

/// Government-issued identifiers carried on the employee record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernmentIds {
    /// Social Security System number.
    #[serde(default)]
    pub sss: String,
    /// PhilHealth number.
    #[serde(default)]
    pub philhealth: String,
    /// Tax identification number.
    #[serde(default)]
    pub tin: String,
    /// Pag-IBIG (HDMF) number.
    #[serde(default)]
    pub pagibig: String,
}

/// Represents an employee on the payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique, positive employee number.
    pub id: u32,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Birthday as entered (MM/dd/yyyy by convention, not validated).
    pub birthday: String,
    /// Job title.
    pub position: String,
    /// Pay per hour worked.
    pub hourly_rate: Decimal,
    /// Basic monthly salary; statutory contributions are based on it.
    pub monthly_salary: Decimal,
    /// Government identifiers.
    #[serde(default)]
    pub government_ids: GovernmentIds,
}

impl Employee {
    /// Returns "First Last".
    ///
    /// # Examples
    ///
    /// ```
    /// use motorph_payroll::models::{Employee, GovernmentIds};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: 10001,
    ///     first_name: "Manuel".to_string(),
    ///     last_name: "Garcia".to_string(),
    ///     birthday: "10/11/1983".to_string(),
    ///     position: "Chief Executive Officer".to_string(),
    ///     hourly_rate: Decimal::new(53571, 2),
    ///     monthly_salary: Decimal::new(90000, 0),
    ///     government_ids: GovernmentIds::default(),
    /// };
    /// assert_eq!(employee.display_name(), "Manuel Garcia");
    /// ```
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Trims surrounding whitespace from every text field.
    ///
    /// Applied before an employee is stored, so the employee file holds the
    /// same text as memory.
    pub fn normalized(self) -> Self {
        let trim = |value: String| value.trim().to_string();
        Self {
            first_name: trim(self.first_name),
            last_name: trim(self.last_name),
            birthday: trim(self.birthday),
            position: trim(self.position),
            government_ids: GovernmentIds {
                sss: trim(self.government_ids.sss),
                philhealth: trim(self.government_ids.philhealth),
                tin: trim(self.government_ids.tin),
                pagibig: trim(self.government_ids.pagibig),
            },
            ..self
        }
    }

    /// Checks the invariants every stored employee must satisfy.
    pub fn validate(&self) -> EngineResult<()> {
        if self.id == 0 {
            return Err(EngineError::validation("id", "must be a positive integer"));
        }
        if self.hourly_rate < Decimal::ZERO {
            return Err(EngineError::validation("hourly_rate", "must not be negative"));
        }
        if self.monthly_salary < Decimal::ZERO {
            return Err(EngineError::validation(
                "monthly_salary",
                "must not be negative",
            ));
        }
        Ok(())
    }

    /// Multi-line profile used on payslips and the profile view.
    pub fn profile(&self) -> String {
        format!(
            "Employee ID: {}\nName: {}\nBirthday: {}\nPosition: {}\n\
             Hourly Rate: P{:.2}\nMonthly Salary: P{:.2}\n\
             SSS No: {}\nPhilHealth No: {}\nTIN: {}\nPag-IBIG No: {}\n",
            self.id,
            self.display_name(),
            self.birthday,
            self.position,
            self.hourly_rate,
            self.monthly_salary,
            self.government_ids.sss,
            self.government_ids.philhealth,
            self.government_ids.tin,
            self.government_ids.pagibig,
        )
    }
}

impl Record for Employee {
    type Key = u32;

    const ENTITY: &'static str = "employee";

    const HEADER: &'static [&'static str] = &[
        "Employee #",
        "First Name",
        "Last Name",
        "Birthday",
        "Position",
        "Hourly Rate",
        "Basic Salary",
        "SSS #",
        "Philhealth #",
        "TIN #",
        "Pag-ibig #",
    ];

    fn key(&self) -> u32 {
        self.id
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.birthday.clone(),
            self.position.clone(),
            self.hourly_rate.to_string(),
            self.monthly_salary.to_string(),
            self.government_ids.sss.clone(),
            self.government_ids.philhealth.clone(),
            self.government_ids.tin.clone(),
            self.government_ids.pagibig.clone(),
        ]
    }

    fn from_row(row: &StringRecord) -> EngineResult<Self> {
        expect_columns(row, Self::ENTITY, Self::HEADER.len())?;
        let employee = Employee {
            id: parse_column(row, 0, "id")?,
            first_name: column(row, 1, "first_name")?.to_string(),
            last_name: column(row, 2, "last_name")?.to_string(),
            birthday: column(row, 3, "birthday")?.to_string(),
            position: column(row, 4, "position")?.to_string(),
            hourly_rate: parse_column(row, 5, "hourly_rate")?,
            monthly_salary: parse_column(row, 6, "monthly_salary")?,
            government_ids: GovernmentIds {
                sss: column(row, 7, "sss_no")?.to_string(),
                philhealth: column(row, 8, "philhealth_no")?.to_string(),
                tin: column(row, 9, "tin")?.to_string(),
                pagibig: column(row, 10, "pagibig_no")?.to_string(),
            },
        };
        employee.validate()?;
        Ok(employee)
    }
}

/// A partial edit of an employee; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeUpdate {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New birthday.
    pub birthday: Option<String>,
    /// New job title.
    pub position: Option<String>,
    /// New hourly rate.
    pub hourly_rate: Option<Decimal>,
    /// New monthly salary.
    pub monthly_salary: Option<Decimal>,
    /// New SSS number.
    pub sss: Option<String>,
    /// New PhilHealth number.
    pub philhealth: Option<String>,
    /// New TIN.
    pub tin: Option<String>,
    /// New Pag-IBIG number.
    pub pagibig: Option<String>,
}

fn keep_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn keep_amount(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v >= Decimal::ZERO)
}

impl EmployeeUpdate {
    /// Drops blank strings and negative amounts, which callers use to mean
    /// "keep the current value".
    ///
    /// # Examples
    ///
    /// ```
    /// use motorph_payroll::models::EmployeeUpdate;
    /// use rust_decimal::Decimal;
    ///
    /// let update = EmployeeUpdate {
    ///     first_name: Some("   ".to_string()),
    ///     hourly_rate: Some(Decimal::NEGATIVE_ONE),
    ///     ..Default::default()
    /// }
    /// .normalized();
    /// assert!(update.is_empty());
    /// ```
    pub fn normalized(self) -> Self {
        Self {
            first_name: keep_text(self.first_name),
            last_name: keep_text(self.last_name),
            birthday: keep_text(self.birthday),
            position: keep_text(self.position),
            hourly_rate: keep_amount(self.hourly_rate),
            monthly_salary: keep_amount(self.monthly_salary),
            sss: keep_text(self.sss),
            philhealth: keep_text(self.philhealth),
            tin: keep_text(self.tin),
            pagibig: keep_text(self.pagibig),
        }
    }

    /// Returns true if applying this update changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrites the fields that are `Some`.
    pub fn apply(&self, employee: &mut Employee) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut employee.first_name, &self.first_name);
        set(&mut employee.last_name, &self.last_name);
        set(&mut employee.birthday, &self.birthday);
        set(&mut employee.position, &self.position);
        set(&mut employee.hourly_rate, &self.hourly_rate);
        set(&mut employee.monthly_salary, &self.monthly_salary);
        set(&mut employee.government_ids.sss, &self.sss);
        set(&mut employee.government_ids.philhealth, &self.philhealth);
        set(&mut employee.government_ids.tin, &self.tin);
        set(&mut employee.government_ids.pagibig, &self.pagibig);
    }
}
