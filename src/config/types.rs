//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the built-in
//! defaults used when no configuration directory is given.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{Bracket, BracketTable};
use crate::error::EngineResult;

/// Whether net pay may go below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetPayPolicy {
    /// Net pay is reported as computed, even when negative.
    #[default]
    Unclamped,
    /// Negative net pay is reported as zero.
    FloorAtZero,
}

/// Time-keeping and pay rules applied to attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPolicy {
    /// Latest punch-in that is not counted as tardy.
    pub grace_time: NaiveTime,
    /// Unpaid lunch break subtracted from every attendance record, in hours.
    pub lunch_break_hours: Decimal,
    /// Worked hours per day counted as regular; the rest is overtime.
    pub standard_shift_hours: Decimal,
    /// Multiplier applied to the hourly rate for overtime hours.
    pub overtime_multiplier: Decimal,
    /// Treatment of negative net pay.
    #[serde(default)]
    pub net_pay: NetPayPolicy,
}

impl Default for PayPolicy {
    fn default() -> Self {
        Self {
            grace_time: NaiveTime::from_hms_opt(8, 10, 0).unwrap_or(NaiveTime::MIN),
            lunch_break_hours: Decimal::ONE,
            standard_shift_hours: Decimal::new(8, 0),
            overtime_multiplier: Decimal::new(125, 2),
            net_pay: NetPayPolicy::Unclamped,
        }
    }
}

/// PhilHealth premium table and the share of it paid by the employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhilHealthConfig {
    /// Monthly premium by basic salary.
    pub premium: BracketTable,
    /// Fraction of the premium deducted from the employee.
    pub employee_share: Decimal,
}

/// The four deduction tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionTables {
    /// SSS contribution by basic salary.
    pub sss: BracketTable,
    /// PhilHealth premium by basic salary.
    pub philhealth: PhilHealthConfig,
    /// Pag-IBIG contribution by basic salary.
    pub pagibig: BracketTable,
    /// Withholding tax by taxable income.
    pub withholding_tax: BracketTable,
}

impl ContributionTables {
    /// Validates every table, naming the first invalid one.
    pub fn validate(&self) -> EngineResult<()> {
        self.sss.validate("sss")?;
        self.philhealth.premium.validate("philhealth")?;
        self.pagibig.validate("pagibig")?;
        self.withholding_tax.validate("withholding_tax")
    }

    /// Returns a copy whose tax table includes the 35% bracket above 666,667.
    pub fn with_top_tax_bracket(&self) -> EngineResult<Self> {
        Ok(Self {
            withholding_tax: self
                .withholding_tax
                .with_top_bracket("withholding_tax", top_tax_bracket())?,
            ..self.clone()
        })
    }
}

impl Default for ContributionTables {
    fn default() -> Self {
        Self {
            sss: default_sss_table(),
            philhealth: PhilHealthConfig {
                premium: default_philhealth_premium(),
                employee_share: Decimal::new(5, 1),
            },
            pagibig: default_pagibig_table(),
            withholding_tax: default_withholding_tax_table(),
        }
    }
}

/// The complete payroll configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollConfig {
    /// Time-keeping and pay rules.
    pub policy: PayPolicy,
    /// Deduction tables.
    pub contributions: ContributionTables,
}

/// SSS: 135.00 below 3,250, then 22.50 more for every 500 up to 1,125.00 from 24,750.
fn default_sss_table() -> BracketTable {
    let mut brackets = vec![Bracket::fixed(Decimal::ZERO, Decimal::new(13500, 2))];
    for step in 0..44i64 {
        brackets.push(Bracket::fixed(
            Decimal::new(3250 + 500 * step, 0),
            Decimal::new(13500 + 2250 * (step + 1), 2),
        ));
    }
    BracketTable::from_sorted(brackets)
}

/// PhilHealth: 3% premium on salaries between 10,000 and 60,000.
fn default_philhealth_premium() -> BracketTable {
    BracketTable::from_sorted(vec![
        Bracket::fixed(Decimal::ZERO, Decimal::new(30000, 2)),
        Bracket::rate(Decimal::new(10000, 0), Decimal::new(3, 2)),
        Bracket::fixed(Decimal::new(60000, 0), Decimal::new(180000, 2)),
    ])
}

/// Pag-IBIG: 2% of salary, with the base capped at 5,000.
fn default_pagibig_table() -> BracketTable {
    BracketTable::from_sorted(vec![
        Bracket::rate(Decimal::ZERO, Decimal::new(2, 2)),
        Bracket::fixed(Decimal::new(5000, 0), Decimal::new(10000, 2)),
    ])
}

fn default_withholding_tax_table() -> BracketTable {
    BracketTable::from_sorted(vec![
        Bracket::fixed(Decimal::ZERO, Decimal::ZERO),
        Bracket::progressive(Decimal::new(20833, 0), Decimal::ZERO, Decimal::new(20, 2)),
        Bracket::progressive(
            Decimal::new(33333, 0),
            Decimal::new(2500, 0),
            Decimal::new(25, 2),
        ),
        Bracket::progressive(
            Decimal::new(66667, 0),
            Decimal::new(1083333, 2),
            Decimal::new(30, 2),
        ),
        Bracket::progressive(
            Decimal::new(166667, 0),
            Decimal::new(4083333, 2),
            Decimal::new(32, 2),
        ),
    ])
}

/// The optional 35% withholding bracket above 666,667.
pub fn top_tax_bracket() -> Bracket {
    Bracket::progressive(
        Decimal::new(666667, 0),
        Decimal::new(20083333, 2),
        Decimal::new(35, 2),
    )
}
