//! Payslip models for the payroll engine.
//!
//! This module contains the [`Payslip`] type and its associated structures
//! that capture all outputs from a pay computation: aggregated hours,
//! statutory contributions, totals, and the calculation trace.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::attendance::format_date;
use super::PayPeriod;

/// Hours aggregated from a period's attendance.
///
/// # Example
///
/// ```
/// use motorph_payroll::models::HoursSummary;
/// use rust_decimal::Decimal;
///
/// let hours = HoursSummary {
///     regular_hours: Decimal::new(8, 0),
///     overtime_hours: Decimal::ZERO,
///     tardiness_hours: Decimal::ZERO,
///     days_worked: 1,
/// };
/// assert!(!hours.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursSummary {
    /// Worked hours up to the standard shift length, summed over the period.
    pub regular_hours: Decimal,
    /// Worked hours beyond the standard shift length, summed over the period.
    pub overtime_hours: Decimal,
    /// Hours of lateness past the grace time, summed over the period.
    pub tardiness_hours: Decimal,
    /// Number of attendance records aggregated.
    pub days_worked: u32,
}

impl HoursSummary {
    /// Returns true if no attendance was aggregated.
    pub fn is_empty(&self) -> bool {
        self.days_worked == 0
    }
}

/// The four statutory deductions on a payslip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBreakdown {
    /// Social Security System contribution.
    pub sss: Decimal,
    /// PhilHealth employee share.
    pub philhealth: Decimal,
    /// Pag-IBIG contribution.
    pub pagibig: Decimal,
    /// Withholding tax on taxable income.
    pub withholding_tax: Decimal,
}

impl ContributionBreakdown {
    /// Sum of the three contributions taken before tax.
    pub fn pre_tax_total(&self) -> Decimal {
        self.sss + self.philhealth + self.pagibig
    }
}

/// A single step in the calculation trace.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete result of a payslip computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// The employee paid.
    pub employee_id: u32,
    /// "First Last" of the employee.
    pub employee_name: String,
    /// The employee's position.
    pub position: String,
    /// The period covered.
    pub pay_period: PayPeriod,
    /// Hourly rate used for gross pay and tardiness.
    pub hourly_rate: Decimal,
    /// Basic monthly salary used for the contributions.
    pub monthly_salary: Decimal,
    /// Aggregated hours.
    pub hours: HoursSummary,
    /// Regular plus overtime pay.
    pub gross_pay: Decimal,
    /// Tardiness hours valued at the hourly rate.
    pub tardiness_deduction: Decimal,
    /// Statutory deductions.
    pub contributions: ContributionBreakdown,
    /// Gross pay less contributions and tardiness; the tax base.
    pub taxable_income: Decimal,
    /// Contributions, tax and tardiness.
    pub total_deductions: Decimal,
    /// Gross pay less total deductions.
    pub net_pay: Decimal,
    /// Every rule applied, in order.
    pub audit_trace: Vec<AuditStep>,
}

impl fmt::Display for Payslip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = |h: Decimal| h.round_dp(2);

        writeln!(f, "MotorPH Payslip")?;
        writeln!(f, "Employee: {} (#{})", self.employee_name, self.employee_id)?;
        writeln!(f, "Position: {}", self.position)?;
        writeln!(
            f,
            "Pay Period: {} - {}",
            format_date(self.pay_period.start_date),
            format_date(self.pay_period.end_date)
        )?;
        writeln!(f, "Days Worked: {}", self.hours.days_worked)?;
        writeln!(f, "Regular Hours: {:.2}", hours(self.hours.regular_hours))?;
        writeln!(f, "Overtime Hours: {:.2}", hours(self.hours.overtime_hours))?;
        writeln!(f, "Tardiness Hours: {:.2}", hours(self.hours.tardiness_hours))?;
        writeln!(f, "Hourly Rate: P{:.2}", self.hourly_rate)?;
        writeln!(f, "Gross Pay: P{:.2}", self.gross_pay)?;
        writeln!(f, "SSS Deduction: P{:.2}", self.contributions.sss)?;
        writeln!(f, "PhilHealth Deduction: P{:.2}", self.contributions.philhealth)?;
        writeln!(f, "Pag-IBIG Deduction: P{:.2}", self.contributions.pagibig)?;
        writeln!(f, "Tardiness Deduction: P{:.2}", self.tardiness_deduction)?;
        writeln!(f, "Taxable Income: P{:.2}", self.taxable_income)?;
        writeln!(
            f,
            "Withholding Tax: P{:.2}",
            self.contributions.withholding_tax
        )?;
        writeln!(f, "Total Deductions: P{:.2}", self.total_deductions)?;
        write!(f, "Net Pay: P{:.2}", self.net_pay)
    }
}
