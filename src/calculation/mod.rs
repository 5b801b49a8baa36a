//! Calculation logic for the payroll engine.
//!
//! This module contains the pure pay computation: bracket tables, money
//! rounding, attendance aggregation, the statutory contributions and
//! withholding tax, and the payslip computation that ties them together.

mod attendance;
mod brackets;
mod contributions;
mod payslip;
mod rounding;

pub use attendance::aggregate_attendance;
pub use brackets::{Bracket, BracketKind, BracketTable};
pub use contributions::{
    pagibig_contribution, philhealth_contribution, sss_contribution, withholding_tax,
};
pub use payslip::compute_payslip;
pub use rounding::round_money;
