//! Statutory contributions and withholding tax.
//!
//! Each deduction is a lookup against one of the configured
//! [`ContributionTables`], rounded to centavos. SSS, PhilHealth and Pag-IBIG
//! are based on the basic monthly salary; withholding tax is based on the
//! taxable income left after those contributions and tardiness.

use rust_decimal::Decimal;

use crate::config::ContributionTables;

use super::round_money;

/// SSS contribution for a basic monthly salary.
///
/// # Examples
///
/// ```
/// use motorph_payroll::calculation::sss_contribution;
/// use motorph_payroll::config::ContributionTables;
/// use rust_decimal::Decimal;
///
/// let tables = ContributionTables::default();
/// assert_eq!(sss_contribution(Decimal::new(3000, 0), &tables), Decimal::new(13500, 2));
/// assert_eq!(sss_contribution(Decimal::new(25000, 0), &tables), Decimal::new(112500, 2));
/// ```
pub fn sss_contribution(monthly_salary: Decimal, tables: &ContributionTables) -> Decimal {
    round_money(tables.sss.evaluate(monthly_salary))
}

/// PhilHealth employee share for a basic monthly salary.
///
/// The premium table gives the full monthly premium; the employee pays
/// `employee_share` of it.
pub fn philhealth_contribution(monthly_salary: Decimal, tables: &ContributionTables) -> Decimal {
    let premium = tables.philhealth.premium.evaluate(monthly_salary);
    round_money(premium * tables.philhealth.employee_share)
}

/// Pag-IBIG contribution for a basic monthly salary.
pub fn pagibig_contribution(monthly_salary: Decimal, tables: &ContributionTables) -> Decimal {
    round_money(tables.pagibig.evaluate(monthly_salary))
}

/// Withholding tax on taxable income. Zero for non-positive income.
///
/// # Examples
///
/// ```
/// use motorph_payroll::calculation::withholding_tax;
/// use motorph_payroll::config::ContributionTables;
/// use rust_decimal::Decimal;
///
/// let tables = ContributionTables::default();
/// assert_eq!(withholding_tax(Decimal::new(20000, 0), &tables), Decimal::ZERO);
/// assert_eq!(withholding_tax(Decimal::new(50000, 0), &tables), Decimal::new(666675, 2));
/// ```
pub fn withholding_tax(taxable_income: Decimal, tables: &ContributionTables) -> Decimal {
    if taxable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_money(tables.withholding_tax.evaluate(taxable_income))
}
