//! Payslip computation.
//!
//! This module combines attendance aggregation, the statutory contributions
//! and withholding tax into a [`Payslip`], recording every rule applied in
//! the payslip's audit trace.

use rust_decimal::Decimal;

use crate::config::{NetPayPolicy, PayrollConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AuditStep, ContributionBreakdown, Employee, PayPeriod, Payslip,
};

use super::{
    aggregate_attendance, pagibig_contribution, philhealth_contribution, round_money,
    sss_contribution, withholding_tax,
};

/// Collects audit steps with sequential numbering.
struct AuditLog {
    steps: Vec<AuditStep>,
}

impl AuditLog {
    fn new() -> Self {
        Self { steps: Vec::new() }
    }

    fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        self.steps.push(AuditStep {
            step_number: self.steps.len() as u32 + 1,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning,
        });
    }
}

fn amount(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Computes a payslip for one employee and pay period.
///
/// `attendance` must hold the employee's records within `period`. The
/// computation is:
/// 1. aggregate regular, overtime and tardiness hours
/// 2. gross pay = regular × rate + overtime × rate × overtime multiplier
/// 3. tardiness deduction = tardiness hours × rate
/// 4. SSS, PhilHealth and Pag-IBIG from the basic monthly salary
/// 5. taxable income = gross − contributions − tardiness, then withholding tax
/// 6. total deductions and net pay
///
/// Every monetary result is rounded to centavos, halves away from zero.
/// Net pay may be negative unless the policy floors it at zero.
///
/// # Errors
///
/// Returns [`EngineError::NoData`] if `attendance` is empty.
///
/// # Examples
///
/// ```
/// use motorph_payroll::calculation::compute_payslip;
/// use motorph_payroll::config::PayrollConfig;
/// use motorph_payroll::models::{AttendanceRecord, Employee, GovernmentIds, PayPeriod};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: 10001,
///     first_name: "Manuel".to_string(),
///     last_name: "Garcia".to_string(),
///     birthday: "10/11/1983".to_string(),
///     position: "Chief Executive Officer".to_string(),
///     hourly_rate: Decimal::new(100, 0),
///     monthly_salary: Decimal::new(3000, 0),
///     government_ids: GovernmentIds::default(),
/// };
/// let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
/// let record = AttendanceRecord {
///     employee_id: 10001,
///     last_name: "Garcia".to_string(),
///     first_name: "Manuel".to_string(),
///     date,
///     time_in: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///     time_out: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
/// };
///
/// let payslip = compute_payslip(
///     &employee,
///     PayPeriod::new(date, date).unwrap(),
///     &[record],
///     &PayrollConfig::default(),
/// )
/// .unwrap();
///
/// assert_eq!(payslip.gross_pay, Decimal::new(80000, 2));
/// assert_eq!(payslip.tardiness_deduction, Decimal::new(8333, 2));
/// ```
pub fn compute_payslip(
    employee: &Employee,
    period: PayPeriod,
    attendance: &[AttendanceRecord],
    config: &PayrollConfig,
) -> EngineResult<Payslip> {
    if attendance.is_empty() {
        return Err(EngineError::NoData {
            employee_id: employee.id,
            start_date: period.start_date,
            end_date: period.end_date,
        });
    }

    let policy = &config.policy;
    let tables = &config.contributions;
    let rate = employee.hourly_rate;
    let salary = employee.monthly_salary;
    let mut audit = AuditLog::new();

    // Step 1: hours
    let hours = aggregate_attendance(attendance, policy);
    audit.record(
        "attendance_aggregation",
        "Attendance Aggregation",
        serde_json::json!({
            "records": attendance.len(),
            "grace_time": policy.grace_time.to_string(),
            "lunch_break_hours": amount(policy.lunch_break_hours),
            "standard_shift_hours": amount(policy.standard_shift_hours),
        }),
        serde_json::json!({
            "regular_hours": amount(hours.regular_hours),
            "overtime_hours": amount(hours.overtime_hours),
            "tardiness_hours": amount(hours.tardiness_hours),
            "days_worked": hours.days_worked,
        }),
        format!(
            "Aggregated {} attendance record(s) into {} regular, {} overtime and {} tardy hours",
            hours.days_worked,
            hours.regular_hours.round_dp(2),
            hours.overtime_hours.round_dp(2),
            hours.tardiness_hours.round_dp(2)
        ),
    );

    // Step 2: gross pay
    let regular_pay = hours.regular_hours * rate;
    let overtime_pay = hours.overtime_hours * rate * policy.overtime_multiplier;
    let gross_pay = round_money(regular_pay + overtime_pay);
    audit.record(
        "gross_pay",
        "Gross Pay",
        serde_json::json!({
            "hourly_rate": amount(rate),
            "overtime_multiplier": amount(policy.overtime_multiplier),
        }),
        serde_json::json!({
            "regular_pay": amount(round_money(regular_pay)),
            "overtime_pay": amount(round_money(overtime_pay)),
            "gross_pay": amount(gross_pay),
        }),
        format!(
            "Regular hours at P{} plus overtime hours at {}x gives P{}",
            rate.normalize(),
            policy.overtime_multiplier.normalize(),
            gross_pay
        ),
    );

    // Step 3: tardiness
    let tardiness_deduction = round_money(hours.tardiness_hours * rate);
    audit.record(
        "tardiness_deduction",
        "Tardiness Deduction",
        serde_json::json!({ "tardiness_hours": amount(hours.tardiness_hours) }),
        serde_json::json!({ "tardiness_deduction": amount(tardiness_deduction) }),
        format!(
            "{} tardy hours at P{} deducts P{}",
            hours.tardiness_hours.round_dp(2),
            rate.normalize(),
            tardiness_deduction
        ),
    );

    // Step 4: contributions
    let sss = sss_contribution(salary, tables);
    let philhealth = philhealth_contribution(salary, tables);
    let pagibig = pagibig_contribution(salary, tables);
    audit.record(
        "statutory_contributions",
        "SSS, PhilHealth and Pag-IBIG",
        serde_json::json!({ "monthly_salary": amount(salary) }),
        serde_json::json!({
            "sss": amount(sss),
            "philhealth": amount(philhealth),
            "pagibig": amount(pagibig),
        }),
        format!(
            "Contributions on a P{} basic salary: SSS P{}, PhilHealth P{}, Pag-IBIG P{}",
            salary.normalize(),
            sss,
            philhealth,
            pagibig
        ),
    );

    // Step 5: withholding tax
    let taxable_income = gross_pay - sss - philhealth - pagibig - tardiness_deduction;
    let tax = withholding_tax(taxable_income, tables);
    audit.record(
        "withholding_tax",
        "Withholding Tax",
        serde_json::json!({
            "gross_pay": amount(gross_pay),
            "pre_tax_deductions": amount(sss + philhealth + pagibig + tardiness_deduction),
        }),
        serde_json::json!({
            "taxable_income": amount(taxable_income),
            "withholding_tax": amount(tax),
        }),
        format!("Taxable income of P{} is taxed P{}", taxable_income, tax),
    );

    // Step 6: totals
    let contributions = ContributionBreakdown {
        sss,
        philhealth,
        pagibig,
        withholding_tax: tax,
    };
    let total_deductions =
        round_money(contributions.pre_tax_total() + tax + tardiness_deduction);
    let computed_net = round_money(gross_pay - total_deductions);
    let net_pay = match policy.net_pay {
        NetPayPolicy::FloorAtZero => computed_net.max(Decimal::ZERO),
        NetPayPolicy::Unclamped => computed_net,
    };
    audit.record(
        "net_pay",
        "Net Pay",
        serde_json::json!({
            "gross_pay": amount(gross_pay),
            "total_deductions": amount(total_deductions),
            "net_pay_policy": policy.net_pay,
        }),
        serde_json::json!({ "net_pay": amount(net_pay) }),
        if net_pay == computed_net {
            format!("P{} less P{} in deductions", gross_pay, total_deductions)
        } else {
            format!(
                "P{} less P{} in deductions is negative; floored at zero",
                gross_pay, total_deductions
            )
        },
    );

    Ok(Payslip {
        employee_id: employee.id,
        employee_name: employee.display_name(),
        position: employee.position.clone(),
        pay_period: period,
        hourly_rate: rate,
        monthly_salary: salary,
        hours,
        gross_pay,
        tardiness_deduction,
        contributions,
        taxable_income,
        total_deductions,
        net_pay,
        audit_trace: audit.steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GovernmentIds;
    use chrono::{NaiveDate, NaiveTime};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn create_test_employee(hourly_rate: &str, monthly_salary: &str) -> Employee {
        Employee {
            id: 10001,
            first_name: "Manuel".to_string(),
            last_name: "Garcia".to_string(),
            birthday: "10/11/1983".to_string(),
            position: "Chief Executive Officer".to_string(),
            hourly_rate: dec(hourly_rate),
            monthly_salary: dec(monthly_salary),
            government_ids: GovernmentIds::default(),
        }
    }

    fn record(day: u32, time_in: NaiveTime, time_out: NaiveTime) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: 10001,
            last_name: "Garcia".to_string(),
            first_name: "Manuel".to_string(),
            date: date(day),
            time_in,
            time_out,
        }
    }

    fn week() -> PayPeriod {
        PayPeriod::new(date(3), date(7)).unwrap()
    }

    /// PS-001: single late day at 100/hour.
    #[test]
    fn test_single_day_payslip() {
        let employee = create_test_employee("100", "3000");
        let payslip = compute_payslip(
            &employee,
            week(),
            &[record(3, time(9, 0), time(18, 0))],
            &PayrollConfig::default(),
        )
        .unwrap();

        assert_eq!(payslip.hours.regular_hours, dec("8"));
        assert_eq!(payslip.hours.overtime_hours, dec("0"));
        assert_eq!(payslip.gross_pay, dec("800.00"));
        assert_eq!(payslip.tardiness_deduction, dec("83.33"));
        assert_eq!(payslip.contributions.sss, dec("135.00"));
        assert_eq!(payslip.contributions.philhealth, dec("150.00"));
        assert_eq!(payslip.contributions.pagibig, dec("60.00"));
        assert_eq!(payslip.taxable_income, dec("371.67"));
        assert_eq!(payslip.contributions.withholding_tax, dec("0"));
        assert_eq!(payslip.total_deductions, dec("428.33"));
        assert_eq!(payslip.net_pay, dec("371.67"));
    }

    /// PS-002: no attendance is a NoData error naming the employee and period.
    #[test]
    fn test_no_attendance_is_no_data() {
        let employee = create_test_employee("100", "3000");
        let result = compute_payslip(&employee, week(), &[], &PayrollConfig::default());
        match result {
            Err(EngineError::NoData {
                employee_id,
                start_date,
                end_date,
            }) => {
                assert_eq!(employee_id, 10001);
                assert_eq!(start_date, date(3));
                assert_eq!(end_date, date(7));
            }
            other => panic!("Expected NoData, got {:?}", other),
        }
    }

    /// PS-003: overtime is paid at the configured multiplier.
    #[test]
    fn test_overtime_pay() {
        let employee = create_test_employee("100", "3000");
        let payslip = compute_payslip(
            &employee,
            week(),
            &[record(3, time(8, 0), time(19, 0))],
            &PayrollConfig::default(),
        )
        .unwrap();

        assert_eq!(payslip.hours.overtime_hours, dec("2"));
        // 8 × 100 + 2 × 100 × 1.25
        assert_eq!(payslip.gross_pay, dec("1050.00"));
        assert_eq!(payslip.tardiness_deduction, dec("0"));
    }

    /// PS-004: net pay is negative by default when deductions exceed gross.
    #[test]
    fn test_negative_net_pay_unclamped() {
        let employee = create_test_employee("10", "25000");
        let payslip = compute_payslip(
            &employee,
            week(),
            &[record(3, time(8, 0), time(17, 0))],
            &PayrollConfig::default(),
        )
        .unwrap();

        // 80.00 − (1125.00 + 375.00 + 100.00)
        assert_eq!(payslip.gross_pay, dec("80.00"));
        assert_eq!(payslip.contributions.withholding_tax, Decimal::ZERO);
        assert_eq!(payslip.net_pay, dec("-1520.00"));
    }

    /// PS-005: the floor policy reports negative net pay as zero.
    #[test]
    fn test_negative_net_pay_floored() {
        let employee = create_test_employee("10", "25000");
        let mut config = PayrollConfig::default();
        config.policy.net_pay = NetPayPolicy::FloorAtZero;

        let payslip = compute_payslip(
            &employee,
            week(),
            &[record(3, time(8, 0), time(17, 0))],
            &config,
        )
        .unwrap();

        assert_eq!(payslip.net_pay, Decimal::ZERO);
        assert_eq!(payslip.total_deductions, dec("1600.00"));
    }

    /// PS-006: taxable income above the exempt band is taxed.
    #[test]
    fn test_taxable_income_is_taxed() {
        // 10 days × 8 h × 700 = 56,000 gross
        let employee = create_test_employee("700", "50000");
        let records: Vec<_> = (3..=14)
            .filter(|d| ![8, 9].contains(d))
            .map(|d| record(d, time(8, 0), time(17, 0)))
            .collect();
        let period = PayPeriod::new(date(3), date(14)).unwrap();

        let payslip =
            compute_payslip(&employee, period, &records, &PayrollConfig::default()).unwrap();

        assert_eq!(payslip.gross_pay, dec("56000.00"));
        // 56,000 − 1,125 − 750 − 100 = 54,025; 2,500 + 0.25 × 20,692 = 7,673
        assert_eq!(payslip.taxable_income, dec("54025.00"));
        assert_eq!(payslip.contributions.withholding_tax, dec("7673.00"));
        assert_eq!(payslip.total_deductions, dec("9648.00"));
        assert_eq!(payslip.net_pay, dec("46352.00"));
    }

    /// PS-007: identical inputs give identical payslips.
    #[test]
    fn test_compute_is_pure() {
        let employee = create_test_employee("133.93", "22500");
        let records = vec![
            record(3, time(8, 59), time(18, 31)),
            record(4, time(8, 5), time(17, 4)),
        ];
        let config = PayrollConfig::default();

        let first = compute_payslip(&employee, week(), &records, &config).unwrap();
        let second = compute_payslip(&employee, week(), &records, &config).unwrap();
        assert_eq!(first, second);
    }

    /// PS-008: the audit trace records every rule in order.
    #[test]
    fn test_audit_trace_order() {
        let employee = create_test_employee("100", "3000");
        let payslip = compute_payslip(
            &employee,
            week(),
            &[record(3, time(9, 0), time(18, 0))],
            &PayrollConfig::default(),
        )
        .unwrap();

        let rule_ids: Vec<_> = payslip
            .audit_trace
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "attendance_aggregation",
                "gross_pay",
                "tardiness_deduction",
                "statutory_contributions",
                "withholding_tax",
                "net_pay",
            ]
        );
        for (i, step) in payslip.audit_trace.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
        assert_eq!(payslip.audit_trace[1].output["gross_pay"], "800");
    }

    /// PS-009: monetary outputs are rounded to centavos.
    #[test]
    fn test_outputs_rounded() {
        let employee = create_test_employee("133.93", "22500");
        let payslip = compute_payslip(
            &employee,
            week(),
            &[record(3, time(8, 17), time(18, 3))],
            &PayrollConfig::default(),
        )
        .unwrap();

        for value in [
            payslip.gross_pay,
            payslip.tardiness_deduction,
            payslip.total_deductions,
            payslip.net_pay,
            payslip.contributions.withholding_tax,
        ] {
            assert_eq!(value, round_money(value));
        }
    }
}
