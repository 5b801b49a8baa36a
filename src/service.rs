//! The payroll service.
//!
//! [`PayrollService`] is the single entry point used by the HTTP layer and
//! the binary. It owns the three directories and the configuration, keeps
//! them consistent across entities, and runs the payslip computation.

use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use tracing::info;

use crate::calculation;
use crate::config::PayrollConfig;
use crate::directory::{AttendanceLedger, EmployeeDirectory, UserDirectory};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, Employee, EmployeeUpdate, PayPeriod, Payslip, User, UserUpdate,
};

/// File name of the employee store inside a data directory.
pub const EMPLOYEES_FILE: &str = "employees.csv";
/// File name of the attendance store inside a data directory.
pub const ATTENDANCE_FILE: &str = "attendance.csv";
/// File name of the user store inside a data directory.
pub const USERS_FILE: &str = "users.csv";

/// Employee, attendance and account management plus payslip computation.
///
/// # Example
///
/// ```no_run
/// use motorph_payroll::config::PayrollConfig;
/// use motorph_payroll::service::PayrollService;
/// use chrono::NaiveDate;
///
/// let service = PayrollService::open("./data", PayrollConfig::default());
/// let payslip = service.compute_payslip(
///     10001,
///     NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 7).unwrap(),
/// )?;
/// println!("{}", payslip);
/// # Ok::<(), motorph_payroll::error::EngineError>(())
/// ```
#[derive(Debug)]
pub struct PayrollService {
    employees: EmployeeDirectory,
    attendance: AttendanceLedger,
    users: UserDirectory,
    config: PayrollConfig,
}

impl PayrollService {
    /// Creates a service from already-constructed directories.
    pub fn new(
        employees: EmployeeDirectory,
        attendance: AttendanceLedger,
        users: UserDirectory,
        config: PayrollConfig,
    ) -> Self {
        Self {
            employees,
            attendance,
            users,
            config,
        }
    }

    /// Creates a service over the standard files in `data_dir`.
    ///
    /// Nothing is read until first use; missing files are empty stores.
    pub fn open(data_dir: impl AsRef<Path>, config: PayrollConfig) -> Self {
        let data_dir = data_dir.as_ref();
        Self::new(
            EmployeeDirectory::new(data_dir.join(EMPLOYEES_FILE)),
            AttendanceLedger::new(data_dir.join(ATTENDANCE_FILE)),
            UserDirectory::new(data_dir.join(USERS_FILE)),
            config,
        )
    }

    /// Returns the configuration payslips are computed with.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Employees
    // ------------------------------------------------------------------

    /// Returns the employee with `id`, if any.
    pub fn get_employee(&self, id: u32) -> EngineResult<Option<Employee>> {
        self.employees.get(id)
    }

    /// Returns every employee.
    pub fn list_employees(&self) -> EngineResult<Vec<Employee>> {
        self.employees.list()
    }

    /// Adds an employee. Returns `false` if the id is taken.
    pub fn add_employee(&self, employee: Employee) -> EngineResult<bool> {
        self.employees.add(employee)
    }

    /// Applies a partial update. Returns `false` if there is no such employee.
    pub fn edit_employee(&self, id: u32, update: EmployeeUpdate) -> EngineResult<bool> {
        self.employees.edit(id, update)
    }

    /// Deletes an employee with their attendance and linked account.
    ///
    /// Returns `false` if there is no such employee.
    pub fn delete_employee(&self, id: u32) -> EngineResult<bool> {
        if !self.employees.exists(id)? {
            return Ok(false);
        }

        let attendance_removed = self.attendance.delete_for_employee(id)?;
        let accounts_removed = self.users.delete_for_employee(id)?;
        let deleted = self.employees.delete(id)?;
        info!(
            employee_id = id,
            attendance_removed, accounts_removed, "Deleted employee and dependent records"
        );
        Ok(deleted)
    }

    // ------------------------------------------------------------------
    // Attendance
    // ------------------------------------------------------------------

    /// Returns the employee's attendance between `start` and `end` inclusive,
    /// oldest first.
    ///
    /// # Errors
    ///
    /// Fails with a validation error if `end` is before `start`.
    pub fn get_attendance_for(
        &self,
        employee_id: u32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let period = PayPeriod::new(start, end)?;
        self.attendance.records_for(employee_id, &period)
    }

    /// Returns every attendance record of every employee.
    pub fn list_attendance(&self) -> EngineResult<Vec<AttendanceRecord>> {
        self.attendance.all()
    }

    /// Records a day's punches for an employee, copying their name from the
    /// employee file. Returns `false` if the day is already recorded.
    ///
    /// # Errors
    ///
    /// Fails with `NotFound` for an unknown employee, or with a validation
    /// error if `time_out` is before `time_in` or a punch has seconds.
    pub fn add_attendance(
        &self,
        employee_id: u32,
        date: NaiveDate,
        time_in: NaiveTime,
        time_out: NaiveTime,
    ) -> EngineResult<bool> {
        let employee = self
            .employees
            .get(employee_id)?
            .ok_or_else(|| EngineError::not_found("employee", employee_id))?;

        self.attendance.add(AttendanceRecord {
            employee_id,
            last_name: employee.last_name,
            first_name: employee.first_name,
            date,
            time_in,
            time_out,
        })
    }

    // ------------------------------------------------------------------
    // Payroll
    // ------------------------------------------------------------------

    /// Computes the employee's payslip for `start..=end`.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown employee
    /// - a validation error if `end` is before `start`
    /// - `NoData` if the employee has no attendance in the period
    pub fn compute_payslip(
        &self,
        employee_id: u32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Payslip> {
        let employee = self
            .employees
            .get(employee_id)?
            .ok_or_else(|| EngineError::not_found("employee", employee_id))?;
        let period = PayPeriod::new(start, end)?;
        let records = self.attendance.records_for(employee_id, &period)?;

        let payslip = calculation::compute_payslip(&employee, period, &records, &self.config)?;
        info!(
            employee_id,
            gross_pay = %payslip.gross_pay,
            net_pay = %payslip.net_pay,
            "Computed payslip"
        );
        Ok(payslip)
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    /// Returns the account matching the credentials, if any.
    pub fn authenticate(&self, username: &str, password: &str) -> EngineResult<Option<User>> {
        self.users.authenticate(username, password)
    }

    /// Returns the account with `username`, ignoring case.
    pub fn get_user(&self, username: &str) -> EngineResult<Option<User>> {
        self.users.get_by_username(username)
    }

    /// Returns the account linked to an employee.
    pub fn get_user_for_employee(&self, employee_id: u32) -> EngineResult<Option<User>> {
        self.users.get_by_employee_id(employee_id)
    }

    /// Returns every account.
    pub fn list_users(&self) -> EngineResult<Vec<User>> {
        self.users.list()
    }

    /// Adds an account. Returns `false` if the username is taken.
    ///
    /// # Errors
    ///
    /// Fails with `NotFound` if the account links to an unknown employee, or
    /// with `DuplicateKey` if that employee already has an account.
    pub fn add_user(&self, user: User) -> EngineResult<bool> {
        if user.employee_id != 0 && !self.employees.exists(user.employee_id)? {
            return Err(EngineError::not_found("employee", user.employee_id));
        }
        self.users.add(user)
    }

    /// Edits the account linked to an employee. Returns `false` if there is none.
    pub fn edit_user(&self, employee_id: u32, update: UserUpdate) -> EngineResult<bool> {
        self.users.edit_by_employee(employee_id, update)
    }

    /// Creates pending accounts for employees without one; returns how many.
    pub fn sync_users(&self) -> EngineResult<usize> {
        let employees = self.employees.list()?;
        self.users.sync_from_employees(&employees)
    }
}
