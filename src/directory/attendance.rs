//! Attendance ledger.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::EngineResult;
use crate::models::{AttendanceRecord, PayPeriod};
use crate::store::RecordStore;

/// Punch records for every employee, at most one per employee per day.
#[derive(Debug)]
pub struct AttendanceLedger {
    store: RecordStore<AttendanceRecord>,
}

impl AttendanceLedger {
    /// Creates a ledger backed by the CSV file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: RecordStore::new(path),
        }
    }

    /// Returns the employee's records within `period`, oldest first.
    pub fn records_for(
        &self,
        employee_id: u32,
        period: &PayPeriod,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let mut records = self
            .store
            .filter(|r| r.employee_id == employee_id && period.contains_date(r.date))?;
        records.sort_by_key(|r| r.date);
        debug!(
            employee_id,
            start_date = %period.start_date,
            end_date = %period.end_date,
            count = records.len(),
            "Selected attendance"
        );
        Ok(records)
    }

    /// Returns every record, in file order.
    pub fn all(&self) -> EngineResult<Vec<AttendanceRecord>> {
        self.store.load_all()
    }

    /// Adds a record. Returns `false` if the employee already has one that day.
    ///
    /// # Errors
    ///
    /// Fails with a validation error if `time_out` is before `time_in` or
    /// the employee id is zero.
    pub fn add(&self, record: AttendanceRecord) -> EngineResult<bool> {
        record.validate()?;
        let key = record.attendance_key();
        let added = self.store.append_and_persist(record)?;
        if added {
            info!(key = %key, "Recorded attendance");
        }
        Ok(added)
    }

    /// Removes every record of the employee and returns how many went.
    pub fn delete_for_employee(&self, employee_id: u32) -> EngineResult<usize> {
        let removed = self.store.delete_where(|r| r.employee_id == employee_id)?;
        if removed > 0 {
            info!(employee_id, removed, "Deleted attendance");
        }
        Ok(removed)
    }
}
