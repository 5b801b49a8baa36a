//! Employee directory.

use std::path::PathBuf;

use tracing::info;

use crate::error::EngineResult;
use crate::models::{Employee, EmployeeUpdate};
use crate::store::RecordStore;

/// The employee master file.
#[derive(Debug)]
pub struct EmployeeDirectory {
    store: RecordStore<Employee>,
}

impl EmployeeDirectory {
    /// Creates a directory backed by the CSV file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: RecordStore::new(path),
        }
    }

    /// Returns the employee with `id`, if any.
    pub fn get(&self, id: u32) -> EngineResult<Option<Employee>> {
        self.store.find(&id)
    }

    /// Returns true if an employee with `id` exists.
    pub fn exists(&self, id: u32) -> EngineResult<bool> {
        self.store.contains(&id)
    }

    /// Returns every employee, in file order.
    pub fn list(&self) -> EngineResult<Vec<Employee>> {
        self.store.load_all()
    }

    /// Adds an employee. Returns `false` if the id is taken.
    ///
    /// Text fields are trimmed before the employee is stored.
    ///
    /// # Errors
    ///
    /// Fails with a validation error for a zero id or a negative amount.
    pub fn add(&self, employee: Employee) -> EngineResult<bool> {
        let employee = employee.normalized();
        employee.validate()?;
        let id = employee.id;
        let added = self.store.append_and_persist(employee)?;
        if added {
            info!(employee_id = id, "Added employee");
        }
        Ok(added)
    }

    /// Applies `update` to the employee with `id`. Returns `false` if there
    /// is no such employee.
    ///
    /// Blank strings and negative amounts in `update` are ignored. An update
    /// that changes nothing does not rewrite the file.
    pub fn edit(&self, id: u32, update: EmployeeUpdate) -> EngineResult<bool> {
        let update = update.normalized();
        if update.is_empty() {
            return self.exists(id);
        }

        let edited = self.store.update_and_persist(&id, |e| update.apply(e))?;
        if edited {
            info!(employee_id = id, "Edited employee");
        }
        Ok(edited)
    }

    /// Removes the employee with `id`. Returns `false` if there is none.
    pub fn delete(&self, id: u32) -> EngineResult<bool> {
        let deleted = self.store.delete_and_persist(&id)?;
        if deleted {
            info!(employee_id = id, "Deleted employee");
        }
        Ok(deleted)
    }
}
