//! User account directory.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Role, User, UserUpdate};
use crate::store::RecordStore;

/// Login accounts, unique by case-insensitive username.
#[derive(Debug)]
pub struct UserDirectory {
    store: RecordStore<User>,
}

impl UserDirectory {
    /// Creates a directory backed by the CSV file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: RecordStore::new(path),
        }
    }

    /// Returns the account matching `username` and `password`.
    ///
    /// Usernames match ignoring case; passwords match exactly. Accounts
    /// without a password never authenticate.
    pub fn authenticate(&self, username: &str, password: &str) -> EngineResult<Option<User>> {
        let Some(user) = self.get_by_username(username)? else {
            warn!(username, "Login failed: unknown user");
            return Ok(None);
        };
        if user.is_pending() {
            warn!(username, "Login failed: account has no password");
            return Ok(None);
        }
        if user.password != password {
            warn!(username, "Login failed: wrong password");
            return Ok(None);
        }
        info!(username = %user.username, role = %user.role, "Login succeeded");
        Ok(Some(user))
    }

    /// Returns the account with `username`, ignoring case.
    pub fn get_by_username(&self, username: &str) -> EngineResult<Option<User>> {
        self.store.find(&username.trim().to_lowercase())
    }

    /// Returns the account linked to `employee_id`, if any.
    pub fn get_by_employee_id(&self, employee_id: u32) -> EngineResult<Option<User>> {
        if employee_id == 0 {
            return Ok(None);
        }
        Ok(self
            .store
            .filter(|u| u.employee_id == employee_id)?
            .into_iter()
            .next())
    }

    /// Returns every account, in file order.
    pub fn list(&self) -> EngineResult<Vec<User>> {
        self.store.load_all()
    }

    /// Adds an account. Returns `false` if the username is taken.
    ///
    /// The username and names are trimmed before the account is stored; the
    /// password is kept as given.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateKey` if the account links to an employee who
    /// already has one, or with a validation error for an invalid account.
    pub fn add(&self, user: User) -> EngineResult<bool> {
        let user = user.normalized();
        user.validate()?;
        if let Some(existing) = self.get_by_employee_id(user.employee_id)? {
            warn!(
                employee_id = user.employee_id,
                existing = %existing.username,
                "Rejected second account for employee"
            );
            return Err(EngineError::duplicate("user for employee", user.employee_id));
        }
        let username = user.username.clone();
        let added = self.store.append_and_persist(user)?;
        if added {
            info!(username = %username, "Added user");
        }
        Ok(added)
    }

    /// Applies `update` to the account linked to `employee_id`. Returns
    /// `false` if no account is linked to that employee.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateKey` if the new username is taken, or with a
    /// validation error if the result is not a valid account.
    pub fn edit_by_employee(&self, employee_id: u32, update: UserUpdate) -> EngineResult<bool> {
        let Some(current) = self.get_by_employee_id(employee_id)? else {
            return Ok(false);
        };
        let update = update.normalized();
        if update.is_empty() {
            return Ok(true);
        }

        let mut candidate = current.clone();
        update.apply(&mut candidate);
        candidate.validate()?;

        let edited = self
            .store
            .update_and_persist(&current.normalized_username(), |u| update.apply(u))?;
        if edited {
            info!(employee_id, username = %candidate.username, "Edited user");
        }
        Ok(edited)
    }

    /// Removes every account linked to `employee_id`.
    pub fn delete_for_employee(&self, employee_id: u32) -> EngineResult<usize> {
        if employee_id == 0 {
            return Ok(0);
        }
        let removed = self.store.delete_where(|u| u.employee_id == employee_id)?;
        if removed > 0 {
            info!(employee_id, removed, "Deleted user accounts");
        }
        Ok(removed)
    }

    /// Creates a pending `Employee` account for every employee without one.
    ///
    /// The stub's username is the employee id and its password is empty, so
    /// it cannot log in until a password is set. Returns how many were created.
    pub fn sync_from_employees(&self, employees: &[Employee]) -> EngineResult<usize> {
        let existing = self.store.load_all()?;
        let stubs: Vec<User> = employees
            .iter()
            .filter(|e| !existing.iter().any(|u| u.employee_id == e.id))
            .map(stub_for)
            .collect();

        let created = self.store.extend_and_persist(stubs)?;
        if created > 0 {
            info!(created, "Created pending accounts for employees");
        }
        Ok(created)
    }
}

fn stub_for(employee: &Employee) -> User {
    User {
        username: employee.id.to_string(),
        password: String::new(),
        role: Role::Employee,
        first_name: employee.first_name.clone(),
        last_name: employee.last_name.clone(),
        employee_id: employee.id,
    }
}
