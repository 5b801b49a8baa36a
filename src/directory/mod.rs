//! Domain directories over the flat-file stores.
//!
//! Each directory owns one [`RecordStore`](crate::store::RecordStore) and
//! adds the validation, lookups and logging of its entity.

mod attendance;
mod employees;
mod users;

pub use attendance::AttendanceLedger;
pub use employees::EmployeeDirectory;
pub use users::UserDirectory;
