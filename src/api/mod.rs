//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for managing employees,
//! attendance and accounts, and for computing payslips.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AttendanceRequest, EmployeeRequest, LoginRequest, PeriodQuery, SyncResponse, UserRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
