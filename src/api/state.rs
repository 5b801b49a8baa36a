//! Application state for the payroll API.

use std::sync::Arc;

use crate::service::PayrollService;

/// Shared application state.
///
/// Every handler shares the one [`PayrollService`] built at startup.
#[derive(Clone)]
pub struct AppState {
    service: Arc<PayrollService>,
}

impl AppState {
    /// Creates a new application state around the service.
    pub fn new(service: PayrollService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Returns a reference to the payroll service.
    pub fn service(&self) -> &PayrollService {
        &self.service
    }
}
