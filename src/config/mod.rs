//! Configuration loading and management for the payroll engine.
//!
//! This module provides the pay policy and the contribution tables, either
//! built in ([`PayrollConfig::default`]) or loaded from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use motorph_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/motorph").unwrap();
//! println!("Overtime multiplier: {}", config.policy().overtime_multiplier);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ContributionTables, NetPayPolicy, PayPolicy, PayrollConfig, PhilHealthConfig,
    top_tax_bracket,
};
