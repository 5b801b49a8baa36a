//! MotorPH payroll engine
//!
//! This crate keeps employees, daily attendance and user accounts in CSV
//! files and computes semi-monthly payslips from them: regular and overtime
//! pay, tardiness, SSS, PhilHealth, Pag-IBIG and withholding tax.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
