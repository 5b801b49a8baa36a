//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configuration from YAML files.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::calculation::BracketTable;
use crate::error::{EngineError, EngineResult};

use super::types::{ContributionTables, PayPolicy, PayrollConfig, PhilHealthConfig};

/// On-disk layout of `contributions.yaml`.
#[derive(Debug, Deserialize)]
struct ContributionsFile {
    #[serde(default)]
    include_top_tax_bracket: bool,
    sss: BracketTable,
    philhealth: PhilHealthConfig,
    pagibig: BracketTable,
    withholding_tax: BracketTable,
}

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/motorph/
/// ├── policy.yaml         # Grace time, lunch break, shift length, overtime, net pay
/// └── contributions.yaml  # SSS, PhilHealth, Pag-IBIG and withholding tax tables
/// ```
///
/// # Example
///
/// ```no_run
/// use motorph_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/motorph")?;
/// println!("Grace time: {}", loader.policy().grace_time);
/// # Ok::<(), motorph_payroll::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigNotFound`] if either file is missing
    /// - [`EngineError::ConfigParseError`] if either file is not valid YAML
    ///   for its schema
    /// - [`EngineError::InvalidBracketTable`] if a table is empty, unordered
    ///   or has negative values
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<PayPolicy>(&path.join("policy.yaml"))?;
        let file = Self::load_yaml::<ContributionsFile>(&path.join("contributions.yaml"))?;

        let mut contributions = ContributionTables {
            sss: file.sss,
            philhealth: file.philhealth,
            pagibig: file.pagibig,
            withholding_tax: file.withholding_tax,
        };
        contributions.validate()?;
        if file.include_top_tax_bracket {
            contributions = contributions.with_top_tax_bracket()?;
        }

        info!(
            path = %path.display(),
            sss_brackets = contributions.sss.brackets().len(),
            tax_brackets = contributions.withholding_tax.brackets().len(),
            "Loaded payroll configuration"
        );

        Ok(Self {
            config: PayrollConfig {
                policy,
                contributions,
            },
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the time-keeping and pay rules.
    pub fn policy(&self) -> &PayPolicy {
        &self.config.policy
    }

    /// Returns the deduction tables.
    pub fn contributions(&self) -> &ContributionTables {
        &self.config.contributions
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }
}
