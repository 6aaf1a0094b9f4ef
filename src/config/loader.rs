//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading attendance
//! policy and employee schedules from YAML files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::Employee;

use super::types::{Configuration, EmployeesConfig, PolicyConfig};

/// Loads and provides access to the policy and the employee/schedule store.
///
/// # Directory Structure
///
/// ```text
/// config/attendance/
/// ├── policy.yaml      # Tolerance, monthly limit, compensation, overrides
/// └── employees.yaml   # Employees and their schedules
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/attendance")?;
/// let employee = loader.employee("emp_001")?;
/// println!("Tolerance: {} min", loader.configuration().tolerance_for(&employee.id));
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    configuration: Configuration,
    employees: HashMap<String, Employee>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Absent policy values fall back to documented defaults; use
    /// [`ConfigLoader::load_strict`] to reject them instead.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let policy = Self::load_yaml::<PolicyConfig>(&path.join("policy.yaml"))?;
        let employees = Self::load_yaml::<EmployeesConfig>(&path.join("employees.yaml"))?;
        Ok(Self::from_parts(policy.resolve(), employees.employees))
    }

    /// Loads configuration, failing with `ConfigurationMissing` when a
    /// global policy value is absent.
    pub fn load_strict<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let policy = Self::load_yaml::<PolicyConfig>(&path.join("policy.yaml"))?;
        let configuration = policy.resolve_strict()?;
        let employees = Self::load_yaml::<EmployeesConfig>(&path.join("employees.yaml"))?;
        Ok(Self::from_parts(configuration, employees.employees))
    }

    /// Builds a loader from already-resolved parts.
    pub fn from_parts(configuration: Configuration, employees: Vec<Employee>) -> Self {
        let employees: HashMap<String, Employee> = employees
            .into_iter()
            .map(|employee| (employee.id.clone(), employee))
            .collect();
        info!(
            employees = employees.len(),
            tolerance_minutes = configuration.tolerance_minutes,
            monthly_late_limit = configuration.monthly_late_limit,
            "Attendance configuration loaded"
        );
        Self {
            configuration,
            employees,
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();
        debug!(path = %path_str, "Reading configuration file");

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the resolved policy.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Gets an employee by id.
    pub fn employee(&self, employee_id: &str) -> EngineResult<&Employee> {
        self.employees
            .get(employee_id)
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })
    }

    /// Iterates over every known employee.
    pub fn employees(&self) -> impl Iterator<Item = &Employee> {
        self.employees.values()
    }
}
