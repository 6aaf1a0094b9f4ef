//! Configuration types for attendance policy.
//!
//! [`PolicyConfig`] is the raw shape deserialized from `policy.yaml`, where
//! every value may be absent. [`Configuration`] is the resolved value object
//! passed explicitly into every policy call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::Employee;

/// Tolerance applied when `tolerance_minutes` is not configured.
pub const DEFAULT_TOLERANCE_MINUTES: u32 = 15;

/// Monthly lateness limit applied when `monthly_late_limit` is not configured.
pub const DEFAULT_MONTHLY_LATE_LIMIT: u32 = 3;

/// Compensation setting applied when `compensation_enabled` is not configured.
pub const DEFAULT_COMPENSATION_ENABLED: bool = true;

/// Per-employee policy values that replace the global ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyOverride {
    /// Entry tolerance in minutes.
    #[serde(default)]
    pub tolerance_minutes: Option<u32>,
    /// Late events allowed per month before the limit is exceeded.
    #[serde(default)]
    pub monthly_late_limit: Option<u32>,
    /// Whether recoverable lateness must be made up at shift end.
    #[serde(default)]
    pub compensation_enabled: Option<bool>,
}

/// Policy configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PolicyConfig {
    /// Entry tolerance in minutes.
    #[serde(default)]
    pub tolerance_minutes: Option<u32>,
    /// Late events allowed per month before the limit is exceeded.
    #[serde(default)]
    pub monthly_late_limit: Option<u32>,
    /// Whether recoverable lateness must be made up at shift end.
    #[serde(default)]
    pub compensation_enabled: Option<bool>,
    /// Overrides keyed by employee id.
    #[serde(default)]
    pub employee_overrides: HashMap<String, PolicyOverride>,
}

impl PolicyConfig {
    /// Resolves the policy, substituting the documented defaults for absent
    /// values. Each substitution is logged.
    pub fn resolve(&self) -> Configuration {
        let tolerance_minutes = self.tolerance_minutes.unwrap_or_else(|| {
            warn!(
                default = DEFAULT_TOLERANCE_MINUTES,
                "tolerance_minutes not configured, using default"
            );
            DEFAULT_TOLERANCE_MINUTES
        });
        let monthly_late_limit = self.monthly_late_limit.unwrap_or_else(|| {
            warn!(
                default = DEFAULT_MONTHLY_LATE_LIMIT,
                "monthly_late_limit not configured, using default"
            );
            DEFAULT_MONTHLY_LATE_LIMIT
        });
        let compensation_enabled = self.compensation_enabled.unwrap_or_else(|| {
            warn!(
                default = DEFAULT_COMPENSATION_ENABLED,
                "compensation_enabled not configured, using default"
            );
            DEFAULT_COMPENSATION_ENABLED
        });

        Configuration {
            tolerance_minutes,
            monthly_late_limit,
            compensation_enabled,
            overrides: self.employee_overrides.clone(),
        }
    }

    /// Resolves the policy, failing with [`EngineError::ConfigurationMissing`]
    /// when any global value is absent.
    pub fn resolve_strict(&self) -> EngineResult<Configuration> {
        let missing = |field: &str| EngineError::ConfigurationMissing {
            field: field.to_string(),
        };

        Ok(Configuration {
            tolerance_minutes: self
                .tolerance_minutes
                .ok_or_else(|| missing("tolerance_minutes"))?,
            monthly_late_limit: self
                .monthly_late_limit
                .ok_or_else(|| missing("monthly_late_limit"))?,
            compensation_enabled: self
                .compensation_enabled
                .ok_or_else(|| missing("compensation_enabled"))?,
            overrides: self.employee_overrides.clone(),
        })
    }
}

/// Resolved attendance policy.
///
/// # Example
///
/// ```
/// use attendance_engine::config::{Configuration, PolicyOverride};
///
/// let config = Configuration::new(15, 3, true).with_override(
///     "emp_002",
///     PolicyOverride {
///         tolerance_minutes: Some(5),
///         ..Default::default()
///     },
/// );
/// assert_eq!(config.tolerance_for("emp_001"), 15);
/// assert_eq!(config.tolerance_for("emp_002"), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Entry tolerance in minutes.
    pub tolerance_minutes: u32,
    /// Late events allowed per month before the limit is exceeded.
    pub monthly_late_limit: u32,
    /// Whether recoverable lateness must be made up at shift end.
    pub compensation_enabled: bool,
    /// Overrides keyed by employee id.
    #[serde(default)]
    pub overrides: HashMap<String, PolicyOverride>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new(
            DEFAULT_TOLERANCE_MINUTES,
            DEFAULT_MONTHLY_LATE_LIMIT,
            DEFAULT_COMPENSATION_ENABLED,
        )
    }
}

impl Configuration {
    /// Creates a configuration without overrides.
    pub fn new(tolerance_minutes: u32, monthly_late_limit: u32, compensation_enabled: bool) -> Self {
        Self {
            tolerance_minutes,
            monthly_late_limit,
            compensation_enabled,
            overrides: HashMap::new(),
        }
    }

    /// Adds an override for one employee.
    pub fn with_override(mut self, employee_id: impl Into<String>, policy: PolicyOverride) -> Self {
        self.overrides.insert(employee_id.into(), policy);
        self
    }

    fn override_for(&self, employee_id: &str) -> Option<&PolicyOverride> {
        self.overrides.get(employee_id)
    }

    /// Effective entry tolerance for an employee.
    pub fn tolerance_for(&self, employee_id: &str) -> u32 {
        self.override_for(employee_id)
            .and_then(|o| o.tolerance_minutes)
            .unwrap_or(self.tolerance_minutes)
    }

    /// Effective monthly lateness limit for an employee.
    pub fn monthly_limit_for(&self, employee_id: &str) -> u32 {
        self.override_for(employee_id)
            .and_then(|o| o.monthly_late_limit)
            .unwrap_or(self.monthly_late_limit)
    }

    /// Effective compensation setting for an employee.
    pub fn compensation_enabled_for(&self, employee_id: &str) -> bool {
        self.override_for(employee_id)
            .and_then(|o| o.compensation_enabled)
            .unwrap_or(self.compensation_enabled)
    }
}

/// Employees configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeesConfig {
    /// All employees known to the engine.
    pub employees: Vec<Employee>,
}
