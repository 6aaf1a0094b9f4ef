//! Employee model.
//!
//! Employees are created and edited by an external employee-management
//! collaborator; the engine only reads them.

use serde::{Deserialize, Serialize};

use super::schedule::Schedule;

fn default_active() -> bool {
    true
}

/// An employee whose scans are classified by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name shown to operators.
    #[serde(default)]
    pub name: String,
    /// The expected working pattern.
    pub schedule: Schedule,
    /// Inactive employees are never expected to work.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Employee {
    /// Returns the name to show operators, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
