//! Configuration loading and management for the attendance engine.
//!
//! Policy values (tolerance, monthly limit, compensation) and employee
//! schedules are loaded from YAML and handed to the engine as explicit
//! values; nothing is read from global state.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/attendance").unwrap();
//! println!("Monthly limit: {}", config.configuration().monthly_late_limit);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    Configuration, DEFAULT_COMPENSATION_ENABLED, DEFAULT_MONTHLY_LATE_LIMIT,
    DEFAULT_TOLERANCE_MINUTES, EmployeesConfig, PolicyConfig, PolicyOverride,
};
