//! Attendance Rules & Schedule-Compensation Engine
//!
//! This crate classifies clock-in/clock-out scans against per-employee
//! schedules, tracks lateness and end-of-shift compensation, and produces
//! worked-hours and monthly lateness reports.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
