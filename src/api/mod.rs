//! HTTP API module for the attendance engine.
//!
//! This module provides the REST endpoints called by the scanning layer
//! (scans and day records) and by the reporting layer.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{LatenessReportRequest, ScanRequest, WorkedReportRequest};
pub use response::{ApiError, ApiErrorResponse, DayRecordResponse, LatenessReportResponse};
pub use state::AppState;
