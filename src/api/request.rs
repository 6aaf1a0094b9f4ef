//! Request types for the attendance engine API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::{ReportMonth, Scan};
use crate::error::EngineResult;
use crate::models::{EventKind, parse_timestamp};

/// Request body for `POST /scans`.
///
/// The timestamp is kept as text so a malformed value is reported as
/// `INVALID_TIME_FORMAT` rather than a generic JSON error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    /// The employee that scanned.
    pub employee_id: String,
    /// The intended kind; omitted to let the engine infer it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EventKind>,
    /// Local timestamp, e.g. `2026-01-15T08:05:00`.
    pub timestamp: String,
}

impl ScanRequest {
    /// Parses the request into a [`Scan`].
    pub fn into_scan(self) -> EngineResult<Scan> {
        Ok(Scan {
            timestamp: parse_timestamp(&self.timestamp)?,
            employee_id: self.employee_id,
            kind: self.kind,
        })
    }
}

/// Request body for `POST /reports/worked`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkedReportRequest {
    /// The employee to report on.
    pub employee_id: String,
    /// First date, inclusive.
    pub from: NaiveDate,
    /// Last date, inclusive.
    pub to: NaiveDate,
}

/// Request body for `POST /reports/lateness`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatenessReportRequest {
    /// Month as `YYYY-MM`.
    pub month: String,
}

impl LatenessReportRequest {
    /// Parses the requested month.
    pub fn report_month(&self) -> EngineResult<ReportMonth> {
        self.month.parse()
    }
}
