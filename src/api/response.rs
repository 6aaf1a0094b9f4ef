//! Response types for the attendance engine API.
//!
//! This module defines the success payloads that are not plain engine types
//! and the error response structures for the HTTP API.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::{LatenessAlert, LatenessSummary, ReportMonth};
use crate::error::EngineError;
use crate::models::{AttendanceEvent, DayState, EventKind};

/// Body returned by `GET /employees/:id/days/:date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRecordResponse {
    /// The employee.
    pub employee_id: String,
    /// The employee's display name.
    pub employee_name: String,
    /// The date.
    pub date: NaiveDate,
    /// Whether the employee is scheduled to work that date.
    pub scheduled: bool,
    /// Derived day state.
    pub state: DayState,
    /// The kind the day is waiting for, `None` when complete or unscheduled.
    pub next_expected: Option<EventKind>,
    /// Accepted events in day order.
    pub events: Vec<AttendanceEvent>,
}

/// Body returned by `POST /reports/lateness`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatenessReportResponse {
    /// The reported month.
    pub month: ReportMonth,
    /// Per-employee summaries, worst first.
    pub summaries: Vec<LatenessSummary>,
    /// Alerts for employees approaching or over their limit.
    pub alerts: Vec<LatenessAlert>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// The kind the operator should scan instead, on sequence violations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_next: Option<EventKind>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            expected_next: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A `400 Bad Request` carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let expected_next = error.expected_next();
        let (status, code, details) = match &error {
            EngineError::EmployeeNotFound { .. } => (
                StatusCode::NOT_FOUND,
                "EMPLOYEE_NOT_FOUND",
                "No employee with this id is configured",
            ),
            EngineError::ScheduleNotFound { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "SCHEDULE_NOT_FOUND",
                "The employee is not scheduled to work on this date",
            ),
            EngineError::SequenceViolation { .. } => (
                StatusCode::CONFLICT,
                "SEQUENCE_VIOLATION",
                "The scan does not follow the events already recorded",
            ),
            EngineError::DuplicateEvent { .. } => (
                StatusCode::CONFLICT,
                "DUPLICATE_EVENT",
                "This scan was already recorded; nothing was stored",
            ),
            EngineError::InvalidTimeFormat { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_TIME_FORMAT",
                "The time value could not be parsed",
            ),
            EngineError::InvalidDateRange { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_DATE_RANGE",
                "The report range must start on or before its end and span at most 366 days",
            ),
            EngineError::InvalidSchedule { .. }
            | EngineError::ConfigurationMissing { .. }
            | EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "The engine configuration is incomplete or invalid",
            ),
        };

        ApiErrorResponse {
            status,
            error: ApiError {
                expected_next,
                ..ApiError::with_details(code, message, details)
            },
        }
    }
}
