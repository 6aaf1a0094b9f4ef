//! HTTP request handlers for the attendance engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    WorkedRangeSummary, aggregate_worked, lateness_alert, next_expected_kind, process_scan,
    rank_by_lateness, resolve_day, summarize_all,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceEvent, DayRecord};
use crate::store::EventStore;

use super::request::{LatenessReportRequest, ScanRequest, WorkedReportRequest};
use super::response::{ApiError, ApiErrorResponse, DayRecordResponse, LatenessReportResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/scans", post(scan_handler))
        .route("/employees/:employee_id/days/:date", get(day_handler))
        .route("/reports/worked", post(worked_report_handler))
        .route("/reports/lateness", post(lateness_report_handler))
        .with_state(state)
}

/// Maps a JSON body rejection to a `400` error.
fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

/// Renders an engine result as JSON with `status`, or as the mapped error.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    status: StatusCode,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(body),
        )
            .into_response(),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Request rejected"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for `POST /scans`.
///
/// Accepts a scan and returns the stored event with `201 Created`.
async fn scan_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing scan");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(correlation_id, rejection).into_response(),
    };

    let start_time = Instant::now();
    let result = record_scan(&state, request);
    if let Ok(event) = &result {
        info!(
            correlation_id = %correlation_id,
            employee_id = %event.employee_id,
            kind = %event.kind,
            event_id = %event.id,
            duration_us = start_time.elapsed().as_micros(),
            "Scan recorded"
        );
    }
    respond(correlation_id, StatusCode::CREATED, result)
}

/// Decides and stores a scan under the store's write lock.
fn record_scan(state: &AppState, request: ScanRequest) -> EngineResult<AttendanceEvent> {
    let scan = request.into_scan()?;
    let employee = state.config().employee(&scan.employee_id)?;
    let config = state.config().configuration();

    state
        .store()
        .record(&scan.employee_id, scan.date(), |existing| {
            process_scan(&scan, employee, existing, config)
        })
}

/// Handler for `GET /employees/:employee_id/days/:date`.
async fn day_handler(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(String, String)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        date = %date,
        "Fetching day record"
    );
    respond(
        correlation_id,
        StatusCode::OK,
        day_record(&state, &employee_id, &date),
    )
}

fn day_record(state: &AppState, employee_id: &str, date: &str) -> EngineResult<DayRecordResponse> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        EngineError::InvalidTimeFormat {
            value: date.to_string(),
            expected: "YYYY-MM-DD".to_string(),
        }
    })?;
    let employee = state.config().employee(employee_id)?;
    let day = resolve_day(employee, date);

    let events = state.store().events_for_day(employee_id, date);
    let record = DayRecord::from_events(employee_id, date, &events);
    let day_state = record.state();

    Ok(DayRecordResponse {
        employee_id: record.employee_id,
        employee_name: employee.display_name().to_string(),
        date,
        scheduled: day.is_some(),
        state: day_state,
        next_expected: day.and_then(|d| next_expected_kind(day_state, d.is_split())),
        events: record.events,
    })
}

/// Handler for `POST /reports/worked`.
async fn worked_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<WorkedReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing worked-hours report");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(correlation_id, rejection).into_response(),
    };

    respond(correlation_id, StatusCode::OK, worked_report(&state, &request))
}

fn worked_report(state: &AppState, request: &WorkedReportRequest) -> EngineResult<WorkedRangeSummary> {
    let employee = state.config().employee(&request.employee_id)?;
    let events = state.store().events_for_employee(&request.employee_id);
    aggregate_worked(employee, &events, request.from, request.to)
}

/// Handler for `POST /reports/lateness`.
async fn lateness_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<LatenessReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing lateness report");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(correlation_id, rejection).into_response(),
    };

    let result = lateness_report(&state, &request);
    if let Ok(report) = &result {
        info!(
            correlation_id = %correlation_id,
            month = %report.month,
            employees = report.summaries.len(),
            alerts = report.alerts.len(),
            "Lateness report completed"
        );
    }
    respond(correlation_id, StatusCode::OK, result)
}

fn lateness_report(
    state: &AppState,
    request: &LatenessReportRequest,
) -> EngineResult<LatenessReportResponse> {
    let month = request.report_month()?;
    let config = state.config().configuration();

    let summaries = rank_by_lateness(summarize_all(&state.store().all_events(), month, config));
    let alerts = summaries
        .iter()
        .filter_map(|s| lateness_alert(s, config.monthly_limit_for(&s.employee_id)))
        .collect();

    Ok(LatenessReportResponse {
        month,
        summaries,
        alerts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::EventKind;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/attendance").expect("Failed to load config");
        AppState::new(config)
    }

    fn scan_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/scans")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_error(response: Response) -> ApiError {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_scan_returns_201_with_event() {
        let router = create_router(create_test_state());

        // 2026-01-15 is a Thursday
        let response = router
            .oneshot(scan_request(
                r#"{"employee_id": "emp_001", "timestamp": "2026-01-15T08:10:00"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let event: AttendanceEvent = serde_json::from_slice(&body).unwrap();
        assert_eq!(event.kind, EventKind::EntryShift);
        assert_eq!(event.marks.recoverable_late_minutes(), 10);
    }

    #[tokio::test]
    async fn test_exit_before_entry_returns_409_with_expected_next() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(scan_request(
                r#"{"employee_id": "emp_001", "kind": "EXIT_SHIFT", "timestamp": "2026-01-15T17:00:00"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let error = read_error(response).await;
        assert_eq!(error.code, "SEQUENCE_VIOLATION");
        assert_eq!(error.expected_next, Some(EventKind::EntryShift));
    }

    #[tokio::test]
    async fn test_unknown_employee_returns_404() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(scan_request(
                r#"{"employee_id": "emp_999", "timestamp": "2026-01-15T08:00:00"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_error(response).await.code, "EMPLOYEE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_unscheduled_day_returns_422() {
        let router = create_router(create_test_state());

        // 2026-01-17 is a Saturday
        let response = router
            .oneshot(scan_request(
                r#"{"employee_id": "emp_001", "timestamp": "2026-01-17T08:00:00"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(read_error(response).await.code, "SCHEDULE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router.oneshot(scan_request("{invalid json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_error(response).await.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_timestamp_returns_validation_error() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(scan_request(r#"{"employee_id": "emp_001"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = read_error(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(
            error.message.contains("missing field"),
            "Expected error message to mention missing field, got: {}",
            error.message
        );
    }

    #[tokio::test]
    async fn test_bad_timestamp_returns_invalid_time_format() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(scan_request(
                r#"{"employee_id": "emp_001", "timestamp": "yesterday at 8"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_error(response).await.code, "INVALID_TIME_FORMAT");
    }

    #[tokio::test]
    async fn test_day_record_bad_date_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/employees/emp_001/days/15-01-2026")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_error(response).await.code, "INVALID_TIME_FORMAT");
    }
}
