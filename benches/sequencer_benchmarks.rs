//! Performance benchmarks for the attendance engine.
//!
//! Covers the hot paths of the scanning and reporting layers:
//! - Single scan decision against a partially recorded split day
//! - A month of scans recorded through the in-memory store
//! - Lateness report over growing event histories
//! - A full day submitted through the HTTP router
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::{Duration, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use attendance_engine::api::{AppState, create_router};
use attendance_engine::calculation::{
    ReportMonth, Scan, process_scan, rank_by_lateness, summarize_all,
};
use attendance_engine::config::ConfigLoader;
use attendance_engine::models::{AttendanceEvent, parse_timestamp};
use attendance_engine::store::{EventStore, InMemoryEventStore};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/attendance").expect("Failed to load config")
}

fn scan(employee_id: &str, timestamp: &str) -> Scan {
    Scan {
        employee_id: employee_id.to_string(),
        kind: None,
        timestamp: parse_timestamp(timestamp).unwrap(),
    }
}

/// Records a Monday-to-Friday history for `employee_id` covering `weeks`
/// weeks, entering `entry_delay` minutes after 08:00.
fn record_history(
    store: &InMemoryEventStore,
    config: &ConfigLoader,
    employee_id: &str,
    weeks: i64,
    entry_delay: i64,
) {
    let employee = config.employee(employee_id).unwrap();
    // 2025-01-06 is a Monday
    let first_monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    for day in 0..weeks * 7 {
        let date = first_monday + Duration::days(day);
        let Some(entry) = date.and_hms_opt(8, 0, 0) else {
            continue;
        };
        for timestamp in [entry + Duration::minutes(entry_delay), entry + Duration::hours(9)] {
            let scan = Scan {
                employee_id: employee_id.to_string(),
                kind: None,
                timestamp,
            };
            // Weekend scans are rejected; only scheduled days are stored.
            let _ = store.record(employee_id, date, |existing| {
                process_scan(&scan, employee, existing, config.configuration())
            });
        }
    }
}

/// Benchmark: a single sequencer decision.
fn bench_process_scan(c: &mut Criterion) {
    let config = load_config();
    let employee = config.employee("emp_002").unwrap();

    // 2026-01-12 is a Monday; emp_002 works a split day.
    let mut existing: Vec<AttendanceEvent> = Vec::new();
    for timestamp in ["2026-01-12T08:05", "2026-01-12T12:00", "2026-01-12T13:00"] {
        let event = process_scan(
            &scan("emp_002", timestamp),
            employee,
            &existing,
            config.configuration(),
        )
        .unwrap();
        existing.push(event);
    }
    let exit = scan("emp_002", "2026-01-12T17:00");

    c.bench_function("process_scan_split_exit", |b| {
        b.iter(|| {
            process_scan(
                black_box(&exit),
                black_box(employee),
                black_box(&existing),
                config.configuration(),
            )
        })
    });
}

/// Benchmark: recording a month of scans through the store.
fn bench_month_of_scans(c: &mut Criterion) {
    let config = load_config();

    let mut group = c.benchmark_group("store_record");
    group.throughput(Throughput::Elements(4 * 7 * 2));
    group.bench_function("four_weeks", |b| {
        b.iter(|| {
            let store = InMemoryEventStore::new();
            record_history(&store, &config, "emp_001", 4, 10);
            black_box(store.len())
        })
    });
    group.finish();
}

/// Benchmark: lateness report scaling with history length.
fn bench_lateness_report(c: &mut Criterion) {
    let config = load_config();
    let month: ReportMonth = "2025-03".parse().unwrap();

    let mut group = c.benchmark_group("lateness_report");
    for weeks in [4_i64, 26, 52] {
        let store = InMemoryEventStore::new();
        record_history(&store, &config, "emp_001", weeks, 30);
        record_history(&store, &config, "emp_003", weeks, 2);
        let events = store.all_events();

        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(weeks), &events, |b, events| {
            b.iter(|| rank_by_lateness(summarize_all(black_box(events), month, config.configuration())))
        });
    }
    group.finish();
}

/// Benchmark: a full continuous day submitted over HTTP.
fn bench_scan_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = load_config();
    let bodies = [
        r#"{"employee_id": "emp_001", "timestamp": "2026-01-15T08:10:00"}"#,
        r#"{"employee_id": "emp_001", "timestamp": "2026-01-15T17:10:00"}"#,
    ];

    c.bench_function("scan_endpoint_full_day", |b| {
        b.to_async(&rt).iter(|| async {
            let router = create_router(AppState::new(config.clone()));
            for body in bodies {
                let response = router
                    .clone()
                    .oneshot(
                        Request::builder()
                            .method("POST")
                            .uri("/scans")
                            .header("Content-Type", "application/json")
                            .body(Body::from(body))
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                black_box(response);
            }
        })
    });
}

criterion_group!(
    benches,
    bench_process_scan,
    bench_month_of_scans,
    bench_lateness_report,
    bench_scan_endpoint,
);
criterion_main!(benches);
