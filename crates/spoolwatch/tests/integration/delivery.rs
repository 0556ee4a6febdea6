/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use spoolwatch::{
    Delivery, DeliveryClient, DeliveryOutcome, Extractor, JobDetail, JobLine, JobRecord,
};

use crate::fixtures::{closed_port, spawn_endpoint};

type Received = Arc<Mutex<Vec<Value>>>;

fn record() -> JobRecord {
    let now = Utc.with_ymd_and_hms(2025, 6, 11, 10, 30, 0).unwrap();
    Extractor::new("WS-01").assemble(
        JobLine {
            printer_name: "HP LaserJet".to_string(),
            spooler_job_id: "42".to_string(),
            user_name: "alice".to_string(),
        },
        JobDetail {
            document_name: Some("report.pdf".to_string()),
            page_count: Some(3),
            file_size: Some(20480),
        },
        now,
    )
}

async fn collect(State(received): State<Received>, Json(body): Json<Value>) -> StatusCode {
    received.lock().unwrap().push(body);
    StatusCode::CREATED
}

fn client_for(addr: std::net::SocketAddr, timeout: Duration) -> DeliveryClient {
    DeliveryClient::new(&format!("http://{}/api/print-jobs", addr), timeout).unwrap()
}

#[tokio::test]
async fn test_created_response_is_delivered() {
    let received: Received = Arc::default();
    let router = Router::new()
        .route("/api/print-jobs", post(collect))
        .with_state(received.clone());
    let addr = spawn_endpoint(router).await;

    let outcome = client_for(addr, Duration::from_secs(5))
        .deliver(&record())
        .await;

    assert_eq!(outcome, DeliveryOutcome::Delivered);
    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["jobId"], "cups-42-1749637800");
    assert_eq!(body["userName"], "alice");
    assert_eq!(body["machineName"], "WS-01");
    assert_eq!(body["printerName"], "HP LaserJet");
    assert_eq!(body["documentName"], "report.pdf");
    assert_eq!(body["pageCount"], 3);
    assert_eq!(body["printTime"], "2025-06-11T10:30:00Z");
    assert_eq!(body["status"], "completed");
    assert_eq!(body["fileSize"], 20480);
}

#[tokio::test]
async fn test_error_status_is_rejected_with_body() {
    let router = Router::new().route(
        "/api/print-jobs",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable") }),
    );
    let addr = spawn_endpoint(router).await;

    let outcome = client_for(addr, Duration::from_secs(5))
        .deliver(&record())
        .await;

    assert_eq!(
        outcome,
        DeliveryOutcome::Rejected {
            status: 500,
            body: "database unavailable".to_string(),
        }
    );
}

#[tokio::test]
async fn test_success_status_other_than_created_is_rejected() {
    let router = Router::new().route("/api/print-jobs", post(|| async { StatusCode::OK }));
    let addr = spawn_endpoint(router).await;

    let outcome = client_for(addr, Duration::from_secs(5))
        .deliver(&record())
        .await;

    assert!(matches!(outcome, DeliveryOutcome::Rejected { status: 200, .. }));
}

#[tokio::test]
async fn test_refused_connection_is_unreachable() {
    let addr = closed_port().await;

    let outcome = client_for(addr, Duration::from_secs(5))
        .deliver(&record())
        .await;

    assert!(matches!(outcome, DeliveryOutcome::Unreachable { .. }));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let router = Router::new().route(
        "/api/print-jobs",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            StatusCode::CREATED
        }),
    );
    let addr = spawn_endpoint(router).await;

    let outcome = client_for(addr, Duration::from_millis(200))
        .deliver(&record())
        .await;

    assert_eq!(outcome, DeliveryOutcome::TimedOut);
}

#[tokio::test]
async fn test_health_check_hits_derived_url() {
    let router = Router::new().route("/api/health", get(|| async { "ok" }));
    let addr = spawn_endpoint(router).await;

    assert!(client_for(addr, Duration::from_secs(5)).health_check().await);
}

#[tokio::test]
async fn test_health_check_false_on_non_ok_or_unreachable() {
    let router = Router::new().route(
        "/api/health",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let addr = spawn_endpoint(router).await;
    assert!(!client_for(addr, Duration::from_secs(5)).health_check().await);

    let addr = closed_port().await;
    assert!(!client_for(addr, Duration::from_secs(5)).health_check().await);
}
