use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use seal_server::handles::TimeRangeBody;
use seal_server::models::DetectionStatus;

use crate::common::mock_app::{MockApp, TIME_RANGE_TOPIC};

mod common;

async fn submit(app: &MockApp, body: &TimeRangeBody) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri("/api/time-range")
        .method(Method::POST)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, serde_json::from_slice(&body).unwrap())
}

fn range(start_hour: u8, start_minute: u8, end_hour: u8, end_minute: u8) -> TimeRangeBody {
    TimeRangeBody {
        start_hour: Some(start_hour),
        start_minute: Some(start_minute),
        end_hour: Some(end_hour),
        end_minute: Some(end_minute),
    }
}

#[tokio::test]
async fn test_submit_publishes_payload() {
    let app = MockApp::new();

    let (status, body) = submit(&app, &range(8, 0, 12, 0)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Time Updated: 08:00 - 12:00" }));

    let sent = app.publisher.sent.lock().unwrap().clone();
    assert_eq!(sent, vec![(TIME_RANGE_TOPIC.to_string(), "480 720".to_string())]);
}

#[tokio::test]
async fn test_submit_encodes_raw_minute_totals() {
    let app = MockApp::new();

    submit(&app, &range(0, 0, 0, 5)).await;
    submit(&app, &range(23, 55, 0, 0)).await;
    submit(&app, &range(7, 30, 18, 45)).await;

    assert_eq!(app.sent_payloads(), vec!["0 5", "1435 0", "450 1125"]);
}

#[tokio::test]
async fn test_missing_hour_is_rejected_before_publish() {
    let app = MockApp::new();

    let (status, body) = submit(
        &app,
        &TimeRangeBody {
            start_hour: None,
            start_minute: Some(0),
            end_hour: Some(10),
            end_minute: Some(0),
        },
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], json!("Please select valid times."));
    assert!(app.sent_payloads().is_empty());
}

#[tokio::test]
async fn test_disconnected_publisher_reports_cause() {
    let app = MockApp::with_publisher(false);
    app.deliver(b"motion_detected");

    let (status, body) = submit(&app, &range(8, 0, 9, 0)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["message"], json!("Failed to send: not connected to broker"));
    assert_eq!(app.status.read_status(), DetectionStatus::PersonDetected);
    assert!(app.sent_payloads().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = MockApp::new();

    let request = Request::builder()
        .uri("/api/time-range")
        .method(Method::POST)
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"start_hour": "eight"}"#))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["code"], json!(400));
    assert!(app.sent_payloads().is_empty());
}

#[tokio::test]
async fn test_out_of_range_hour_is_bad_request() {
    let app = MockApp::new();

    let request = Request::builder()
        .uri("/api/time-range")
        .method(Method::POST)
        .header("Content-Type", "application/json")
        .body(Body::from(
            r#"{"start_hour": 4294967295, "start_minute": 0, "end_hour": 10, "end_minute": 0}"#,
        ))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["code"], json!(400));
    assert!(app.sent_payloads().is_empty());
}
