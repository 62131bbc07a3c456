// libs/availability-cell/tests/handlers_test.rs

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use availability_cell::handlers::{list_days, validate_availability_json};
use availability_cell::models::{DayOfWeek, Time, TimeWindow, WeeklyAvailability};
use availability_cell::router::availability_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{FormBody, TestConfig};

fn create_test_config() -> Arc<AppConfig> {
    TestConfig::default().to_arc()
}

fn app() -> Router {
    availability_routes(create_test_config())
}

async fn post_form(app: Router, body: FormBody) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/validate")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.encode()))
        .unwrap();

    send(app, request).await
}

async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/validate/json")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// ==============================================================================
// FORM SUBMISSIONS
// ==============================================================================

#[tokio::test]
async fn test_form_with_overlap_reports_day() {
    let body = FormBody::new()
        .window("Monday", 0, (9, 0, "AM"), (12, 0, "PM"))
        .window("Monday", 1, (1, 0, "PM"), (5, 0, "PM"))
        .window("Tuesday", 0, (9, 0, "AM"), (5, 0, "PM"))
        .window("Tuesday", 1, (10, 0, "AM"), (11, 0, "AM"));

    let (status, json) = post_form(app(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], false);
    assert_eq!(json["days_with_overlap"], json!(["Tuesday"]));
}

#[tokio::test]
async fn test_form_without_overlap_is_valid() {
    let body = FormBody::new()
        .window("Wednesday", 0, (9, 0, "AM"), (10, 0, "AM"))
        .window("Wednesday", 1, (10, 30, "AM"), (11, 0, "AM"))
        .field("Sunday", "");

    let (status, json) = post_form(app(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], true);
    assert_eq!(json["days_with_overlap"], json!([]));
}

#[tokio::test]
async fn test_form_decode_error_names_field() {
    let body = FormBody::new().window("Friday", 0, (9, 75, "AM"), (10, 0, "AM"));

    let (status, json) = post_form(app(), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "Friday.0.start.minute");
    assert_eq!(json["error"], "must be between 0 and 59");
}

#[tokio::test]
async fn test_form_window_limit_comes_from_config() {
    let config = Arc::new(TestConfig { max_windows_per_day: 1, ..TestConfig::default() }.to_app_config());
    let body = FormBody::new()
        .window("Monday", 0, (6, 0, "AM"), (7, 0, "AM"))
        .window("Monday", 1, (8, 0, "AM"), (9, 0, "AM"));

    let (status, json) = post_form(availability_routes(config), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "Monday");
}

#[tokio::test]
async fn test_form_repeated_day_in_other_case_is_rejected() {
    let body = FormBody::new()
        .window("Monday", 0, (9, 0, "AM"), (5, 0, "PM"))
        .window("monday", 0, (10, 0, "AM"), (11, 0, "AM"));

    let (status, json) = post_form(app(), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "monday");
    assert_eq!(json["error"], "repeats 'Monday'");
}

// ==============================================================================
// JSON SUBMISSIONS
// ==============================================================================

#[tokio::test]
async fn test_json_with_overlap_reports_day() {
    let body = json!({
        "Thursday": [
            { "start": { "hour": 2, "minute": 0, "meridiem": "PM" }, "end": { "hour": 4, "minute": 0, "meridiem": "PM" } },
            { "start": { "hour": 4, "minute": 0, "meridiem": "PM" }, "end": { "hour": 6, "minute": 0, "meridiem": "PM" } }
        ],
        "Saturday": []
    });

    let (status, json) = post_json(app(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], false);
    assert_eq!(json["days_with_overlap"], json!(["Thursday"]));
}

#[tokio::test]
async fn test_json_out_of_range_hour_is_rejected() {
    let body = json!({
        "Monday": [
            { "start": { "hour": 0, "minute": 0, "meridiem": "AM" }, "end": { "hour": 4, "minute": 0, "meridiem": "PM" } }
        ]
    });

    let (status, json) = post_json(app(), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "Monday.0.start.hour");
}

#[tokio::test]
async fn test_json_unknown_day_is_a_json_bad_request() {
    let (status, json) = post_json(app(), json!({ "Funday": [] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().is_some_and(|msg| msg.contains("Funday")));
}

#[tokio::test]
async fn test_json_malformed_body_is_a_json_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/validate/json")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"Monday\": ["))
        .unwrap();

    let (status, json) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_json_without_content_type_is_a_json_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/validate/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, json) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_json_handler_direct_call() {
    let availability = WeeklyAvailability::new().with_day(
        DayOfWeek::Monday,
        vec![TimeWindow::new(Time::am(9, 0), Time::pm(5, 0))],
    );

    let Json(value) = validate_availability_json(State(create_test_config()), Ok(Json(availability)))
        .await
        .unwrap();

    assert_eq!(value["valid"], true);
}

// ==============================================================================
// DAY LIST
// ==============================================================================

#[tokio::test]
async fn test_days_route_lists_week() {
    let request = Request::builder().uri("/days").body(Body::empty()).unwrap();

    let (status, json) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["days"],
        json!(["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"])
    );
}

#[test]
fn test_list_days_handler_blocking() {
    let Json(value) = tokio_test::block_on(list_days());
    assert_eq!(value["days"].as_array().map(Vec::len), Some(7));
}
