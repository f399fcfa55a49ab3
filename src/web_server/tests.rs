use super::server::{create_router, WebServer};
use super::AppState;
use crate::config::{AdminConfig, ServerConfig};
use crate::directory::Directory;
use crate::queue::create_shared_manager;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_state() -> AppState {
    AppState::new(
        create_shared_manager(),
        Directory::from_seed().unwrap().into_shared(),
        AdminConfig::default(),
    )
}

fn make_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(make_request(method, uri, body))
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn submit(app: &Router, name: &str, priority: &str) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/api/tokens",
        Some(json!({
            "patientName": name,
            "age": "34",
            "gender": "Female",
            "problem": "ENT",
            "priority": priority
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["data"].clone()
}

#[test]
fn test_web_server_creation() {
    let config = ServerConfig {
        port: 8080,
        ..ServerConfig::default()
    };
    let web_server = WebServer::new(&config, test_state());

    assert_eq!(web_server.port, 8080);
    assert_eq!(web_server.host, "127.0.0.1");
}

#[tokio::test]
async fn test_root_banner() {
    let app = create_router(test_state());
    let (status, json) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["endpoints"]["tokens"], "/api/tokens");
}

#[tokio::test]
async fn test_submit_token() {
    let app = create_router(test_state());
    let token = submit(&app, "Asha", "normal").await;

    assert_eq!(token["tokenNumber"], "Q001");
    assert_eq!(token["status"], "Waiting");
    assert_eq!(token["age"], 34);
    assert_eq!(token["priority"], "normal");
}

#[tokio::test]
async fn test_submit_missing_fields_rejected() {
    let app = create_router(test_state());
    let (status, json) = send(
        &app,
        "POST",
        "/api/tokens",
        Some(json!({ "patientName": "Asha" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(
        json["message"],
        "Missing required: patientName, problem (department)"
    );

    let (_, json) = send(&app, "GET", "/api/tokens/stats", None).await;
    assert_eq!(json["data"]["total"], 0);
}

#[tokio::test]
async fn test_malformed_json_rejected_with_envelope() {
    let app = create_router(test_state());
    let request = Request::builder()
        .method("POST")
        .uri("/api/tokens")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), 4096).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_emergency_called_first() {
    let app = create_router(test_state());
    let a = submit(&app, "A", "normal").await;
    let b = submit(&app, "B", "emergency").await;

    let (_, json) = send(&app, "GET", "/api/tokens", None).await;
    assert_eq!(json["data"][0]["id"], a["id"]);
    assert_eq!(json["stats"]["tokens"][0]["id"], b["id"]);
    assert_eq!(json["stats"]["tokens"][1]["id"], a["id"]);

    let (status, json) = send(&app, "POST", "/api/tokens/call-next", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], b["id"]);
    assert_eq!(json["data"]["status"], "In Progress");
}

#[tokio::test]
async fn test_call_next_on_empty_queue_returns_null() {
    let app = create_router(test_state());
    let (status, json) = send(&app, "POST", "/api/tokens/call-next", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert!(json["data"].is_null());

    let (_, json) = send(&app, "POST", "/api/tokens/mark-completed", None).await;
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn test_mark_completed_and_stats() {
    let app = create_router(test_state());
    for name in ["A", "B", "C"] {
        submit(&app, name, "normal").await;
    }

    let (_, json) = send(&app, "GET", "/api/tokens/stats", None).await;
    assert_eq!(json["data"]["waitingCount"], 3);
    assert_eq!(json["data"]["estimatedWaitMinutes"], 15);

    send(&app, "POST", "/api/tokens/call-next", None).await;
    let (_, json) = send(&app, "POST", "/api/tokens/mark-completed", None).await;
    assert_eq!(json["data"]["patientName"], "A");
    assert_eq!(json["data"]["status"], "Completed");

    let (_, json) = send(&app, "GET", "/api/tokens/stats", None).await;
    assert_eq!(json["data"]["completedCount"], 1);
    assert_eq!(json["data"]["waitingCount"], 2);
    assert!(json["data"]["currentServing"].is_null());
}

#[tokio::test]
async fn test_remove_token() {
    let app = create_router(test_state());
    let token = submit(&app, "A", "normal").await;
    let uri = format!("/api/tokens/{}", token["id"].as_str().unwrap());

    let (status, json) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], token["id"]);
    assert_eq!(json["message"], "Patient removed from queue");

    let (status, json) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Token not found");
}

#[tokio::test]
async fn test_clear_queue_resets_numbers() {
    let app = create_router(test_state());
    submit(&app, "A", "normal").await;
    submit(&app, "B", "normal").await;

    let (status, json) = send(&app, "DELETE", "/api/tokens", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], json!([]));
    assert_eq!(json["message"], "Queue cleared");

    let token = submit(&app, "C", "normal").await;
    assert_eq!(token["tokenNumber"], "Q001");
}

#[tokio::test]
async fn test_departments_and_doctors() {
    let app = create_router(test_state());

    let (_, json) = send(&app, "GET", "/api/departments", None).await;
    assert_eq!(json["count"], 10);

    let (status, _) = send(&app, "GET", "/api/departments/dept-404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = send(&app, "GET", "/api/doctors?department=neuro", None).await;
    assert_eq!(json["count"], 3);

    let (status, json) = send(
        &app,
        "POST",
        "/api/doctors",
        Some(json!({ "name": "Dr. New", "experience": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["id"], "doc-20");
    assert_eq!(json["data"]["onDuty"], false);

    let (status, json) = send(&app, "POST", "/api/doctors", Some(json!({ "name": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Name is required");

    let (_, json) = send(&app, "PATCH", "/api/doctors/doc-20/toggle-duty", None).await;
    assert_eq!(json["data"]["onDuty"], true);

    let (status, _) = send(&app, "DELETE", "/api/doctors/doc-20", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/api/doctors/doc-20", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_appointments() {
    let app = create_router(test_state());
    let (status, json) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(json!({
            "patientName": "Kiran Shah",
            "phone": "9000012345",
            "department": "Dental",
            "date": "2026-05-04",
            "timeSlot": "11:00 AM"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["status"], "Pending");
    assert_eq!(json["message"], "Appointment submitted successfully");

    let (_, json) = send(&app, "GET", "/api/appointments/search?q=kiran", None).await;
    assert_eq!(json["count"], 1);

    let (_, json) = send(&app, "GET", "/api/appointments/search", None).await;
    assert_eq!(json["count"], 0);

    let (status, _) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(json!({ "patientName": "No Date" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hospital_info() {
    let app = create_router(test_state());
    let (_, json) = send(&app, "GET", "/api/hospital/stats", None).await;
    assert_eq!(json["data"]["totalDoctors"], 45);

    let (_, json) = send(&app, "GET", "/api/hospital/services", None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_admin_login() {
    let app = create_router(test_state());
    let (status, json) = send(
        &app,
        "POST",
        "/api/admin/login",
        Some(json!({ "username": "admin", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Login successful");

    let (status, json) = send(
        &app,
        "POST",
        "/api/admin/login",
        Some(json!({ "username": "admin", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Invalid credentials");

    let (status, _) = send(&app, "POST", "/api/admin/login", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_stats_reads_queue() {
    let app = create_router(test_state());
    submit(&app, "A", "normal").await;
    submit(&app, "B", "emergency").await;
    send(&app, "PATCH", "/api/doctors/doc-1/toggle-duty", None).await;

    let (status, json) = send(&app, "GET", "/api/admin/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["totalPatientsToday"], 2);
    assert_eq!(json["data"]["activeQueuesCount"], 1);
    assert_eq!(json["data"]["appointmentsToday"], 0);
    assert_eq!(json["data"]["doctorsOnDuty"][0]["id"], "doc-1");
}
