mod common;

use axum::http::StatusCode;
use common::{TestApp, body_json, empty_request, json_request, unique_email};
use modart::modart_auth::Role;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let response = app.send(empty_request("GET", "/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Mod'Art API is running");
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::new();

    let response = app.send(empty_request("GET", "/health", None)).await;
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert!(Uuid::parse_str(generated).is_ok());

    let mut request = empty_request("GET", "/health", None);
    request
        .headers_mut()
        .insert("x-request-id", "gateway-42".parse().unwrap());
    let response = app.send(request).await;
    assert_eq!(response.headers()["x-request-id"], "gateway-42");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new();

    let response = app
        .send(empty_request("GET", "/api/does-not-exist", None))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_event_writes_require_admin() {
    let app = TestApp::new();
    let (_, student_token) = app.seed_user(&unique_email(), Role::Student).await;
    let event = json!({
        "title": "Graduation show",
        "description": "Final collections",
        "startDate": "2026-06-01T18:00:00Z",
        "endDate": "2026-06-01T22:00:00Z",
        "location": "Paris"
    });
    let uri = format!("/api/events/{}", Uuid::new_v4());

    let response = app
        .send(json_request("POST", "/api/events", None, event.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(json_request(
            "POST",
            "/api/events",
            Some(&student_token),
            event.clone(),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(json_request("PUT", &uri, Some(&student_token), event))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(empty_request("DELETE", &uri, Some(&student_token)))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_event_dates_are_validated() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user(&unique_email(), Role::Admin).await;

    let response = app
        .send(json_request(
            "POST",
            "/api/events",
            Some(&admin_token),
            json!({
                "title": "Backwards",
                "description": "Ends before it starts",
                "startDate": "2026-06-02T18:00:00Z",
                "endDate": "2026-06-01T18:00:00Z",
                "location": "Paris"
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("End date must be after start date")
    );
}

#[tokio::test]
async fn test_project_writes_require_authentication() {
    let app = TestApp::new();
    let uri = format!("/api/projects/{}", Uuid::new_v4());

    let response = app
        .send(json_request(
            "POST",
            "/api/projects",
            None,
            json!({ "title": "Capsule", "description": "Spring line" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(json_request("PUT", &uri, None, json!({ "title": "Renamed" })))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.send(empty_request("DELETE", &uri, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_project_payload_is_validated_before_storage() {
    let app = TestApp::new();
    let (_, token) = app.seed_user(&unique_email(), Role::Student).await;

    let response = app
        .send(json_request(
            "POST",
            "/api/projects",
            Some(&token),
            json!({ "title": "", "description": "Spring line", "externalUrl": "not a url" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
}
