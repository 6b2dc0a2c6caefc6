mod common;

use axum::http::StatusCode;
use common::{TestApp, body_json, empty_request, json_request, unique_email};
use modart::modart_auth::Role;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_admin_creates_and_lists_users() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user(&unique_email(), Role::Admin).await;
    let email = unique_email();

    let response = app
        .send(json_request(
            "POST",
            "/api/users/add-user",
            Some(&admin_token),
            json!({
                "name": "Elsa Schiaparelli",
                "email": email,
                "password": "secret1",
                "role": "admin"
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["role"], "admin");

    let response = app
        .send(empty_request("GET", "/api/users", Some(&admin_token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Retrieved 2 users");
    // Newest first
    assert_eq!(body["data"][0]["email"], email);
}

#[tokio::test]
async fn test_user_management_requires_admin() {
    let app = TestApp::new();
    let (student_id, student_token) = app.seed_user(&unique_email(), Role::Student).await;

    let response = app.send(empty_request("GET", "/api/users", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(empty_request("GET", "/api/users", Some(&student_token)))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let uri = format!("/api/users/{student_id}/deactivate");
    let response = app
        .send(empty_request("PATCH", &uri, Some(&student_token)))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let uri = format!("/api/users/{student_id}");
    let response = app
        .send(empty_request("DELETE", &uri, Some(&student_token)))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_users_read_and_update_themselves_only() {
    let app = TestApp::new();
    let (me, my_token) = app.seed_user(&unique_email(), Role::Student).await;
    let (other, _) = app.seed_user(&unique_email(), Role::Student).await;

    let response = app
        .send(empty_request("GET", &format!("/api/users/{me}"), Some(&my_token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(empty_request(
            "GET",
            &format!("/api/users/{other}"),
            Some(&my_token),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(json_request(
            "PUT",
            &format!("/api/users/{me}"),
            Some(&my_token),
            json!({ "name": "Madeleine Vionnet", "age": 25 }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Madeleine Vionnet");
    assert_eq!(body["data"]["age"], 25);

    let response = app
        .send(json_request(
            "PUT",
            &format!("/api/users/{me}"),
            Some(&my_token),
            json!({ "role": "admin" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deactivated_user_cannot_refresh() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user(&unique_email(), Role::Admin).await;
    let email = unique_email();
    let (student_id, _) = app.seed_user(&email, Role::Student).await;

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": email, "password": common::TEST_PASSWORD }),
        ))
        .await;
    let refresh_token = body_json(response).await["data"]["refreshToken"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .send(empty_request(
            "PATCH",
            &format!("/api/users/{student_id}/deactivate"),
            Some(&admin_token),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["isActive"], false);
    assert!(app.accounts.refresh_token_of(student_id).await.is_none());

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/refresh",
            None,
            json!({ "refreshToken": refresh_token }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user(&unique_email(), Role::Admin).await;
    let (student_id, _) = app.seed_user(&unique_email(), Role::Student).await;
    let uri = format!("/api/users/{student_id}");

    let response = app
        .send(empty_request("DELETE", &uri, Some(&admin_token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "User deleted successfully"
    );

    let response = app
        .send(empty_request("DELETE", &uri, Some(&admin_token)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send(empty_request(
            "GET",
            &format!("/api/users/{}", Uuid::new_v4()),
            Some(&admin_token),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
