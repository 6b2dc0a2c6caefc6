mod common;

use axum::http::StatusCode;
use common::{TestApp, body_json, empty_request, json_request, unique_email};
use modart::modart_auth::Role;
use modart::store::AccountStore;
use modart::utils::email::RecordingMailer;
use serde_json::{Value, json};

fn student(first: &str, last: &str, email: &str) -> Value {
    json!({ "firstName": first, "lastName": last, "email": email })
}

#[tokio::test]
async fn test_batch_requires_admin() {
    let app = TestApp::new();
    let (_, student_token) = app.seed_user(&unique_email(), Role::Student).await;
    let body = json!({ "students": [student("Jeanne", "Lanvin", &unique_email())] });

    let response = app
        .send(json_request(
            "POST",
            "/api/students/batch-create",
            None,
            body.clone(),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(json_request(
            "POST",
            "/api/students/batch-create",
            Some(&student_token),
            body,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["error"],
        "Access denied. Insufficient permissions"
    );
}

#[tokio::test]
async fn test_oversized_batch_creates_nothing() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user(&unique_email(), Role::Admin).await;

    let students: Vec<Value> = (0..101)
        .map(|i| student("Jeanne", "Lanvin", &format!("student{i}@modart.fr")))
        .collect();

    let response = app
        .send(json_request(
            "POST",
            "/api/students/batch-create",
            Some(&admin_token),
            json!({ "students": students }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Maximum 100 students per batch"
    );
    assert_eq!(app.accounts.len().await, 1);
}

#[tokio::test]
async fn test_empty_or_missing_batch_is_rejected() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user(&unique_email(), Role::Admin).await;

    for body in [json!({ "students": [] }), json!({}), json!({ "students": "x" })] {
        let response = app
            .send(json_request(
                "POST",
                "/api/students/batch-create",
                Some(&admin_token),
                body,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "A non-empty array of students is required"
        );
    }
}

#[tokio::test]
async fn test_partial_batch_reports_multi_status() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user(&unique_email(), Role::Admin).await;
    let taken = unique_email();
    app.seed_user(&taken, Role::Student).await;
    let fresh = unique_email();

    let response = app
        .send(json_request(
            "POST",
            "/api/students/batch-create",
            Some(&admin_token),
            json!({ "students": [
                student("Jeanne", "Lanvin", &fresh),
                student("Coco", "Chanel", &taken),
                student("J", "Lanvin", &unique_email()),
            ]}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::MULTI_STATUS);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "1 student(s) created successfully, 2 failure(s)"
    );
    assert_eq!(body["data"]["summary"]["total"], 3);
    assert_eq!(body["data"]["summary"]["succeeded"], 1);
    assert_eq!(body["data"]["summary"]["failed"], 2);

    let results = body["data"]["results"].as_array().unwrap();
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[0]["emailSent"], true);
    assert_eq!(results[1]["error"], "User with this email already exists");
    assert_eq!(results[2]["error"], "First name must be at least 2 characters");
    assert_eq!(results[2]["student"]["firstName"], "J");

    let sent = app.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_email, fresh);

    let created = app
        .accounts
        .find_credentials_by_email(&fresh)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.account.role, Role::Student);
    assert!(created.account.is_temporary_password);
    assert!(created.account.must_change_password);
}

#[tokio::test]
async fn test_all_failed_batch_is_bad_request() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user(&unique_email(), Role::Admin).await;

    let response = app
        .send(json_request(
            "POST",
            "/api/students/batch-create",
            Some(&admin_token),
            json!({ "students": [student("Jeanne", "Lanvin", "nope"), 42] }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["summary"]["failed"], 2);
}

#[tokio::test]
async fn test_email_failure_keeps_created_account() {
    let app = TestApp::with_mailer(RecordingMailer::failing());
    let (_, admin_token) = app.seed_user(&unique_email(), Role::Admin).await;
    let email = unique_email();

    let response = app
        .send(json_request(
            "POST",
            "/api/students/batch-create",
            Some(&admin_token),
            json!({ "students": [student("Jeanne", "Lanvin", &email)] }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    let result = &body["data"]["results"][0];
    assert_eq!(result["success"], true);
    assert_eq!(result["emailSent"], false);
    assert!(result["emailError"].as_str().is_some());
    assert!(app.accounts.email_exists(&email).await.unwrap());
}

#[tokio::test]
async fn test_student_stats() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user(&unique_email(), Role::Admin).await;
    app.seed_user(&unique_email(), Role::Student).await;

    let response = app
        .send(json_request(
            "POST",
            "/api/students/batch-create",
            Some(&admin_token),
            json!({ "students": [student("Jeanne", "Lanvin", &unique_email())] }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .send(empty_request("GET", "/api/students/stats", Some(&admin_token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = &body_json(response).await["data"];
    assert_eq!(stats["totalStudents"], 2);
    assert_eq!(stats["activeStudents"], 2);
    assert_eq!(stats["studentsWithTemporaryPassword"], 1);
    assert_eq!(stats["studentsMustChangePassword"], 1);
    assert_eq!(stats["inactiveStudents"], 0);
}

#[tokio::test]
async fn test_full_size_batch_is_processed() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user(&unique_email(), Role::Admin).await;
    let first = unique_email();
    let last = unique_email();

    // Invalid entries fail before any password is hashed
    let mut students: Vec<Value> = (1..99)
        .map(|i| student("Jeanne", "Lanvin", &format!("not-an-email-{i}")))
        .collect();
    students.insert(0, student("Jeanne", "Lanvin", &first));
    students.push(student("Coco", "Chanel", &last));
    assert_eq!(students.len(), 100);

    let response = app
        .send(json_request(
            "POST",
            "/api/students/batch-create",
            Some(&admin_token),
            json!({ "students": students }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::MULTI_STATUS);

    let body = body_json(response).await;
    assert_eq!(body["data"]["summary"]["total"], 100);
    assert_eq!(body["data"]["summary"]["succeeded"], 2);
    assert_eq!(body["data"]["summary"]["failed"], 98);
    let results = body["data"]["results"].as_array().unwrap();
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[1]["error"], "Invalid email format");
    assert_eq!(results[99]["success"], true);
    assert!(app.accounts.email_exists(&last).await.unwrap());
}

#[tokio::test]
async fn test_repeated_email_within_batch() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user(&unique_email(), Role::Admin).await;
    let email = unique_email();

    let response = app
        .send(json_request(
            "POST",
            "/api/students/batch-create",
            Some(&admin_token),
            json!({ "students": [
                student("Jeanne", "Lanvin", &email),
                student("Coco", "Chanel", &email.to_uppercase()),
            ]}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::MULTI_STATUS);

    let body = body_json(response).await;
    let results = body["data"]["results"].as_array().unwrap();
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[1]["success"], false);
    assert_eq!(results[1]["error"], "User with this email already exists");

    // Admin plus the first entry only
    assert_eq!(app.accounts.len().await, 2);
    let sent = app.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_name, "Jeanne Lanvin");
}

#[tokio::test]
async fn test_emailed_temporary_password_logs_in_until_changed() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user(&unique_email(), Role::Admin).await;
    let email = unique_email();

    let response = app
        .send(json_request(
            "POST",
            "/api/students/batch-create",
            Some(&admin_token),
            json!({ "students": [student("Jeanne", "Lanvin", &email)] }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let sent = app.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    let body = &sent[0].text_body;
    let temporary_password = body
        .lines()
        .find_map(|line| line.strip_prefix("Temporary password: "))
        .unwrap()
        .to_string();
    assert_eq!(body.matches(temporary_password.as_str()).count(), 1);

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": email, "password": temporary_password }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let login = body_json(response).await;
    assert_eq!(login["data"]["user"]["mustChangePassword"], true);
    let token = login["data"]["token"].as_str().unwrap().to_string();

    let response = app
        .send(json_request(
            "PUT",
            "/api/auth/change-password",
            Some(&token),
            json!({ "currentPassword": temporary_password, "newPassword": "atelier2026" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": email, "password": temporary_password }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
