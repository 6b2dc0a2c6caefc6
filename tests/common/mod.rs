#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;
use uuid::Uuid;

use modart::modart_auth::{Role, create_access_token};
use modart::modart_config::{CorsConfig, EmailConfig, JwtConfig, RateLimitConfig};
use modart::modart_core::hash_password;
use modart::modart_models::accounts::NewAccount;
use modart::router::init_router;
use modart::state::AppState;
use modart::store::{AccountStore, InMemoryAccountStore};
use modart::utils::email::RecordingMailer;

pub const TEST_PASSWORD: &str = "password123";

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "modart-test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn email_config() -> EmailConfig {
    EmailConfig {
        enabled: false,
        smtp_host: "localhost".to_string(),
        smtp_port: 1025,
        smtp_username: String::new(),
        smtp_password: String::new(),
        from_email: "noreply@modart.fr".to_string(),
        from_name: "Mod'Art International".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
    }
}

/// An application wired to in-memory collaborators. The database pool never
/// connects unless a handler touches it.
pub struct TestApp {
    pub router: Router,
    pub accounts: Arc<InMemoryAccountStore>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(RecordingMailer::new(), RateLimitConfig::default())
    }

    pub fn with_mailer(mailer: RecordingMailer) -> Self {
        Self::build(mailer, RateLimitConfig::default())
    }

    pub fn with_rate_limit(config: RateLimitConfig) -> Self {
        Self::build(RecordingMailer::new(), config)
    }

    fn build(mailer: RecordingMailer, rate_limit_config: RateLimitConfig) -> Self {
        let db = modart::modart_db::lazy_db_pool("postgres://localhost/modart_test").unwrap();
        let accounts = Arc::new(InMemoryAccountStore::new());
        let mailer = Arc::new(mailer);

        let state = AppState::new(
            db,
            accounts.clone(),
            mailer.clone(),
            jwt_config(),
            email_config(),
            CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            },
            rate_limit_config,
        );

        Self {
            router: init_router(state),
            accounts,
            mailer,
        }
    }

    /// Seeds an account with [`TEST_PASSWORD`] and returns it with an access
    /// token.
    pub async fn seed_user(&self, email: &str, role: Role) -> (Uuid, String) {
        let account = self
            .accounts
            .create(NewAccount {
                name: "Test User".to_string(),
                email: email.to_string(),
                password_hash: hash_password(TEST_PASSWORD).unwrap(),
                age: Some(21),
                role,
                is_temporary_password: false,
                must_change_password: false,
            })
            .await
            .unwrap();

        let token =
            create_access_token(account.id, &account.email, account.role, &jwt_config()).unwrap();
        (account.id, token)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        use tower::ServiceExt;
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn unique_email() -> String {
    format!("test-{}@modart.fr", Uuid::new_v4())
}
