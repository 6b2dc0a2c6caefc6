use crate::docs::ApiDoc;
use crate::logging::{REQUEST_ID_HEADER, logging_middleware};
use crate::middleware::role::require_admin;
use crate::modules::auth::router::init_auth_router;
use crate::modules::events::router::init_events_router;
use crate::modules::projects::router::init_projects_router;
use crate::modules::students::router::init_students_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde_json::json;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router(&state))
                .nest("/users", init_users_router(&state))
                .nest("/events", init_events_router(&state))
                .nest("/projects", init_projects_router(&state))
                .nest(
                    "/students",
                    init_students_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                ),
        )
        .fallback(route_not_found)
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                    HeaderName::from_static(REQUEST_ID_HEADER),
                ])
                .expose_headers([
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    axum::http::header::RETRY_AFTER,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Mod'Art API is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Route not found",
        })),
    )
}
