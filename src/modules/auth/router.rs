use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::controller::{change_password, get_profile, login, logout, refresh_token, register};
use crate::middleware::auth::require_auth;
use crate::middleware::rate_limit::limit_login_attempts;
use crate::state::AppState;

pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register))
        .route(
            "/login",
            post(login).layer(middleware::from_fn_with_state(
                state.clone(),
                limit_login_attempts,
            )),
        )
        .route("/refresh", post(refresh_token));

    let authenticated = Router::new()
        .route("/profile", get(get_profile))
        .route("/change-password", put(change_password))
        .route("/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(authenticated)
}
