use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use super::controller::{
    create_user, deactivate_user, delete_user, get_user, get_user_projects, get_users,
    update_user,
};
use crate::middleware::auth::require_auth;
use crate::middleware::role::require_admin;
use crate::state::AppState;

pub fn init_users_router(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(get_users))
        .route("/add-user", post(create_user))
        .route("/{id}", delete(delete_user))
        .route("/{id}/deactivate", patch(deactivate_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let members = Router::new()
        .route("/{id}", get(get_user).put(update_user))
        .route("/{id}/projects", get(get_user_projects))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    admin.merge(members)
}
