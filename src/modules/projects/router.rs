use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::controller::{create_project, delete_project, get_project, get_projects, update_project};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn init_projects_router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(get_projects))
        .route("/{id}", get(get_project));

    let authenticated = Router::new()
        .route("/", post(create_project))
        .route("/{id}", put(update_project).delete(delete_project))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(authenticated)
}
