use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::controller::{
    create_event, delete_event, get_active_events, get_event, get_events, update_event,
};
use crate::middleware::role::require_admin;
use crate::state::AppState;

pub fn init_events_router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(get_events))
        .route("/active", get(get_active_events))
        .route("/{id}", get(get_event));

    let admin = Router::new()
        .route("/", post(create_event))
        .route("/{id}", put(update_event).delete(delete_event))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    public.merge(admin)
}
