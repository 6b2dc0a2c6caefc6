use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{batch_create_students, get_student_stats};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/batch-create", post(batch_create_students))
        .route("/stats", get(get_student_stats))
}
