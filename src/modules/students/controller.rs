use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use modart_core::{ApiResponse, AppError, ErrorResponse};

use super::model::{BatchCreateRequest, BatchCreateResponse, StudentStats};
use super::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create student accounts in bulk
///
/// Each entry is validated and created independently. Responds 201 when every
/// entry succeeded, 207 when only some did and 400 when none did.
#[utoipa::path(
    post,
    path = "/api/students/batch-create",
    request_body = BatchCreateRequest,
    responses(
        (status = 201, description = "All students created", body = BatchCreateResponse),
        (status = 207, description = "Some students created", body = BatchCreateResponse),
        (status = 400, description = "Invalid batch or no student created", body = BatchCreateResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, body))]
pub async fn batch_create_students(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<BatchCreateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BatchCreateResponse>>), AppError> {
    let response = StudentService::batch_create(
        state.accounts.as_ref(),
        state.mailer.as_ref(),
        &state.email_config,
        &body.students,
    )
    .await?;

    let summary = response.summary;
    let status = if summary.succeeded == summary.total {
        StatusCode::CREATED
    } else if summary.succeeded > 0 {
        StatusCode::MULTI_STATUS
    } else {
        StatusCode::BAD_REQUEST
    };

    let message = format!(
        "{} student(s) created successfully, {} failure(s)",
        summary.succeeded, summary.failed
    );

    Ok((
        status,
        Json(
            ApiResponse::ok(response)
                .with_success(summary.succeeded > 0)
                .with_message(message),
        ),
    ))
}

/// Student account statistics
#[utoipa::path(
    get,
    path = "/api/students/stats",
    responses(
        (status = 200, description = "Student statistics", body = StudentStats),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_student_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StudentStats>>, AppError> {
    let stats = StudentService::stats(state.accounts.as_ref()).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
