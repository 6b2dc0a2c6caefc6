use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;
use uuid::Uuid;

use modart_auth::Role;
use modart_core::{ApiResponse, AppError, ErrorResponse};

use super::model::{CreateProjectDto, ProjectWithCreator, UpdateProjectDto};
use super::service::ProjectService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::authorize_owner_or_roles;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectDto,
    responses(
        (status = 201, description = "Project created", body = ProjectWithCreator),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Projects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateProjectDto>,
) -> Result<(StatusCode, Json<ApiResponse<ProjectWithCreator>>), AppError> {
    let project = ProjectService::create_project(
        &state.db,
        state.accounts.as_ref(),
        dto,
        auth_user.user_id()?,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(project).with_message("Project created successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "All projects", body = Vec<ProjectWithCreator>)
    ),
    tag = "Projects"
)]
#[instrument(skip(state))]
pub async fn get_projects(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProjectWithCreator>>>, AppError> {
    let projects = ProjectService::get_projects(&state.db, state.accounts.as_ref()).await?;
    Ok(Json(ApiResponse::ok(projects)))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project found", body = ProjectWithCreator),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    tag = "Projects"
)]
#[instrument(skip(state))]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProjectWithCreator>>, AppError> {
    let project = ProjectService::get_project(&state.db, state.accounts.as_ref(), id).await?;
    Ok(Json(ApiResponse::ok(project)))
}

/// Update a project (creator or admin)
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = UpdateProjectDto,
    responses(
        (status = 200, description = "Project updated", body = ProjectWithCreator),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the creator", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    tag = "Projects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateProjectDto>,
) -> Result<Json<ApiResponse<ProjectWithCreator>>, AppError> {
    let owner = ProjectService::get_owner(&state.db, id).await?;
    authorize_owner_or_roles(&auth_user, owner, &[Role::Admin])?;

    let project =
        ProjectService::update_project(&state.db, state.accounts.as_ref(), id, dto).await?;
    Ok(Json(
        ApiResponse::ok(project).with_message("Project updated successfully"),
    ))
}

/// Delete a project (creator or admin)
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the creator", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    tag = "Projects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let owner = ProjectService::get_owner(&state.db, id).await?;
    authorize_owner_or_roles(&auth_user, owner, &[Role::Admin])?;

    ProjectService::delete_project(&state.db, id).await?;
    Ok(Json(ApiResponse::message("Project deleted successfully")))
}
