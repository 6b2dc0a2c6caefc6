use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;
use uuid::Uuid;

use modart_auth::Role;
use modart_core::{ApiResponse, AppError, ErrorResponse};

use super::model::{Account, CreateUserDto, Project, UpdateUserDto};
use super::service::UserService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::authorize_owner_or_roles;
use crate::modules::projects::service::ProjectService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create a user with any role (admin only)
#[utoipa::path(
    post,
    path = "/api/users/add-user",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = Account),
        (status = 400, description = "Validation error or email taken", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<ApiResponse<Account>>), AppError> {
    let user = UserService::create_user(state.accounts.as_ref(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(user).with_message("User created successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users, newest first", body = Vec<Account>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Account>>>, AppError> {
    let users = UserService::get_users(state.accounts.as_ref()).await?;
    let message = format!("Retrieved {} users", users.len());
    Ok(Json(ApiResponse::ok(users).with_message(message)))
}

/// Get a user (self or admin)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = Account),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Account>>, AppError> {
    authorize_owner_or_roles(&auth_user, id, &[Role::Admin])?;

    let user = UserService::get_user(state.accounts.as_ref(), id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// Update a user (self or admin). Only admins may change role or active status.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = Account),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<ApiResponse<Account>>, AppError> {
    authorize_owner_or_roles(&auth_user, id, &[Role::Admin])?;

    let user =
        UserService::update_user(state.accounts.as_ref(), id, dto, auth_user.is_admin()).await?;
    Ok(Json(
        ApiResponse::ok(user).with_message("User updated successfully"),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}/deactivate",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deactivated", body = Account),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Account>>, AppError> {
    let user = UserService::deactivate_user(state.accounts.as_ref(), id).await?;
    Ok(Json(
        ApiResponse::ok(user).with_message("User deactivated successfully"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    UserService::delete_user(state.accounts.as_ref(), id).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

/// Projects created by a user
#[utoipa::path(
    get,
    path = "/api/users/{id}/projects",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Projects created by the user", body = Vec<Project>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user_projects(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Project>>>, AppError> {
    UserService::get_user(state.accounts.as_ref(), id).await?;

    let projects = ProjectService::get_projects_by_creator(&state.db, id).await?;
    let message = format!("Retrieved {} projects", projects.len());
    Ok(Json(ApiResponse::ok(projects).with_message(message)))
}
