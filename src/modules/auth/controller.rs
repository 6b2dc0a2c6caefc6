use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use modart_core::{ApiResponse, AppError, ErrorResponse};

use super::model::{
    AuthResponse, ChangePasswordRequest, LoginRequest, LoginResponse, ProfileResponse,
    RefreshRequest, RegisterRequest, TokenPair,
};
use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a new student account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Validation error or email already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let response = AuthService::register(state.accounts.as_ref(), dto, &state.jwt_config).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(response).with_message("User registered successfully")),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials or deactivated account", body = ErrorResponse),
        (status = 429, description = "Too many login attempts", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = AuthService::login(state.accounts.as_ref(), dto, &state.jwt_config).await?;
    Ok(Json(
        ApiResponse::ok(response).with_message("Login successful"),
    ))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Current user profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<ProfileResponse>>, AppError> {
    let user = AuthService::profile(state.accounts.as_ref(), auth_user.user_id()?).await?;
    Ok(Json(ApiResponse::ok(ProfileResponse { user })))
}

/// Change the authenticated user's password
#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed successfully"),
        (status = 400, description = "Validation error or wrong current password", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    AuthService::change_password(state.accounts.as_ref(), auth_user.user_id()?, dto).await?;
    Ok(Json(ApiResponse::message("Password changed successfully")))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = TokenPair),
        (status = 400, description = "Refresh token missing", body = ErrorResponse),
        (status = 401, description = "Invalid refresh token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let pair =
        AuthService::refresh(state.accounts.as_ref(), &dto.refresh_token, &state.jwt_config)
            .await?;
    Ok(Json(ApiResponse::ok(pair).with_message("Token refreshed successfully")))
}

/// Revoke the authenticated user's refresh token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<()>>, AppError> {
    AuthService::revoke(state.accounts.as_ref(), auth_user.user_id()?).await?;
    Ok(Json(ApiResponse::message("Logged out successfully")))
}
