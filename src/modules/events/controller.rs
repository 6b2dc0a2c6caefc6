use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;
use uuid::Uuid;

use modart_core::{ApiResponse, AppError, ErrorResponse};

use super::model::{CreateEventDto, EventWithUsers, UpdateEventDto};
use super::service::EventService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create an event (admin)
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event created", body = EventWithUsers),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateEventDto>,
) -> Result<(StatusCode, Json<ApiResponse<EventWithUsers>>), AppError> {
    let event = EventService::create_event(
        &state.db,
        state.accounts.as_ref(),
        dto,
        auth_user.user_id()?,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(event).with_message("Event created successfully")),
    ))
}

/// List all events by start date
#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "All events", body = Vec<EventWithUsers>)
    ),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn get_events(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<EventWithUsers>>>, AppError> {
    let events = EventService::get_events(&state.db, state.accounts.as_ref()).await?;
    let message = format!("Retrieved {} events", events.len());
    Ok(Json(ApiResponse::ok(events).with_message(message)))
}

/// List active events by start date
#[utoipa::path(
    get,
    path = "/api/events/active",
    responses(
        (status = 200, description = "Active events", body = Vec<EventWithUsers>)
    ),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn get_active_events(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<EventWithUsers>>>, AppError> {
    let events = EventService::get_active_events(&state.db, state.accounts.as_ref()).await?;
    let message = format!("Retrieved {} active events", events.len());
    Ok(Json(ApiResponse::ok(events).with_message(message)))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event found", body = EventWithUsers),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EventWithUsers>>, AppError> {
    let event = EventService::get_event(&state.db, state.accounts.as_ref(), id).await?;
    Ok(Json(ApiResponse::ok(event)))
}

/// Update an event (admin)
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEventDto,
    responses(
        (status = 200, description = "Event updated", body = EventWithUsers),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateEventDto>,
) -> Result<Json<ApiResponse<EventWithUsers>>, AppError> {
    let event = EventService::update_event(
        &state.db,
        state.accounts.as_ref(),
        id,
        dto,
        auth_user.user_id()?,
    )
    .await?;
    Ok(Json(
        ApiResponse::ok(event).with_message("Event updated successfully"),
    ))
}

/// Delete an event (admin)
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    EventService::delete_event(&state.db, id).await?;
    Ok(Json(ApiResponse::message("Event deleted successfully")))
}
