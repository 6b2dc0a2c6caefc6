use std::collections::HashMap;

use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use modart_core::AppError;
use modart_models::accounts::AccountSummary;

use super::model::{CreateEventDto, Event, EventWithUsers, UpdateEventDto, check_event_dates};
use crate::store::AccountStore;

const EVENT_COLUMNS: &str = "id, title, description, start_date, end_date, location, is_active, \
     created_by, updated_by, created_at, updated_at";

pub struct EventService;

impl EventService {
    /// Attaches creator and updater summaries, fetched in one store lookup.
    async fn with_users(
        accounts: &dyn AccountStore,
        events: Vec<Event>,
    ) -> Result<Vec<EventWithUsers>, AppError> {
        let mut ids: Vec<Uuid> = events
            .iter()
            .flat_map(|e| [e.created_by, e.updated_by])
            .flatten()
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let users: HashMap<Uuid, AccountSummary> = accounts
            .find_many(&ids)
            .await?
            .iter()
            .map(|account| (account.id, AccountSummary::from(account)))
            .collect();

        Ok(events
            .into_iter()
            .map(|event| EventWithUsers {
                created_by_user: event.created_by.and_then(|id| users.get(&id).cloned()),
                updated_by_user: event.updated_by.and_then(|id| users.get(&id).cloned()),
                event,
            })
            .collect())
    }

    async fn with_users_one(
        accounts: &dyn AccountStore,
        event: Event,
    ) -> Result<EventWithUsers, AppError> {
        Self::with_users(accounts, vec![event])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found(anyhow!("Event not found")))
    }

    async fn find(db: &PgPool, id: Uuid) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Event not found")))
    }

    #[instrument(skip(db, accounts, dto))]
    pub async fn create_event(
        db: &PgPool,
        accounts: &dyn AccountStore,
        dto: CreateEventDto,
        created_by: Uuid,
    ) -> Result<EventWithUsers, AppError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "INSERT INTO events (title, description, start_date, end_date, location, is_active, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.location.trim())
        .bind(dto.is_active.unwrap_or(true))
        .bind(created_by)
        .fetch_one(db)
        .await?;

        info!(event_id = %event.id, "Event created");
        Self::with_users_one(accounts, event).await
    }

    #[instrument(skip(db, accounts))]
    pub async fn get_events(
        db: &PgPool,
        accounts: &dyn AccountStore,
    ) -> Result<Vec<EventWithUsers>, AppError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY start_date ASC"
        ))
        .fetch_all(db)
        .await?;

        Self::with_users(accounts, events).await
    }

    #[instrument(skip(db, accounts))]
    pub async fn get_active_events(
        db: &PgPool,
        accounts: &dyn AccountStore,
    ) -> Result<Vec<EventWithUsers>, AppError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE is_active = TRUE ORDER BY start_date ASC"
        ))
        .fetch_all(db)
        .await?;

        Self::with_users(accounts, events).await
    }

    #[instrument(skip(db, accounts))]
    pub async fn get_event(
        db: &PgPool,
        accounts: &dyn AccountStore,
        id: Uuid,
    ) -> Result<EventWithUsers, AppError> {
        let event = Self::find(db, id).await?;
        Self::with_users_one(accounts, event).await
    }

    /// Applies a partial update. The resulting date range must still end
    /// after it starts.
    #[instrument(skip(db, accounts, dto))]
    pub async fn update_event(
        db: &PgPool,
        accounts: &dyn AccountStore,
        id: Uuid,
        dto: UpdateEventDto,
        updated_by: Uuid,
    ) -> Result<EventWithUsers, AppError> {
        let existing = Self::find(db, id).await?;
        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.unwrap_or(existing.end_date);
        check_event_dates(start_date, end_date).map_err(|e| {
            AppError::bad_request(anyhow!(
                "{}",
                e.message.unwrap_or_else(|| "Invalid event dates".into())
            ))
        })?;

        let event = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                start_date = $4,
                end_date = $5,
                location = COALESCE($6, location),
                is_active = COALESCE($7, is_active),
                updated_by = $8,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(start_date)
        .bind(end_date)
        .bind(dto.location.as_deref().map(str::trim))
        .bind(dto.is_active)
        .bind(updated_by)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Event not found")))?;

        info!(event_id = %event.id, "Event updated");
        Self::with_users_one(accounts, event).await
    }

    #[instrument(skip(db))]
    pub async fn delete_event(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Event not found")));
        }

        info!(event_id = %id, "Event deleted");
        Ok(())
    }
}
