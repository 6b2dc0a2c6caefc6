//! Event models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::accounts::AccountSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: String,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An event with the accounts that created and last updated it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventWithUsers {
    #[serde(flatten)]
    pub event: Event,
    pub created_by_user: Option<AccountSummary>,
    pub updated_by_user: Option<AccountSummary>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_dates", skip_on_field_errors = false))]
pub struct CreateEventDto {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    #[schema(example = "Spring Fashion Show")]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventDto {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

/// Ensures an event ends strictly after it starts.
pub fn check_event_dates(
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if end_date <= start_date {
        let mut error = ValidationError::new("end_before_start");
        error.message = Some("End date must be after start date".into());
        return Err(error);
    }
    Ok(())
}

fn validate_create_dates(dto: &CreateEventDto) -> Result<(), ValidationError> {
    check_event_dates(dto.start_date, dto.end_date)
}
