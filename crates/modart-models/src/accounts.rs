//! Account models and DTOs.
//!
//! [`Account`] is the outward view of an account and never carries the
//! password hash or refresh token. [`AccountRecord`] adds the hash for
//! credential checks inside the auth workflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub use modart_auth::Role;

/// An account as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub role: Role,
    pub is_active: bool,
    pub is_temporary_password: bool,
    pub must_change_password: bool,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An account together with its password hash.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub account: Account,
    pub password_hash: String,
}

/// Values for inserting a new account. The email must already be normalized.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub role: Role,
    pub is_temporary_password: bool,
    pub must_change_password: bool,
}

/// Partial update of account profile fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.role.is_none() && self.is_active.is_none()
    }
}

/// Minimal account view embedded in events and projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    #[schema(example = "Jeanne Lanvin")]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "jeanne@modart.fr")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(range(min = 0, max = 120, message = "Age must be between 0 and 120"))]
    pub age: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "jeanne@modart.fr")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

/// Body of a token refresh. A missing token deserializes to an empty string
/// so it fails validation rather than deserialization.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Registration result: the new account and an access token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: Account,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: Account,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: Account,
}

/// Admin creation of a single account with an explicit role.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(range(min = 0, max = 120, message = "Age must be between 0 and 120"))]
    pub age: Option<i32>,
    #[serde(default)]
    pub role: Role,
}

/// Profile update. `role` and `isActive` are honored for admins only.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 120, message = "Age must be between 0 and 120"))]
    pub age: Option<i32>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// Aggregate counts over student accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub total_students: i64,
    pub active_students: i64,
    pub students_with_temporary_password: i64,
    pub students_must_change_password: i64,
    pub inactive_students: i64,
}
