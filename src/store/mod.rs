//! Account persistence.
//!
//! [`AccountStore`] is the single seam between the auth/provisioning workflows
//! and the credential store. Emails passed to and returned from a store are
//! already normalized (trimmed, lower-cased), and refresh tokens are only ever
//! handled as digests.
//!
//! - [`postgres::PgAccountStore`]: the production store
//! - [`memory::InMemoryAccountStore`]: a process-local store for tests

use async_trait::async_trait;
use uuid::Uuid;

use modart_core::AppError;
use modart_models::accounts::{Account, AccountChanges, AccountRecord, NewAccount, StudentStats};

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryAccountStore;
pub use postgres::PgAccountStore;

pub(crate) const DUPLICATE_EMAIL_MESSAGE: &str = "User with this email already exists";

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError>;

    /// Looks up an account with its password hash.
    async fn find_credentials_by_email(&self, email: &str)
    -> Result<Option<AccountRecord>, AppError>;

    async fn find_credentials_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, AppError>;

    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Inserts an account. A taken email fails with a 400 error.
    async fn create(&self, account: NewAccount) -> Result<Account, AppError>;

    /// All accounts, newest first.
    async fn list(&self) -> Result<Vec<Account>, AppError>;

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Account>, AppError>;

    async fn update_profile(
        &self,
        id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<Account>, AppError>;

    /// Replaces the password hash, clears the temporary/must-change flags and
    /// stamps the change time. Returns `false` when the account is gone.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, AppError>;

    /// Stores (or clears, with `None`) the refresh token digest.
    async fn set_refresh_token(&self, id: Uuid, digest: Option<&str>) -> Result<(), AppError>;

    async fn find_by_refresh_token(&self, digest: &str) -> Result<Option<Account>, AppError>;

    /// Swaps `current` for `next` only if `current` is still the stored value.
    ///
    /// Of two concurrent rotations presenting the same digest at most one
    /// returns `true`.
    async fn rotate_refresh_token(
        &self,
        id: Uuid,
        current: &str,
        next: &str,
    ) -> Result<bool, AppError>;

    /// Marks the account inactive and clears its refresh token.
    async fn deactivate(&self, id: Uuid) -> Result<Option<Account>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn student_stats(&self) -> Result<StudentStats, AppError>;
}
