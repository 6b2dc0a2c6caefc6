use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use modart_core::AppError;
use modart_models::accounts::{
    Account, AccountChanges, AccountRecord, NewAccount, Role, StudentStats,
};

use super::{AccountStore, DUPLICATE_EMAIL_MESSAGE};

const ACCOUNT_COLUMNS: &str = "id, name, email, age, role, is_active, is_temporary_password, \
     must_change_password, password_changed_at, created_at, updated_at";

#[derive(FromRow)]
struct AccountRow {
    id: Uuid,
    name: String,
    email: String,
    age: Option<i32>,
    role: String,
    is_active: bool,
    is_temporary_password: bool,
    must_change_password: bool,
    password_changed_at: Option<chrono::DateTime<chrono::Utc>>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    account: AccountRow,
    password: String,
}

impl TryFrom<AccountRow> for Account {
    type Error = AppError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(AppError::internal_error)?;

        Ok(Account {
            id: row.id,
            name: row.name,
            email: row.email,
            age: row.age,
            role,
            is_active: row.is_active,
            is_temporary_password: row.is_temporary_password,
            must_change_password: row.must_change_password,
            password_changed_at: row.password_changed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<CredentialRow> for AccountRecord {
    type Error = AppError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        Ok(AccountRecord {
            account: row.account.try_into()?,
            password_hash: row.password,
        })
    }
}

fn map_insert_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::bad_request(anyhow::anyhow!(DUPLICATE_EMAIL_MESSAGE));
        }
    }
    AppError::database(err)
}

/// PostgreSQL-backed [`AccountStore`] over the `users` table.
#[derive(Clone, Debug)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(Account::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountRecord>, AppError> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS}, password FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        row.map(AccountRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_credentials_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, AppError> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS}, password FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(AccountRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }

    #[instrument(skip(self, account), fields(email = %account.email, role = %account.role))]
    async fn create(&self, account: NewAccount) -> Result<Account, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "INSERT INTO users (name, email, password, age, role, is_temporary_password, must_change_password)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.age)
        .bind(account.role.as_str())
        .bind(account.is_temporary_password)
        .bind(account.must_change_password)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)?;

        row.try_into()
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Account>, AppError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Account::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Account>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Account::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn update_profile(
        &self,
        id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                role = COALESCE($4, role),
                is_active = COALESCE($5, is_active),
                refresh_token = CASE WHEN $5 = FALSE THEN NULL ELSE refresh_token END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.age)
        .bind(changes.role.map(|role| role.as_str()))
        .bind(changes.is_active)
        .fetch_optional(&self.db)
        .await?;

        row.map(Account::try_from).transpose()
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE users SET
                password = $2,
                is_temporary_password = FALSE,
                must_change_password = FALSE,
                password_changed_at = NOW(),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, digest))]
    async fn set_refresh_token(&self, id: Uuid, digest: Option<&str>) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET refresh_token = $2 WHERE id = $1")
            .bind(id)
            .bind(digest)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    #[instrument(skip(self, digest))]
    async fn find_by_refresh_token(&self, digest: &str) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE refresh_token = $1"
        ))
        .bind(digest)
        .fetch_optional(&self.db)
        .await?;

        row.map(Account::try_from).transpose()
    }

    #[instrument(skip(self, current, next))]
    async fn rotate_refresh_token(
        &self,
        id: Uuid,
        current: &str,
        next: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = $3 WHERE id = $1 AND refresh_token = $2",
        )
        .bind(id)
        .bind(current)
        .bind(next)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "UPDATE users SET is_active = FALSE, refresh_token = NULL, updated_at = NOW()
             WHERE id = $1
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(Account::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn student_stats(&self) -> Result<StudentStats, AppError> {
        let (total, active, temporary, must_change, inactive) =
            sqlx::query_as::<_, (i64, i64, i64, i64, i64)>(
                "SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE is_active),
                    COUNT(*) FILTER (WHERE is_temporary_password),
                    COUNT(*) FILTER (WHERE must_change_password),
                    COUNT(*) FILTER (WHERE NOT is_active)
                 FROM users WHERE role = 'student'",
            )
            .fetch_one(&self.db)
            .await?;

        Ok(StudentStats {
            total_students: total,
            active_students: active,
            students_with_temporary_password: temporary,
            students_must_change_password: must_change,
            inactive_students: inactive,
        })
    }
}
