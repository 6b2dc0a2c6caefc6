use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use modart_core::AppError;
use modart_models::accounts::{
    Account, AccountChanges, AccountRecord, NewAccount, Role, StudentStats,
};

use super::{AccountStore, DUPLICATE_EMAIL_MESSAGE};

#[derive(Debug, Clone)]
struct StoredAccount {
    record: AccountRecord,
    refresh_token: Option<String>,
}

/// Process-local [`AccountStore`] used by tests.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<Vec<StoredAccount>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }

    /// The stored refresh token digest of an account.
    pub async fn refresh_token_of(&self, id: Uuid) -> Option<String> {
        self.accounts
            .read()
            .await
            .iter()
            .find(|stored| stored.record.account.id == id)
            .and_then(|stored| stored.refresh_token.clone())
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .find(|stored| stored.record.account.id == id)
            .map(|stored| stored.record.account.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountRecord>, AppError> {
        let email = email.to_lowercase();
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .find(|stored| stored.record.account.email == email)
            .map(|stored| stored.record.clone()))
    }

    async fn find_credentials_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, AppError> {
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .find(|stored| stored.record.account.id == id)
            .map(|stored| stored.record.clone()))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let email = email.to_lowercase();
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .any(|stored| stored.record.account.email == email))
    }

    async fn create(&self, account: NewAccount) -> Result<Account, AppError> {
        let mut accounts = self.accounts.write().await;
        let email = account.email.to_lowercase();
        if accounts
            .iter()
            .any(|stored| stored.record.account.email == email)
        {
            return Err(AppError::bad_request(anyhow::anyhow!(
                DUPLICATE_EMAIL_MESSAGE
            )));
        }

        let now = Utc::now();
        let created = Account {
            id: Uuid::new_v4(),
            name: account.name,
            email,
            age: account.age,
            role: account.role,
            is_active: true,
            is_temporary_password: account.is_temporary_password,
            must_change_password: account.must_change_password,
            password_changed_at: None,
            created_at: now,
            updated_at: now,
        };

        accounts.push(StoredAccount {
            record: AccountRecord {
                account: created.clone(),
                password_hash: account.password_hash,
            },
            refresh_token: None,
        });

        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Account>, AppError> {
        let mut accounts: Vec<Account> = self
            .accounts
            .read()
            .await
            .iter()
            .map(|stored| stored.record.account.clone())
            .collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Account>, AppError> {
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .filter(|stored| ids.contains(&stored.record.account.id))
            .map(|stored| stored.record.account.clone())
            .collect())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<Account>, AppError> {
        let mut accounts = self.accounts.write().await;
        let Some(stored) = accounts
            .iter_mut()
            .find(|stored| stored.record.account.id == id)
        else {
            return Ok(None);
        };

        let account = &mut stored.record.account;
        if let Some(name) = changes.name {
            account.name = name;
        }
        if let Some(age) = changes.age {
            account.age = Some(age);
        }
        if let Some(role) = changes.role {
            account.role = role;
        }
        if let Some(is_active) = changes.is_active {
            account.is_active = is_active;
            if !is_active {
                stored.refresh_token = None;
            }
        }
        stored.record.account.updated_at = Utc::now();

        Ok(Some(stored.record.account.clone()))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, AppError> {
        let mut accounts = self.accounts.write().await;
        let Some(stored) = accounts
            .iter_mut()
            .find(|stored| stored.record.account.id == id)
        else {
            return Ok(false);
        };

        let now = Utc::now();
        stored.record.password_hash = password_hash.to_string();
        stored.record.account.is_temporary_password = false;
        stored.record.account.must_change_password = false;
        stored.record.account.password_changed_at = Some(now);
        stored.record.account.updated_at = now;
        Ok(true)
    }

    async fn set_refresh_token(&self, id: Uuid, digest: Option<&str>) -> Result<(), AppError> {
        let mut accounts = self.accounts.write().await;
        if let Some(stored) = accounts
            .iter_mut()
            .find(|stored| stored.record.account.id == id)
        {
            stored.refresh_token = digest.map(str::to_string);
        }
        Ok(())
    }

    async fn find_by_refresh_token(&self, digest: &str) -> Result<Option<Account>, AppError> {
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .find(|stored| stored.refresh_token.as_deref() == Some(digest))
            .map(|stored| stored.record.account.clone()))
    }

    async fn rotate_refresh_token(
        &self,
        id: Uuid,
        current: &str,
        next: &str,
    ) -> Result<bool, AppError> {
        let mut accounts = self.accounts.write().await;
        match accounts.iter_mut().find(|stored| {
            stored.record.account.id == id && stored.refresh_token.as_deref() == Some(current)
        }) {
            Some(stored) => {
                stored.refresh_token = Some(next.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn deactivate(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        self.update_profile(
            id,
            AccountChanges {
                is_active: Some(false),
                ..AccountChanges::default()
            },
        )
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut accounts = self.accounts.write().await;
        let before = accounts.len();
        accounts.retain(|stored| stored.record.account.id != id);
        Ok(accounts.len() < before)
    }

    async fn student_stats(&self) -> Result<StudentStats, AppError> {
        let accounts = self.accounts.read().await;
        let students = accounts
            .iter()
            .map(|stored| &stored.record.account)
            .filter(|account| account.role == Role::Student);

        let mut stats = StudentStats::default();
        for account in students {
            stats.total_students += 1;
            if account.is_active {
                stats.active_students += 1;
            } else {
                stats.inactive_students += 1;
            }
            if account.is_temporary_password {
                stats.students_with_temporary_password += 1;
            }
            if account.must_change_password {
                stats.students_must_change_password += 1;
            }
        }
        Ok(stats)
    }
}
