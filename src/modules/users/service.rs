use anyhow::anyhow;
use tracing::{info, instrument};
use uuid::Uuid;

use modart_core::{AppError, hash_password};
use modart_models::accounts::NewAccount;

use super::model::{Account, AccountChanges, CreateUserDto, UpdateUserDto};
use crate::modules::auth::model::normalize_email;
use crate::store::{AccountStore, DUPLICATE_EMAIL_MESSAGE};

pub struct UserService;

impl UserService {
    #[instrument(skip(accounts, dto), fields(email = %dto.email, role = %dto.role))]
    pub async fn create_user(
        accounts: &dyn AccountStore,
        dto: CreateUserDto,
    ) -> Result<Account, AppError> {
        let email = normalize_email(&dto.email);
        if accounts.email_exists(&email).await? {
            return Err(AppError::bad_request(anyhow!(DUPLICATE_EMAIL_MESSAGE)));
        }

        let password_hash = hash_password(&dto.password)?;
        let user = accounts
            .create(NewAccount {
                name: dto.name.trim().to_string(),
                email,
                password_hash,
                age: dto.age,
                role: dto.role,
                is_temporary_password: false,
                must_change_password: false,
            })
            .await?;

        info!(user_id = %user.id, "User created by admin");
        Ok(user)
    }

    #[instrument(skip(accounts))]
    pub async fn get_users(accounts: &dyn AccountStore) -> Result<Vec<Account>, AppError> {
        accounts.list().await
    }

    #[instrument(skip(accounts))]
    pub async fn get_user(accounts: &dyn AccountStore, id: Uuid) -> Result<Account, AppError> {
        accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Updates profile fields. Role and active status may only be changed by
    /// an admin.
    #[instrument(skip(accounts, dto))]
    pub async fn update_user(
        accounts: &dyn AccountStore,
        id: Uuid,
        dto: UpdateUserDto,
        by_admin: bool,
    ) -> Result<Account, AppError> {
        if !by_admin && (dto.role.is_some() || dto.is_active.is_some()) {
            return Err(AppError::forbidden(
                "Only administrators can change role or active status".to_string(),
            ));
        }

        let changes = AccountChanges {
            name: dto.name.map(|name| name.trim().to_string()),
            age: dto.age,
            role: dto.role,
            is_active: dto.is_active,
        };

        if changes.is_empty() {
            return Self::get_user(accounts, id).await;
        }

        accounts
            .update_profile(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Deactivates an account and revokes its refresh token. Access tokens
    /// already issued stay valid until they expire.
    #[instrument(skip(accounts))]
    pub async fn deactivate_user(
        accounts: &dyn AccountStore,
        id: Uuid,
    ) -> Result<Account, AppError> {
        let user = accounts
            .deactivate(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        info!(user_id = %id, "User deactivated");
        Ok(user)
    }

    #[instrument(skip(accounts))]
    pub async fn delete_user(accounts: &dyn AccountStore, id: Uuid) -> Result<(), AppError> {
        if !accounts.delete(id).await? {
            return Err(AppError::not_found(anyhow!("User not found")));
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryAccountStore;
    use modart_auth::Role;

    fn create_dto(email: &str, role: Role) -> CreateUserDto {
        CreateUserDto {
            name: " Coco Chanel ".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            age: Some(30),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_user_with_role() {
        let store = InMemoryAccountStore::new();
        let user = UserService::create_user(&store, create_dto("Coco@ModArt.fr", Role::Admin))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.name, "Coco Chanel");
        assert_eq!(user.email, "coco@modart.fr");
    }

    #[tokio::test]
    async fn test_non_admin_cannot_change_role() {
        let store = InMemoryAccountStore::new();
        let user = UserService::create_user(&store, create_dto("coco@modart.fr", Role::Student))
            .await
            .unwrap();

        let err = UserService::update_user(
            &store,
            user.id,
            UpdateUserDto {
                role: Some(Role::Admin),
                ..UpdateUserDto::default()
            },
            false,
        )
        .await
        .unwrap_err();
        assert_eq!(err.status.as_u16(), 403);

        let renamed = UserService::update_user(
            &store,
            user.id,
            UpdateUserDto {
                name: Some("Gabrielle Chanel".to_string()),
                ..UpdateUserDto::default()
            },
            false,
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "Gabrielle Chanel");
        assert_eq!(renamed.role, Role::Student);
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let store = InMemoryAccountStore::new();
        let missing = Uuid::new_v4();
        assert_eq!(
            UserService::get_user(&store, missing).await.unwrap_err().status.as_u16(),
            404
        );
        assert_eq!(
            UserService::deactivate_user(&store, missing)
                .await
                .unwrap_err()
                .status
                .as_u16(),
            404
        );
        assert_eq!(
            UserService::delete_user(&store, missing)
                .await
                .unwrap_err()
                .status
                .as_u16(),
            404
        );
    }
}
