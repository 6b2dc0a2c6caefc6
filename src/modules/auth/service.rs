use std::sync::LazyLock;

use anyhow::anyhow;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use modart_auth::{Role, create_access_token, digest_refresh_token, generate_refresh_token};
use modart_config::JwtConfig;
use modart_core::{AppError, hash_password, verify_password};
use modart_models::accounts::{Account, NewAccount};

use super::model::{
    AuthResponse, ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, TokenPair,
    normalize_email,
};
use crate::store::{AccountStore, DUPLICATE_EMAIL_MESSAGE};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Hash checked when the email is unknown, so both failure paths pay for one
/// bcrypt verification.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("modart-unknown-account").ok());

pub struct AuthService;

impl AuthService {
    #[instrument(skip(accounts, dto, jwt_config), fields(email = %dto.email))]
    pub async fn register(
        accounts: &dyn AccountStore,
        dto: RegisterRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
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
                role: Role::Student,
                is_temporary_password: false,
                must_change_password: false,
            })
            .await?;

        let token = create_access_token(user.id, &user.email, user.role, jwt_config)?;

        info!(user_id = %user.id, "Account registered");
        Ok(AuthResponse { user, token })
    }

    /// Verifies credentials and issues an access token plus a fresh refresh
    /// token. The password is checked before the active flag.
    #[instrument(skip(accounts, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        accounts: &dyn AccountStore,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let email = normalize_email(&dto.email);

        let Some(record) = accounts.find_credentials_by_email(&email).await? else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(&dto.password, dummy);
            }
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&dto.password, &record.password_hash)? {
            warn!(user_id = %record.account.id, "Failed login attempt");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let user = record.account;
        if !user.is_active {
            return Err(AppError::unauthorized("Account is deactivated".to_string()));
        }

        let token = create_access_token(user.id, &user.email, user.role, jwt_config)?;
        let refresh_token = generate_refresh_token();
        accounts
            .set_refresh_token(user.id, Some(&digest_refresh_token(&refresh_token)))
            .await?;

        info!(user_id = %user.id, "Login successful");
        Ok(LoginResponse {
            user,
            token,
            refresh_token,
        })
    }

    #[instrument(skip(accounts))]
    pub async fn profile(accounts: &dyn AccountStore, user_id: Uuid) -> Result<Account, AppError> {
        accounts
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    #[instrument(skip(accounts, dto))]
    pub async fn change_password(
        accounts: &dyn AccountStore,
        user_id: Uuid,
        dto: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let record = accounts
            .find_credentials_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        if !verify_password(&dto.current_password, &record.password_hash)? {
            return Err(AppError::bad_request(anyhow!(
                "Current password is incorrect"
            )));
        }

        let password_hash = hash_password(&dto.new_password)?;
        if !accounts.update_password(user_id, &password_hash).await? {
            return Err(AppError::not_found(anyhow!("User not found")));
        }

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Exchanges a refresh token for a new access token, rotating the stored
    /// refresh token. Each refresh token works once.
    #[instrument(skip_all)]
    pub async fn refresh(
        accounts: &dyn AccountStore,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<TokenPair, AppError> {
        let current = digest_refresh_token(refresh_token);

        let user = accounts
            .find_by_refresh_token(&current)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token".to_string()))?;

        if !user.is_active {
            accounts.set_refresh_token(user.id, None).await?;
            return Err(AppError::unauthorized("Account is deactivated".to_string()));
        }

        let next_token = generate_refresh_token();
        let rotated = accounts
            .rotate_refresh_token(user.id, &current, &digest_refresh_token(&next_token))
            .await?;
        if !rotated {
            return Err(AppError::unauthorized("Invalid refresh token".to_string()));
        }

        let token = create_access_token(user.id, &user.email, user.role, jwt_config)?;

        Ok(TokenPair {
            token,
            refresh_token: next_token,
        })
    }

    /// Clears the stored refresh token. Repeated calls are harmless.
    #[instrument(skip(accounts))]
    pub async fn revoke(accounts: &dyn AccountStore, user_id: Uuid) -> Result<(), AppError> {
        accounts.set_refresh_token(user_id, None).await
    }
}
