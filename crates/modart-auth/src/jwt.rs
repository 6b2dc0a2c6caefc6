//! Access token issuance and verification.
//!
//! Access tokens are HS256 JWTs signed with [`JwtConfig::secret`]. They are
//! stateless: verification checks signature and expiry only, so a token
//! stays valid until it expires even if the account changes in the meantime.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use modart_config::JwtConfig;
use modart_core::AppError;

use crate::claims::Claims;
use crate::roles::Role;

/// Creates a signed access token for an account.
///
/// # Errors
///
/// Fails with an internal error when the signing secret is empty or encoding
/// fails.
pub fn create_access_token(
    account_id: Uuid,
    email: &str,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    if jwt_config.secret.is_empty() {
        return Err(AppError::internal_error(
            "JWT signing secret is not configured".to_string(),
        ));
    }

    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        sub: account_id.to_string(),
        email: email.to_string(),
        role,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies an access token and returns its claims.
///
/// Malformed, expired and mis-signed tokens all yield the same unauthorized
/// error.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    if jwt_config.secret.is_empty() {
        return Err(AppError::unauthorized("Invalid or expired token".to_string()));
    }

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))
}
