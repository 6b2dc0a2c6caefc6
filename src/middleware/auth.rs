use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use modart_auth::{Claims, Role, verify_token};
use modart_config::JwtConfig;
use modart_core::AppError;

use crate::logging::record_caller;
use crate::state::AppState;

/// The identity resolved from a verified access token.
///
/// Claims are trusted as of issuance; the account is not re-fetched.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == Role::Admin
    }

    /// Resolves the bearer token in `headers`.
    pub fn from_headers(headers: &HeaderMap, jwt_config: &JwtConfig) -> Result<Self, AppError> {
        let auth_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format".to_string())
        })?;

        let claims = verify_token(token.trim(), jwt_config)?;
        Ok(AuthUser(claims))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth_user) = parts.extensions.get::<AuthUser>() {
            return Ok(auth_user.clone());
        }

        let auth_user = AuthUser::from_headers(&parts.headers, &state.jwt_config)?;
        record_caller(&auth_user);
        Ok(auth_user)
    }
}

/// Requires a valid bearer token and attaches the [`AuthUser`] to the request.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    match AuthUser::from_headers(req.headers(), &state.jwt_config) {
        Ok(auth_user) => {
            record_caller(&auth_user);
            req.extensions_mut().insert(auth_user);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use modart_auth::create_access_token;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "middleware_test_secret".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[test]
    fn test_from_headers_resolves_identity() {
        let account_id = Uuid::new_v4();
        let token =
            create_access_token(account_id, "admin@modart.fr", Role::Admin, &config()).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );

        let auth_user = AuthUser::from_headers(&headers, &config()).unwrap();
        assert_eq!(auth_user.user_id().unwrap(), account_id);
        assert_eq!(auth_user.email(), "admin@modart.fr");
        assert!(auth_user.is_admin());
    }

    #[test]
    fn test_missing_or_malformed_header() {
        let err = AuthUser::from_headers(&HeaderMap::new(), &config()).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        let err = AuthUser::from_headers(&headers, &config()).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }
}
