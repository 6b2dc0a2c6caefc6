//! Role-based authorization.
//!
//! Route groups declare their permitted roles with [`require_roles`] (or the
//! [`require_admin`] shorthand) through `middleware::from_fn_with_state`.
//! Every decision goes through [`authorize`], and ownership rules through
//! [`authorize_owner_or_roles`].

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use modart_auth::Role;
use modart_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Fails with 403 unless the identity holds one of `allowed_roles`.
pub fn authorize(auth_user: &AuthUser, allowed_roles: &[Role]) -> Result<(), AppError> {
    if allowed_roles.contains(&auth_user.role()) {
        return Ok(());
    }

    Err(AppError::forbidden(
        "Access denied. Insufficient permissions".to_string(),
    ))
}

/// Allows the owner of a resource, or any identity holding one of
/// `allowed_roles`.
pub fn authorize_owner_or_roles(
    auth_user: &AuthUser,
    owner_id: Uuid,
    allowed_roles: &[Role],
) -> Result<(), AppError> {
    if auth_user.user_id()? == owner_id {
        return Ok(());
    }

    authorize(auth_user, allowed_roles)
}

/// Authenticates the request, then checks the identity's role.
pub async fn require_roles(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let auth_user = AuthUser::from_headers(req.headers(), &state.jwt_config)?;
    authorize(&auth_user, allowed_roles)?;

    req.extensions_mut().insert(auth_user);
    Ok(next.run(req).await)
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modart_auth::Claims;

    fn auth_user(id: Uuid, role: Role) -> AuthUser {
        AuthUser(Claims {
            sub: id.to_string(),
            email: "someone@modart.fr".to_string(),
            role,
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_authorize() {
        let student = auth_user(Uuid::new_v4(), Role::Student);
        let admin = auth_user(Uuid::new_v4(), Role::Admin);

        assert!(authorize(&admin, &[Role::Admin]).is_ok());
        assert!(authorize(&student, &[Role::Student, Role::Admin]).is_ok());

        let err = authorize(&student, &[Role::Admin]).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
    }

    #[test]
    fn test_authorize_owner_or_roles() {
        let owner_id = Uuid::new_v4();
        let owner = auth_user(owner_id, Role::Student);
        let stranger = auth_user(Uuid::new_v4(), Role::Student);
        let admin = auth_user(Uuid::new_v4(), Role::Admin);

        assert!(authorize_owner_or_roles(&owner, owner_id, &[Role::Admin]).is_ok());
        assert!(authorize_owner_or_roles(&admin, owner_id, &[Role::Admin]).is_ok());
        assert!(authorize_owner_or_roles(&stranger, owner_id, &[Role::Admin]).is_err());
    }
}
