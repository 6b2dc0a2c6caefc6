//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::roles::Role;

/// Claims embedded in an access token.
///
/// Everything needed for authorization decisions is carried in the token, so
/// verification never touches the account store. Claims reflect the account
/// as of issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Account ID (subject claim)
    pub sub: String,
    /// Account email address
    pub email: String,
    /// Account role at issuance
    pub role: Role,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}
