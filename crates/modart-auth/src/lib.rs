//! # Mod'Art Auth
//!
//! Token service for the Mod'Art API.
//!
//! - [`roles`]: The account [`Role`] enumeration
//! - [`claims`]: Access token claims
//! - [`jwt`]: Access token issuance and stateless verification
//! - [`refresh`]: Opaque refresh token generation and storage digest
//!
//! # Token Types
//!
//! - **Access Token** ([`Claims`]): short-lived HS256 JWT carrying the account
//!   id, email and role. Verified by signature and expiry only.
//! - **Refresh Token**: 80 hex characters of OS randomness with no structure.
//!   Only its SHA-256 digest is stored.
//!
//! # Example
//!
//! ```ignore
//! use modart_auth::{Role, create_access_token, verify_token, generate_refresh_token};
//!
//! let token = create_access_token(account_id, "student@modart.fr", Role::Student, &config)?;
//! let claims = verify_token(&token, &config)?;
//! let refresh_token = generate_refresh_token();
//! ```

pub mod claims;
pub mod jwt;
pub mod refresh;
pub mod roles;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
pub use refresh::{digest_refresh_token, generate_refresh_token};
pub use roles::Role;
