//! Request middleware and extractors.
//!
//! - [`auth`]: Bearer token resolution and the [`auth::AuthUser`] extractor
//! - [`role`]: Role requirements per route group and ownership checks
//! - [`rate_limit`]: Per-client login attempt limiting
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. `require_auth` / `require_roles` verify the token and attach the
//!    resolved `AuthUser` to the request extensions
//! 3. Role requirements are checked before the handler runs
//! 4. Handlers read the identity with the `AuthUser` extractor

pub mod auth;
pub mod rate_limit;
pub mod role;
