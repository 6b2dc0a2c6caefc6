//! Authentication DTOs, re-exported from `modart-models`.

pub use modart_models::accounts::{
    AuthResponse, ChangePasswordRequest, LoginRequest, LoginResponse, ProfileResponse,
    RefreshRequest, RegisterRequest, TokenPair,
};

/// Trims and lower-cases an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
