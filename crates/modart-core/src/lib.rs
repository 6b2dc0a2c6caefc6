//! # Mod'Art Core
//!
//! Core types, errors, and utilities shared by every Mod'Art crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: bcrypt password hashing and verification
//! - [`response`]: The `{success, data, message, error}` response envelope
//!
//! # Example
//!
//! ```ignore
//! use modart_core::{ApiResponse, AppError, hash_password};
//!
//! let hash = hash_password("secure_password")?;
//! let body = ApiResponse::ok(user).with_message("User retrieved successfully");
//! let error = AppError::not_found(anyhow::anyhow!("User not found"));
//! ```

pub mod errors;
pub mod password;
pub mod response;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use password::{hash_password, verify_password};
pub use response::{ApiResponse, ErrorResponse};
