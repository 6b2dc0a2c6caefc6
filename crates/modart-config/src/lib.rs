//! # Mod'Art Config
//!
//! Configuration types for the Mod'Art API, loaded from environment variables:
//!
//! - [`jwt`]: JWT signing configuration
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`email`]: SMTP configuration for welcome emails
//! - [`rate_limit`]: Login rate limiting configuration
//! - [`server`]: Bind address, database and log locations
//!
//! # Example
//!
//! ```ignore
//! use modart_config::{JwtConfig, CorsConfig, EmailConfig, RateLimitConfig, ServerConfig};
//!
//! dotenvy::dotenv().ok();
//! let jwt_config = JwtConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod email;
pub mod jwt;
pub mod rate_limit;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
