//! # Mod'Art CLI
//!
//! Administrative tooling: creating admin accounts and seeding a development
//! database with fake students and events.
//!
//! ## Usage
//!
//! ```ignore
//! use modart_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(50).with_events(10);
//! seed_all(&pool, config).await?;
//! ```

pub mod admin;
pub mod seeder;
