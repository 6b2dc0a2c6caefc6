//! Development database seeding.

mod events;
mod models;
mod users;

use chrono::Utc;
use modart_core::hash_password;
use sqlx::PgPool;
use std::time::Instant;

pub use events::{clear_events, generate_events, seed_events};
pub use models::{EventSeed, SEED_EMAIL_DOMAIN, SeedConfig, UserSeed};
pub use users::{clear_users, generate_users, insert_users_batch};

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "password123";

/// Seeds admins, students and events. Events are attributed to the first
/// seeded admin, so none are created when `config.admins` is zero.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...");

    let password_hash = hash_password(SEED_PASSWORD)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let users = generate_users(&config, &password_hash);
    let inserted = insert_users_batch(db, &users).await?;

    let first_admin = inserted
        .iter()
        .find(|(_, role)| *role == "admin")
        .map(|(id, _)| *id);

    match first_admin {
        Some(admin_id) if config.events > 0 => {
            let events = generate_events(config.events, Utc::now());
            seed_events(db, &events, admin_id).await?;
        }
        Some(_) => {}
        None => println!("   ⚠️  No admin seeded, skipping events"),
    }

    println!(
        "\n✅ Seeding complete in {:?} (password for all accounts: {})",
        start_time.elapsed(),
        SEED_PASSWORD
    );
    Ok(())
}

/// Removes seeded events and accounts. Accounts outside the seed domain are
/// kept.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🧹 Clearing seeded data...");

    clear_events(db, &format!("%@{}", SEED_EMAIL_DOMAIN)).await?;
    clear_users(db).await?;

    println!("\n✅ Cleared seeded data in {:?}", start_time.elapsed());
    Ok(())
}
