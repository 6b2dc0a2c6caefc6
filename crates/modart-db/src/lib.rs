//! # Mod'Art DB
//!
//! PostgreSQL connection pool and schema migrations.
//!
//! # Example
//!
//! ```ignore
//! use modart_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&database_url, 10).await?;
//! run_migrations(&pool).await?;
//! ```

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Connects a PostgreSQL pool.
///
/// The returned pool is cheaply cloneable and is shared through the
/// application state.
pub async fn init_db_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    info!(max_connections, "Database pool initialized");
    Ok(pool)
}

/// Builds a pool that only connects on first use.
pub fn lazy_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().connect_lazy(database_url)
}

/// Applies pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
