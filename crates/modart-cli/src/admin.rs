//! Admin account creation.

use modart_core::hash_password;
use sqlx::PgPool;
use uuid::Uuid;

/// Creates an active admin account and returns its ID.
///
/// The email is stored lowercased; an existing account with the same email
/// is an error.
pub async fn create_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<Uuid, Box<dyn std::error::Error>> {
    let name = name.trim();
    let email = email.trim().to_lowercase();

    if name.chars().count() < 2 {
        return Err("Name must be at least 2 characters".into());
    }
    if !email.contains('@') {
        return Err("Invalid email address".into());
    }
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters".into());
    }

    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (name, email, password, role)
         VALUES ($1, $2, $3, 'admin')
         ON CONFLICT DO NOTHING
         RETURNING id",
    )
    .bind(name)
    .bind(&email)
    .bind(&hashed_password)
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| "User with this email already exists".into())
}
