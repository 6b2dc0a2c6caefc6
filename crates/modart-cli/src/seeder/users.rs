//! Account seeding.
//!
//! Generates admins and students with fake names and inserts them with
//! multi-row statements.

use fake::Fake;
use fake::faker::name::en::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::{SEED_EMAIL_DOMAIN, SeedConfig, UserSeed};

/// Generates the admins and students described by `config`. Every account
/// shares `password_hash`.
pub fn generate_users(config: &SeedConfig, password_hash: &str) -> Vec<UserSeed> {
    let mut users = Vec::with_capacity(config.total_users());

    for idx in 0..config.admins {
        users.push(generate_user("admin", idx, false, password_hash));
    }

    let temporary_every = match config.temporary_password_percent {
        0 => None,
        percent => Some((100 / usize::from(percent.min(100))).max(1)),
    };
    for idx in 0..config.students {
        let is_temporary = temporary_every.is_some_and(|every| idx % every == 0);
        users.push(generate_user("student", idx, is_temporary, password_hash));
    }

    users
}

fn generate_user(
    role: &'static str,
    idx: usize,
    is_temporary: bool,
    password_hash: &str,
) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let email = format!(
        "{}.{}+{}{}@{}",
        first_name.to_lowercase().replace(' ', ""),
        last_name.to_lowercase().replace(' ', ""),
        role,
        idx,
        SEED_EMAIL_DOMAIN
    );

    UserSeed {
        name: format!("{} {}", first_name, last_name),
        email,
        password_hash: password_hash.to_string(),
        role,
        age: Some((18..35).fake()),
        is_temporary_password: is_temporary,
    }
}

/// Inserts users in batches and returns `(id, role)` for each.
pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> Result<Vec<(Uuid, &'static str)>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} users...", users.len());

    let mut tx = db.begin().await?;

    // 6 params per user
    const BATCH_SIZE: usize = 1000;

    let mut inserted = Vec::with_capacity(users.len());
    for chunk in users.chunks(BATCH_SIZE) {
        let ids = insert_users_chunk(&mut tx, chunk).await?;
        inserted.extend(ids.into_iter().zip(chunk.iter().map(|user| user.role)));
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        inserted.len(),
        start_time.elapsed()
    );
    Ok(inserted)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO users (name, email, password, role, age, is_temporary_password, must_change_password) VALUES ",
    );

    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 6;
        // The temporary password flag doubles as must_change_password
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6,
            p + 6
        ));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        q = q
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(user.age)
            .bind(user.is_temporary_password);
    }

    let ids: Vec<Uuid> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Deletes seeded accounts. Their projects cascade.
pub async fn clear_users(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let result = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}
