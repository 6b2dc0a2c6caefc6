//! Event seeding.

use chrono::{DateTime, Duration, Utc};
use fake::Fake;
use fake::faker::address::en::CityName;
use fake::faker::lorem::en::{Sentence, Words};
use sqlx::PgPool;
use std::time::Instant;
use uuid::Uuid;

use super::models::EventSeed;

const EVENT_KINDS: [&str; 5] = [
    "Fashion Show",
    "Workshop",
    "Portfolio Review",
    "Open Day",
    "Masterclass",
];

/// Generates `count` events, one per week starting a week after `from`.
pub fn generate_events(count: usize, from: DateTime<Utc>) -> Vec<EventSeed> {
    (0..count)
        .map(|idx| {
            let words: Vec<String> = Words(1..3).fake();
            let kind = EVENT_KINDS[idx % EVENT_KINDS.len()];
            let start_date = from + Duration::weeks(idx as i64 + 1);
            let hours: i64 = (2..6).fake();

            EventSeed {
                title: format!("{} {}", capitalize(&words.join(" ")), kind),
                description: Sentence(8..16).fake(),
                start_date,
                end_date: start_date + Duration::hours(hours),
                location: CityName().fake(),
            }
        })
        .collect()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Inserts events attributed to `created_by`.
pub async fn seed_events(
    db: &PgPool,
    events: &[EventSeed],
    created_by: Uuid,
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📅 Seeding {} events...", events.len());

    let mut tx = db.begin().await?;
    let mut inserted = 0;
    for event in events {
        inserted += sqlx::query(
            "INSERT INTO events (title, description, start_date, end_date, location, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $6)",
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(&event.location)
        .bind(created_by)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} events in {:?}",
        inserted,
        start_time.elapsed()
    );
    Ok(inserted)
}

/// Deletes events created by seeded accounts.
pub async fn clear_events(
    db: &PgPool,
    seed_email_pattern: &str,
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded events...");

    let result = sqlx::query(
        "DELETE FROM events
         WHERE created_by IN (SELECT id FROM users WHERE email LIKE $1)",
    )
    .bind(seed_email_pattern)
    .execute(db)
    .await?
    .rows_affected();

    println!(
        "   ✓ Deleted {} events in {:?}",
        result,
        start_time.elapsed()
    );
    Ok(result)
}
